//! Saves crawl results to disk as timestamped JSON documents.
//!
//! Every result is wrapped in an [`Envelope`] recording when it was saved
//! and what kind of data it holds, and written to
//! `<output_dir>/<data_type>.json`. Saving the same data type again
//! overwrites the previous file.

use crate::clock::{Clock, DateTime, Utc};
use log::info;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while saving or loading results.
#[derive(Debug, Error)]
pub enum Error {
    /// The file or directory could not be read or written.
    #[error("could not access {}: {source}", .path.display())]
    Io {
        /// Path being accessed.
        path: PathBuf,

        /// Underlying I/O error.
        source: io::Error,
    },

    /// The data could not be converted to or from JSON.
    #[error("invalid JSON in {}: {source}", .path.display())]
    Json {
        /// Path being accessed.
        path: PathBuf,

        /// Underlying JSON error.
        source: serde_json::Error,
    },
}

/// A specialized result type for persistence operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A saved result and its metadata.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Envelope<T> {
    /// When the result was saved.
    pub timestamp: DateTime<Utc>,

    /// The kind of data, which is also the file's stem.
    pub data_type: String,

    /// The result itself.
    pub data: T,
}

/// Writes results as JSON files into a directory.
#[derive(Debug)]
pub struct JsonSink<C: Clock> {
    dir: PathBuf,
    clock: C,
}

impl<C: Clock> JsonSink<C> {
    /// Creates a sink that writes to `dir`, creating it if necessary.
    ///
    /// `clock` stamps each saved result.
    pub fn new(dir: impl Into<PathBuf>, clock: C) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| Error::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir, clock })
    }

    /// The directory results are written to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The clock used to stamp results.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Saves `data` under `data_type` and returns the path of the new file.
    pub fn save<T: Serialize>(&self, data_type: &str, data: &T) -> Result<PathBuf> {
        let path = self.dir.join(format!("{data_type}.json"));
        let envelope = Envelope {
            timestamp: self.clock.now(),
            data_type: data_type.to_string(),
            data,
        };
        let json = serde_json::to_string_pretty(&envelope).map_err(|source| Error::Json {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, json).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
        info!("Saved {data_type} to {}", path.display());
        Ok(path)
    }

    /// Reads a saved result back from `path`.
    pub fn load<T: DeserializeOwned>(&self, path: impl AsRef<Path>) -> Result<Envelope<T>> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FrozenClock, temp_dir};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    #[test]
    fn it_creates_the_output_directory() {
        let dir = temp_dir().join("nested").join("output");
        let sink = JsonSink::new(&dir, FrozenClock::default()).unwrap();
        assert!(dir.is_dir());
        assert_eq!(sink.dir(), dir.as_path());
    }

    #[test]
    fn it_names_files_after_the_data_type() {
        let dir = temp_dir();
        let sink = JsonSink::new(&dir, FrozenClock::default()).unwrap();
        let path = sink.save("my_friends", &json!({"total_friends": 0})).unwrap();
        assert_eq!(path, dir.join("my_friends.json"));
    }

    #[test]
    fn it_keeps_the_payload_under_data() {
        let sink = JsonSink::new(temp_dir(), FrozenClock::default()).unwrap();
        let payload = json!({"username": "tester", "sorted_communities": ["go", "rust"]});
        let path = sink.save("active_subreddits_tester", &payload).unwrap();

        let envelope: Envelope<Value> = sink.load(&path).unwrap();
        assert_eq!(envelope.data, payload);
        assert_eq!(envelope.data_type, "active_subreddits_tester");
        assert_eq!(envelope.timestamp, sink.clock().now());
    }

    #[test]
    fn it_writes_a_parseable_timestamp() {
        let sink = JsonSink::new(temp_dir(), FrozenClock::default()).unwrap();
        let path = sink.save("user_public_info_tester", &json!({})).unwrap();

        let raw: Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        let timestamp = raw["timestamp"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(timestamp).is_ok(), "{timestamp}");
        assert!(raw["data"].is_object());
    }

    #[test]
    fn it_overwrites_earlier_results() {
        let sink = JsonSink::new(temp_dir(), FrozenClock::default()).unwrap();
        sink.save("my_subscriptions", &json!({"total_subscriptions": 1})).unwrap();
        let path = sink.save("my_subscriptions", &json!({"total_subscriptions": 2})).unwrap();

        let envelope: Envelope<Value> = sink.load(path).unwrap();
        assert_eq!(envelope.data["total_subscriptions"], 2);
    }

    #[test]
    fn it_reports_a_missing_file() {
        let sink = JsonSink::new(temp_dir(), FrozenClock::default()).unwrap();
        let err = sink.load::<Value>(sink.dir().join("nope.json")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn it_reports_invalid_json() {
        let sink = JsonSink::new(temp_dir(), FrozenClock::default()).unwrap();
        let path = sink.dir().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let err = sink.load::<Value>(&path).unwrap_err();
        assert!(matches!(err, Error::Json { .. }));
    }
}
