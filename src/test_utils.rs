use crate::clock::{Clock, DateTime, Utc};
use crate::http::{HTTPError, HTTPResult};
use crate::reddit::service::{Resource, Service};
use reqwest::StatusCode;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

pub fn do_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a fresh, empty directory under the system temp directory.
pub fn temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("redcrawl-{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("could not create temp dir");
    dir
}

/// Serves Reddit API responses from `tests/data`.
///
/// The first page of a resource is read from `{resource}_{suffix}.json`;
/// later pages are read from `{resource}_{suffix}_{after}.json`. A missing
/// file is answered with HTTP 404.
pub struct TestService {
    suffix: String,
    user_context: bool,
    requests: Mutex<Vec<(String, usize)>>,
}

impl TestService {
    pub fn new(suffix: &str) -> Self {
        Self {
            suffix: suffix.to_string(),
            user_context: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_user_context(mut self) -> Self {
        self.user_context = true;
        self
    }

    /// Names of the fixtures requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .expect("poisoned request log")
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Page sizes requested so far, in order.
    pub fn limits(&self) -> Vec<usize> {
        self.requests
            .lock()
            .expect("poisoned request log")
            .iter()
            .map(|(_, limit)| *limit)
            .collect()
    }

    fn fixture_name(&self, resource: Resource<'_>, params: &[(&str, String)]) -> String {
        let kind = match resource {
            Resource::About(_) => "about",
            Resource::Submitted(_) => "submitted",
            Resource::Comments(_) => "comments",
            Resource::Subscriptions => "subscriptions",
            Resource::Friends => "friends",
        };
        match params.iter().find(|(key, _)| *key == "after") {
            Some((_, after)) => format!("{kind}_{}_{after}", self.suffix),
            None => format!("{kind}_{}", self.suffix),
        }
    }
}

impl Service for TestService {
    async fn get_resource(
        &self,
        resource: Resource<'_>,
        params: &[(&str, String)],
    ) -> HTTPResult<String> {
        let name = self.fixture_name(resource, params);
        let limit = params
            .iter()
            .find(|(key, _)| *key == "limit")
            .and_then(|(_, limit)| limit.parse().ok())
            .unwrap_or(0);
        self.requests
            .lock()
            .expect("poisoned request log")
            .push((name.clone(), limit));

        fs::read_to_string(format!("tests/data/{name}.json"))
            .map_err(|_| HTTPError::Http(StatusCode::NOT_FOUND))
    }

    fn has_user_context(&self) -> bool {
        self.user_context
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FrozenClock {
    datetime: DateTime<Utc>,
}

impl FrozenClock {
    pub fn new(datetime: DateTime<Utc>) -> Self {
        FrozenClock { datetime }
    }
}

impl Default for FrozenClock {
    fn default() -> Self {
        let datetime = DateTime::parse_from_rfc3339("2025-05-23T10:13:00-07:00")
            .expect("invalid date supplied")
            .with_timezone(&Utc);
        Self::new(datetime)
    }
}

impl Clock for FrozenClock {
    fn now(&self) -> DateTime<Utc> {
        self.datetime
    }
}
