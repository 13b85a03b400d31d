//! Environment and configuration utilities.
//!
//! Reddit API credentials are read from the environment first:
//!
//! | Variable               | Required |
//! |------------------------|----------|
//! | `REDDIT_CLIENT_ID`     | yes      |
//! | `REDDIT_CLIENT_SECRET` | yes      |
//! | `REDDIT_USER_AGENT`    | no       |
//! | `REDDIT_USERNAME`      | no       |
//! | `REDDIT_PASSWORD`      | no       |
//!
//! Anything missing from the environment is filled in from a JSON secrets
//! file (`secrets.json` by default) with the keys `client_id`,
//! `client_secret`, `user_agent`, `username`, and `password`. The secrets
//! file should never be checked into version control.

use crate::http::default_user_agent;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{env, fmt, fs, io};
use thiserror::Error;

/// Default location of the secrets file.
pub const DEFAULT_SECRETS_FILE: &str = "secrets.json";

/// Default directory JSON output is written to.
pub const DEFAULT_OUTPUT_DIR: &str = "reddit_data";

const CLIENT_ID_VAR: &str = "REDDIT_CLIENT_ID";
const CLIENT_SECRET_VAR: &str = "REDDIT_CLIENT_SECRET";
const USER_AGENT_VAR: &str = "REDDIT_USER_AGENT";
const USERNAME_VAR: &str = "REDDIT_USERNAME";
const PASSWORD_VAR: &str = "REDDIT_PASSWORD";

/// Credentials for the Reddit API.
#[derive(Clone)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
    user_agent: String,
    username: Option<String>,
    password: Option<String>,
}

impl Credentials {
    /// Creates app-only credentials.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            user_agent: default_user_agent(),
            username: None,
            password: None,
        }
    }

    /// Adds a Reddit account login, enabling access to the account's own
    /// subscriptions and friends.
    pub fn with_login(self, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
            ..self
        }
    }

    /// Replaces the user agent sent with every request.
    pub fn with_user_agent(self, user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            ..self
        }
    }

    /// Loads credentials from the environment, falling back to the secrets
    /// file at `secrets_path` for anything the environment does not set.
    ///
    /// A secrets file that cannot be read only matters when the environment
    /// lacks the client ID or secret.
    ///
    /// If the client ID or secret cannot be found, a template secrets file
    /// is written to `secrets_path` (unless a file already exists there) and
    /// an error is returned.
    pub fn load(secrets_path: impl AsRef<Path>) -> Result<Self, Error> {
        let secrets_path = secrets_path.as_ref();
        let env = Secrets::from_env();
        let file = match Secrets::from_file(secrets_path) {
            Ok(file) => file,
            Err(err) if env.has_client() => {
                warn!("Ignoring secrets file: {err}");
                Secrets::default()
            }
            Err(err) => return Err(err),
        };
        let merged = env.or(file);

        match (merged.client_id, merged.client_secret) {
            (Some(client_id), Some(client_secret)) => {
                let mut credentials = Self::new(client_id, client_secret);
                if let Some(user_agent) = merged.user_agent {
                    credentials = credentials.with_user_agent(user_agent);
                }
                let credentials = match (merged.username, merged.password) {
                    (Some(username), Some(password)) => credentials.with_login(username, password),
                    (username, _) => Self {
                        username,
                        ..credentials
                    },
                };
                debug!("Loaded credentials: {credentials:?}");
                Ok(credentials)
            }
            _ => {
                let created = Secrets::write_template(secrets_path)?;
                Err(Error::Missing {
                    path: secrets_path.to_path_buf(),
                    created,
                })
            }
        }
    }

    /// The app's client ID.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The app's client secret.
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// The user agent sent with every request.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// The account username, if one was configured.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// The username and password, if both were configured.
    pub fn login(&self) -> Option<(&str, &str)> {
        self.username.as_deref().zip(self.password.as_deref())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Raw, possibly incomplete credentials from one source.
#[derive(Debug, Default, Deserialize, Serialize)]
struct Secrets {
    client_id: Option<String>,
    client_secret: Option<String>,
    user_agent: Option<String>,
    username: Option<String>,
    password: Option<String>,
}

impl Secrets {
    fn template() -> Self {
        Self {
            client_id: Some("your_reddit_client_id_here".to_string()),
            client_secret: Some("your_reddit_client_secret_here".to_string()),
            user_agent: Some(format!("{} by YourUsername", default_user_agent())),
            username: Some("your_reddit_username_optional".to_string()),
            password: Some("your_reddit_password_optional".to_string()),
        }
    }

    fn from_env() -> Self {
        Self {
            client_id: env_var(CLIENT_ID_VAR),
            client_secret: env_var(CLIENT_SECRET_VAR),
            user_agent: env_var(USER_AGENT_VAR),
            username: env_var(USERNAME_VAR),
            password: env_var(PASSWORD_VAR),
        }
    }

    fn from_file(path: &Path) -> Result<Self, Error> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(Error::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let secrets: Self = serde_json::from_str(&contents).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded credentials from {}", path.display());
        Ok(secrets.without_placeholders())
    }

    /// Writes a template to `path` unless something already exists there.
    ///
    /// Returns true if the template was written.
    fn write_template(path: &Path) -> Result<bool, Error> {
        if path.exists() {
            return Ok(false);
        }
        let io_error = |source| Error::Io {
            path: path.to_path_buf(),
            source,
        };
        let template = serde_json::to_string_pretty(&Self::template())
            .map_err(|source| Error::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        fs::write(path, template + "\n").map_err(io_error)?;
        info!("Created template secrets file at {}", path.display());
        Ok(true)
    }

    /// True if both the client ID and secret are set.
    fn has_client(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some()
    }

    /// Values left over from the template count as missing.
    fn without_placeholders(self) -> Self {
        let template = Self::template();
        let keep = |value: Option<String>, placeholder: Option<String>| {
            value.filter(|v| !v.trim().is_empty() && Some(v) != placeholder.as_ref())
        };
        Self {
            client_id: keep(self.client_id, template.client_id),
            client_secret: keep(self.client_secret, template.client_secret),
            user_agent: keep(self.user_agent, template.user_agent),
            username: keep(self.username, template.username),
            password: keep(self.password, template.password),
        }
    }

    /// Field-by-field merge that prefers `self`.
    fn or(self, fallback: Self) -> Self {
        Self {
            client_id: self.client_id.or(fallback.client_id),
            client_secret: self.client_secret.or(fallback.client_secret),
            user_agent: self.user_agent.or(fallback.user_agent),
            username: self.username.or(fallback.username),
            password: self.password.or(fallback.password),
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// An error loading credentials.
#[derive(Debug, Error)]
pub enum Error {
    /// The client ID or client secret could not be found anywhere.
    #[error("Reddit credentials not found; set REDDIT_CLIENT_ID and REDDIT_CLIENT_SECRET or fill in {}", .path.display())]
    Missing {
        /// Path of the secrets file that was consulted.
        path: PathBuf,
        /// True if a template was written to `path`.
        created: bool,
    },

    /// The secrets file could not be read or written.
    #[error("Could not access {}: {source}", .path.display())]
    Io {
        /// Path of the secrets file.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// The secrets file is not valid JSON.
    #[error("Could not parse {}: {source}", .path.display())]
    Parse {
        /// Path of the secrets file.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::temp_dir;
    use temp_env::with_vars;

    const UNSET: Option<&str> = None;

    fn without_reddit_env<F: FnOnce()>(f: F) {
        with_vars(
            [
                (CLIENT_ID_VAR, UNSET),
                (CLIENT_SECRET_VAR, UNSET),
                (USER_AGENT_VAR, UNSET),
                (USERNAME_VAR, UNSET),
                (PASSWORD_VAR, UNSET),
            ],
            f,
        )
    }

    #[test]
    fn it_loads_credentials_from_the_environment() {
        let dir = temp_dir();
        with_vars(
            [
                (CLIENT_ID_VAR, Some("env-id")),
                (CLIENT_SECRET_VAR, Some("env-secret")),
                (USER_AGENT_VAR, Some("env-agent")),
                (USERNAME_VAR, Some("env-user")),
                (PASSWORD_VAR, Some("env-password")),
            ],
            || {
                let credentials = Credentials::load(dir.join("secrets.json")).unwrap();
                assert_eq!(credentials.client_id(), "env-id");
                assert_eq!(credentials.client_secret(), "env-secret");
                assert_eq!(credentials.user_agent(), "env-agent");
                assert_eq!(credentials.login(), Some(("env-user", "env-password")));
            },
        );
        assert!(!dir.join("secrets.json").exists());
    }

    #[test]
    fn it_defaults_the_user_agent() {
        let dir = temp_dir();
        with_vars(
            [
                (CLIENT_ID_VAR, Some("env-id")),
                (CLIENT_SECRET_VAR, Some("env-secret")),
                (USER_AGENT_VAR, UNSET),
                (USERNAME_VAR, UNSET),
                (PASSWORD_VAR, UNSET),
            ],
            || {
                let credentials = Credentials::load(dir.join("secrets.json")).unwrap();
                assert_eq!(credentials.user_agent(), default_user_agent());
                assert_eq!(credentials.login(), None);
            },
        );
    }

    #[test]
    fn it_loads_credentials_from_the_secrets_file() {
        let dir = temp_dir();
        let path = dir.join("secrets.json");
        fs::write(
            &path,
            r#"{"client_id": "file-id", "client_secret": "file-secret", "username": "file-user", "password": "hunter2"}"#,
        )
        .unwrap();
        without_reddit_env(|| {
            let credentials = Credentials::load(&path).unwrap();
            assert_eq!(credentials.client_id(), "file-id");
            assert_eq!(credentials.client_secret(), "file-secret");
            assert_eq!(credentials.login(), Some(("file-user", "hunter2")));
        });
    }

    #[test]
    fn it_prefers_the_environment_over_the_secrets_file() {
        let dir = temp_dir();
        let path = dir.join("secrets.json");
        fs::write(
            &path,
            r#"{"client_id": "file-id", "client_secret": "file-secret", "user_agent": "file-agent"}"#,
        )
        .unwrap();
        with_vars(
            [
                (CLIENT_ID_VAR, Some("env-id")),
                (CLIENT_SECRET_VAR, UNSET),
                (USER_AGENT_VAR, UNSET),
                (USERNAME_VAR, UNSET),
                (PASSWORD_VAR, UNSET),
            ],
            || {
                let credentials = Credentials::load(&path).unwrap();
                assert_eq!(credentials.client_id(), "env-id");
                assert_eq!(credentials.client_secret(), "file-secret");
                assert_eq!(credentials.user_agent(), "file-agent");
            },
        );
    }

    #[test]
    fn it_creates_a_template_when_credentials_are_missing() {
        let dir = temp_dir();
        let path = dir.join("secrets.json");
        without_reddit_env(|| {
            let err = Credentials::load(&path).unwrap_err();
            assert!(matches!(err, Error::Missing { created: true, .. }));
        });
        let template: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(template["client_id"], "your_reddit_client_id_here");
        assert_eq!(template["client_secret"], "your_reddit_client_secret_here");
    }

    #[test]
    fn it_treats_an_untouched_template_as_missing() {
        let dir = temp_dir();
        let path = dir.join("secrets.json");
        without_reddit_env(|| {
            let _ = Credentials::load(&path);
            let err = Credentials::load(&path).unwrap_err();
            assert!(matches!(err, Error::Missing { created: false, .. }));
        });
    }

    #[test]
    fn it_ignores_template_login_placeholders() {
        let dir = temp_dir();
        let path = dir.join("secrets.json");
        fs::write(
            &path,
            r#"{"client_id": "file-id", "client_secret": "file-secret", "username": "your_reddit_username_optional", "password": "your_reddit_password_optional"}"#,
        )
        .unwrap();
        without_reddit_env(|| {
            let credentials = Credentials::load(&path).unwrap();
            assert_eq!(credentials.username(), None);
            assert_eq!(credentials.login(), None);
        });
    }

    #[test]
    fn it_reports_malformed_secrets_files() {
        let dir = temp_dir();
        let path = dir.join("secrets.json");
        fs::write(&path, "{ not json").unwrap();
        without_reddit_env(|| {
            let err = Credentials::load(&path).unwrap_err();
            assert!(matches!(err, Error::Parse { .. }));
        });
    }

    #[test]
    fn it_ignores_a_malformed_secrets_file_when_the_environment_is_complete() {
        let dir = temp_dir();
        let path = dir.join("secrets.json");
        fs::write(&path, "{ not json").unwrap();
        with_vars(
            [
                (CLIENT_ID_VAR, Some("env-id")),
                (CLIENT_SECRET_VAR, Some("env-secret")),
                (USER_AGENT_VAR, UNSET),
                (USERNAME_VAR, UNSET),
                (PASSWORD_VAR, UNSET),
            ],
            || {
                let credentials = Credentials::load(&path).unwrap();
                assert_eq!(credentials.client_id(), "env-id");
                assert_eq!(credentials.client_secret(), "env-secret");
                assert_eq!(credentials.user_agent(), default_user_agent());
            },
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn it_keeps_a_username_without_a_password() {
        let dir = temp_dir();
        with_vars(
            [
                (CLIENT_ID_VAR, Some("env-id")),
                (CLIENT_SECRET_VAR, Some("env-secret")),
                (USER_AGENT_VAR, UNSET),
                (USERNAME_VAR, Some("env-user")),
                (PASSWORD_VAR, UNSET),
            ],
            || {
                let credentials = Credentials::load(dir.join("secrets.json")).unwrap();
                assert_eq!(credentials.username(), Some("env-user"));
                assert_eq!(credentials.login(), None);
            },
        );
    }

    #[test]
    fn it_redacts_secrets_when_debugging() {
        let credentials = Credentials::new("id", "very-secret").with_login("me", "hunter2");
        let debugged = format!("{credentials:?}");
        assert!(!debugged.contains("very-secret"));
        assert!(!debugged.contains("hunter2"));
        assert!(debugged.contains("<redacted>"));
    }
}
