//! Building blocks for talking to APIs over HTTP.

use reqwest::{Client, ClientBuilder, StatusCode, header};
use std::time::Duration;
use std::{error, fmt};

/// Creates HTTP clients that identify themselves with a fixed user agent.
#[derive(Debug)]
pub struct HTTPClientFactory {
    user_agent: String,
}

impl HTTPClientFactory {
    /// Creates a new factory whose clients send `user_agent`.
    pub fn new(user_agent: impl Into<String>) -> Self {
        let user_agent = user_agent.into();
        Self { user_agent }
    }

    /// The user agent sent by clients built by this factory.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Builds a new HTTP client.
    ///
    /// According to the reqwest docs, building only fails if a TLS backend
    /// or the DNS resolver cannot be initialized.
    pub fn create(&self) -> HTTPResult<Client> {
        ClientBuilder::new()
            .user_agent(&self.user_agent)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(HTTPError::Request)
    }
}

/// An appropriate default user agent to use when making HTTP requests.
///
/// # Examples
///
/// ```
/// use redcrawl::http::default_user_agent;
/// assert!(default_user_agent().starts_with("redcrawl v"));
/// ```
pub fn default_user_agent() -> String {
    format!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// The result of an HTTP request.
pub type HTTPResult<T> = Result<T, HTTPError>;

/// Indicates an error has occurred when making an HTTP call.
#[derive(Debug)]
pub enum HTTPError {
    /// An error retrieving the body of a response.
    Body(reqwest::Error),

    /// An error that occurred while making an HTTP request.
    Request(reqwest::Error),

    /// A response body that could not be deserialized.
    Deserialization(serde_json::Error),

    /// An unsuccessful HTTP status code in an HTTP response.
    Http(StatusCode),

    /// A missing Content-Type header in a response.
    MissingContentType,

    /// An invalid Content-Type header.
    InvalidContentType(header::ToStrError),

    /// A Content-Type that is not understood by the service.
    UnexpectedContentType(String),

    /// The API refused to grant an access token.
    Auth(String),

    /// The API kept rate limiting us after the allowed number of retries.
    RateLimited(Duration),
}

impl From<header::ToStrError> for HTTPError {
    fn from(error: header::ToStrError) -> Self {
        HTTPError::InvalidContentType(error)
    }
}

impl fmt::Display for HTTPError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HTTPError::Body(err) => write!(f, "Error retrieving body of HTTP response: {err}"),
            HTTPError::Request(err) => write!(f, "Error while making HTTP request: {err}"),
            HTTPError::Deserialization(err) => write!(f, "Error parsing response body: {err}"),
            HTTPError::Http(status) => write!(f, "Request returned HTTP {status}"),
            HTTPError::MissingContentType => write!(f, "Missing Content-Type header"),
            HTTPError::InvalidContentType(err) => {
                write!(f, "Invalid Content-Type header value: {err}")
            }
            HTTPError::UnexpectedContentType(content_type) => {
                write!(f, "Unexpected content type: {content_type}")
            }
            HTTPError::Auth(reason) => write!(f, "Authentication failed: {reason}"),
            HTTPError::RateLimited(retry_after) => write!(
                f,
                "Rate limited by the API (retry after {}s)",
                retry_after.as_secs()
            ),
        }
    }
}

impl error::Error for HTTPError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            HTTPError::Body(err) => Some(err),
            HTTPError::Request(err) => Some(err),
            HTTPError::Deserialization(err) => Some(err),
            HTTPError::Http(_) => None,
            HTTPError::MissingContentType => None,
            HTTPError::InvalidContentType(err) => Some(err),
            HTTPError::UnexpectedContentType(_) => None,
            HTTPError::Auth(_) => None,
            HTTPError::RateLimited(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn it_returns_user_agent_with_version_number() {
        let user_agent = default_user_agent();
        let version_re = Regex::new(r"^[a-z]+ v\d+\.\d+\.\d+(-(alpha|beta)\.\d+)?$").unwrap();
        assert!(
            version_re.is_match(&user_agent),
            "{} does not match {}",
            user_agent,
            version_re,
        );
    }

    #[test]
    fn it_remembers_its_user_agent() {
        let factory = HTTPClientFactory::new("redcrawl-tests v0.0.0");
        assert_eq!(factory.user_agent(), "redcrawl-tests v0.0.0");
    }

    #[test]
    fn it_creates_a_client() {
        let factory = HTTPClientFactory::new(default_user_agent());
        assert!(factory.create().is_ok());
    }

    #[test]
    fn it_describes_http_status_errors() {
        let err = HTTPError::Http(StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Request returned HTTP 404 Not Found");
    }

    #[test]
    fn it_describes_rate_limit_errors() {
        let err = HTTPError::RateLimited(Duration::from_secs(42));
        assert_eq!(err.to_string(), "Rate limited by the API (retry after 42s)");
    }
}
