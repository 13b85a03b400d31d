//! OAuth2 authentication with the Reddit API.
//!
//! Reddit hands out bearer tokens from a single endpoint. Scripts that
//! know an account's password use the `password` grant and receive a
//! token that can see the account's own subscriptions and friends;
//! everything else uses the app-only `client_credentials` grant, which is
//! enough to read public profiles and listings.

use crate::conf::Credentials;
use crate::http::{HTTPError, HTTPResult};
use log::{debug, info};
use reqwest::Client;
use serde::Deserialize;
use std::fmt;

const TOKEN_URI: &str = "https://www.reddit.com/api/v1/access_token";

/// A bearer token for the Reddit API.
#[derive(Clone)]
pub struct AccessToken {
    token: String,
    scope: String,
    expires_in: u64,
    user_context: bool,
}

impl AccessToken {
    /// The raw bearer token.
    pub fn secret(&self) -> &str {
        &self.token
    }

    /// The OAuth scopes granted to the token.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Lifetime of the token in seconds.
    pub fn expires_in(&self) -> u64 {
        self.expires_in
    }

    /// True if the token acts on behalf of a Reddit account rather than
    /// only the app.
    pub fn has_user_context(&self) -> bool {
        self.user_context
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"<redacted>")
            .field("scope", &self.scope)
            .field("expires_in", &self.expires_in)
            .field("user_context", &self.user_context)
            .finish()
    }
}

// Reddit answers a bad password with HTTP 200 and an error body.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TokenResponse {
    Granted {
        access_token: String,
        #[serde(default)]
        scope: String,
        #[serde(default)]
        expires_in: u64,
    },
    Denied {
        error: String,
    },
}

/// Requests an access token using `credentials`.
pub async fn authenticate(client: &Client, credentials: &Credentials) -> HTTPResult<AccessToken> {
    let (form, user_context) = match credentials.login() {
        Some((username, password)) => (
            vec![
                ("grant_type", "password"),
                ("username", username),
                ("password", password),
            ],
            true,
        ),
        None => (vec![("grant_type", "client_credentials")], false),
    };
    debug!(
        "Requesting {} token",
        if user_context { "user" } else { "app-only" }
    );

    let resp = client
        .post(TOKEN_URI)
        .basic_auth(credentials.client_id(), Some(credentials.client_secret()))
        .form(&form)
        .send()
        .await
        .map_err(HTTPError::Request)?;

    if !resp.status().is_success() {
        return Err(HTTPError::Http(resp.status()));
    }

    let body = resp.text().await.map_err(HTTPError::Body)?;
    let token = parse_token(&body, user_context)?;
    info!(
        "Authenticated with scope '{}', token expires in {} s",
        token.scope(),
        token.expires_in()
    );
    Ok(token)
}

/// Parses the body returned by the token endpoint.
fn parse_token(body: &str, user_context: bool) -> HTTPResult<AccessToken> {
    match serde_json::from_str(body).map_err(HTTPError::Deserialization)? {
        TokenResponse::Granted {
            access_token,
            scope,
            expires_in,
        } => Ok(AccessToken {
            token: access_token,
            scope,
            expires_in,
            user_context,
        }),
        TokenResponse::Denied { error } => Err(HTTPError::Auth(error)),
    }
}
