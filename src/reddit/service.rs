// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! HTTPS connector for the Reddit API.
//!
//! Service structures in this module provide a low-level way to interact
//! with the Reddit API over HTTPS, essentially a specialized HTTPS client
//! specifically for Reddit.

use crate::conf::Credentials;
use crate::http::{HTTPClientFactory, HTTPError, HTTPResult};
use crate::reddit::auth::{self, AccessToken};
use crate::throttle::{self, RateLimit, Throttle};
use log::{debug, warn};
use reqwest::{Client, StatusCode, header};

const API_BASE: &str = "https://oauth.reddit.com";

const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// A resource exposed by the Reddit API.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Resource<'a> {
    /// A Redditor's profile.
    About(&'a str),

    /// A Redditor's submitted posts.
    Submitted(&'a str),

    /// A Redditor's comments.
    Comments(&'a str),

    /// Subreddits the authenticated account subscribes to.
    Subscriptions,

    /// Redditors the authenticated account has befriended.
    Friends,
}

impl Resource<'_> {
    /// The API path of the resource.
    pub fn path(&self) -> String {
        match self {
            Resource::About(username) => format!("/user/{username}/about"),
            Resource::Submitted(username) => format!("/user/{username}/submitted"),
            Resource::Comments(username) => format!("/user/{username}/comments"),
            Resource::Subscriptions => "/subreddits/mine/subscriber".to_string(),
            Resource::Friends => "/api/v1/me/friends".to_string(),
        }
    }

    /// True if the resource can only be read with a user-context token.
    pub fn requires_user_context(&self) -> bool {
        matches!(self, Resource::Subscriptions | Resource::Friends)
    }
}

/// A service for retrieving information from Reddit.
///
/// Using this trait, clients can implement different ways of connecting
/// to the Reddit API, such as an actual connector for production code,
/// and a mocked connector for testing purposes.
pub trait Service {
    /// Performs a GET request for `resource` with the query `params` and
    /// returns the raw JSON body.
    fn get_resource(
        &self,
        resource: Resource<'_>,
        params: &[(&str, String)],
    ) -> impl Future<Output = HTTPResult<String>> + Send;

    /// True if the service acts on behalf of a Reddit account.
    fn has_user_context(&self) -> bool;
}

/// A service that contacts the Reddit API directly to retrieve information.
#[derive(Debug)]
pub struct RedditService {
    client: Client,
    token: AccessToken,
    throttle: Throttle,
}

impl RedditService {
    /// Authenticates with Reddit and returns a connected service.
    pub async fn connect(credentials: &Credentials) -> HTTPResult<Self> {
        let factory = HTTPClientFactory::new(credentials.user_agent());
        let client = factory.create()?;
        let token = auth::authenticate(&client, credentials).await?;
        Ok(Self {
            client,
            token,
            throttle: Throttle::default(),
        })
    }

    fn uri(&self, resource: Resource<'_>) -> String {
        format!("{API_BASE}{}", resource.path())
    }

    // TODO: Refresh the access token once it expires so listings that take
    //       longer than the token lifetime can finish.
    async fn get(&self, uri: &str, params: &[(&str, String)]) -> HTTPResult<String> {
        let mut retries = 0;
        loop {
            self.throttle.wait().await;
            debug!("GET {uri} {params:?}");
            let resp = self
                .client
                .get(uri)
                .bearer_auth(self.token.secret())
                .query(&[("raw_json", "1")])
                .query(params)
                .send()
                .await
                .map_err(HTTPError::Request)?;

            if let Some(rate_limit) = RateLimit::from_headers(resp.headers()) {
                self.throttle.observe(&rate_limit).await;
            }

            if resp.status() == StatusCode::TOO_MANY_REQUESTS {
                let delay =
                    throttle::retry_after(resp.headers()).unwrap_or(throttle::DEFAULT_RETRY_AFTER);
                if retries >= MAX_RATE_LIMIT_RETRIES {
                    return Err(HTTPError::RateLimited(delay));
                }
                retries += 1;
                warn!("Rate limited on {uri} (attempt {retries} of {MAX_RATE_LIMIT_RETRIES})");
                self.throttle.back_off(delay).await;
                continue;
            }

            if !resp.status().is_success() {
                return Err(HTTPError::Http(resp.status()));
            }

            let content_type = resp
                .headers()
                .get(header::CONTENT_TYPE)
                .ok_or(HTTPError::MissingContentType)?
                .to_str()?;
            if !content_type.starts_with("application/json") {
                return Err(HTTPError::UnexpectedContentType(content_type.to_string()));
            }

            return resp.text().await.map_err(HTTPError::Body);
        }
    }
}

impl Service for RedditService {
    async fn get_resource(
        &self,
        resource: Resource<'_>,
        params: &[(&str, String)],
    ) -> HTTPResult<String> {
        let uri = self.uri(resource);
        self.get(&uri, params).await
    }

    fn has_user_context(&self) -> bool {
        self.token.has_user_context()
    }
}
