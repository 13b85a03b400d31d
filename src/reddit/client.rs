// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! High-level access to Reddit profiles, activity, and account data.

use crate::activity::{Comment, Friend, Post, RecentActivity, Subscription, UserProfile};
use crate::conf::Credentials;
use crate::http::HTTPError;
use crate::reddit::service::{RedditService, Resource, Service};
use crate::reddit::thing::{
    AboutData, CommentData, FriendData, Listing, SubmissionData, SubredditData, Thing,
};
use log::{debug, trace};
use regex::Regex;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::sync::LazyLock;
use thiserror::Error;

/// Largest page Reddit returns for a listing.
pub const MAX_PAGE_SIZE: usize = 100;

static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{3,20}$").expect("invalid username regex"));

/// Errors returned by [`RedditClient`].
#[derive(Debug, Error)]
pub enum Error {
    /// The username cannot belong to a Reddit account.
    #[error("invalid username: '{0}'")]
    InvalidUsername(String),

    /// Reddit has no account with the username.
    #[error("no such user: {0}")]
    NoSuchUser(String),

    /// The account exists but has been suspended.
    #[error("user {0} is suspended")]
    Suspended(String),

    /// The request needs credentials with a Reddit username and password.
    #[error("not authenticated: set a Reddit username and password to read account data")]
    NotAuthenticated,

    /// The Reddit API request failed.
    #[error(transparent)]
    Service(#[from] HTTPError),

    /// The Reddit API returned data that could not be parsed.
    #[error("could not parse Reddit response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A specialized result type for Reddit client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Retrieves Redditors and account data from Reddit.
#[derive(Debug)]
pub struct RedditClient<S: Service = RedditService> {
    service: S,
}

impl RedditClient {
    /// Authenticates with Reddit and returns a client that talks to the
    /// live API.
    pub async fn connect(credentials: &Credentials) -> Result<Self> {
        let service = RedditService::connect(credentials).await?;
        Ok(Self::new(service))
    }
}

impl<S: Service> RedditClient<S> {
    /// Creates a client that retrieves data using `service`.
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// True if the client acts on behalf of a Reddit account.
    pub fn has_user_context(&self) -> bool {
        self.service.has_user_context()
    }

    /// Retrieves a Redditor's public profile.
    pub async fn user_profile(&self, username: &str) -> Result<UserProfile> {
        validate_username(username)?;
        let json = match self.service.get_resource(Resource::About(username), &[]).await {
            Ok(json) => json,
            Err(HTTPError::Http(StatusCode::NOT_FOUND)) => {
                return Err(Error::NoSuchUser(username.to_string()));
            }
            Err(err) => return Err(err.into()),
        };

        let about: Thing<AboutData> = serde_json::from_str(&json)?;
        if about.data.is_suspended {
            return Err(Error::Suspended(username.to_string()));
        }
        UserProfile::from_about(about.data).ok_or_else(|| Error::Suspended(username.to_string()))
    }

    /// Retrieves up to `limit` of a Redditor's newest posts and up to
    /// `limit` of their newest comments.
    pub async fn recent_activity(&self, username: &str, limit: usize) -> Result<RecentActivity> {
        validate_username(username)?;
        let posts = self
            .listing::<SubmissionData>(Resource::Submitted(username), Some(limit))
            .await?
            .into_iter()
            .map(Post::from)
            .collect();
        let comments = self
            .listing::<CommentData>(Resource::Comments(username), Some(limit))
            .await?
            .into_iter()
            .map(Comment::from)
            .collect();
        Ok(RecentActivity {
            username: username.to_string(),
            posts,
            comments,
        })
    }

    /// Retrieves every subreddit the authenticated account subscribes to.
    pub async fn subscriptions(&self) -> Result<Vec<Subscription>> {
        let subreddits = self
            .listing::<SubredditData>(Resource::Subscriptions, None)
            .await?;
        Ok(subreddits.into_iter().map(Subscription::from).collect())
    }

    /// Retrieves the authenticated account's friends.
    pub async fn friends(&self) -> Result<Vec<Friend>> {
        let friends = self.listing::<FriendData>(Resource::Friends, None).await?;
        Ok(friends.into_iter().map(Friend::from).collect())
    }

    /// Follows a listing's cursor until `limit` items have been read or the
    /// listing runs out. A `limit` of `None` reads the whole listing.
    async fn listing<T: DeserializeOwned>(
        &self,
        resource: Resource<'_>,
        limit: Option<usize>,
    ) -> Result<Vec<T>> {
        if resource.requires_user_context() && !self.has_user_context() {
            return Err(Error::NotAuthenticated);
        }

        let mut items = Vec::new();
        let mut after: Option<String> = None;

        loop {
            let page_size = match limit {
                Some(limit) if items.len() >= limit => break,
                Some(limit) => (limit - items.len()).min(MAX_PAGE_SIZE),
                None => MAX_PAGE_SIZE,
            };

            let mut params = vec![("limit", page_size.to_string())];
            if let Some(after) = &after {
                params.push(("after", after.clone()));
            }

            let json = self.service.get_resource(resource, &params).await?;
            let (page, next) = Listing::<T>::parse(&json)?.into_parts();
            trace!("Read {} items from {}", page.len(), resource.path());

            let read = page.len();
            items.extend(page);
            match next {
                Some(next) if read > 0 => after = Some(next),
                _ => break,
            }
        }

        if let Some(limit) = limit {
            items.truncate(limit);
        }
        debug!("Read {} items from {}", items.len(), resource.path());
        Ok(items)
    }
}

/// Checks that `username` could belong to a Reddit account.
pub fn validate_username(username: &str) -> Result<()> {
    if USERNAME_REGEX.is_match(username) {
        Ok(())
    } else {
        Err(Error::InvalidUsername(username.to_string()))
    }
}
