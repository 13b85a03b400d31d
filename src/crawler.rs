//! Crawls Redditors and the authenticated account, saving every result.
//!
//! Each operation fetches its data with a [`RedditClient`], saves it with a
//! [`JsonSink`], and returns the saved report. A complete crawl runs
//! several operations and records whether each one succeeded in a
//! [`CrawlSummary`] instead of stopping at the first failure.

use crate::activity::{Friend, RecentActivity, Subscription, UserProfile};
use crate::aggregate::ActiveCommunities;
use crate::clock::{Clock, DateTime, HasAge, SystemClock, Utc};
use crate::persist::{self, JsonSink};
use crate::reddit::client::{self, RedditClient};
use crate::reddit::service::{RedditService, Service};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Number of posts and comments read by default for recent activity.
pub const DEFAULT_ACTIVITY_LIMIT: usize = 25;

/// Number of posts and comments read by default to find active subreddits.
pub const DEFAULT_SUBREDDIT_LIMIT: usize = 100;

/// Errors raised while crawling.
#[derive(Debug, Error)]
pub enum Error {
    /// Data could not be fetched from Reddit.
    #[error(transparent)]
    Fetch(#[from] client::Error),

    /// Data could not be saved.
    #[error(transparent)]
    Persist(#[from] persist::Error),
}

/// A specialized result type for crawl operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The result of one step of a complete crawl.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome<T> {
    /// The step succeeded.
    Fetched {
        /// The step's result.
        data: T,
    },

    /// The step failed.
    Failed {
        /// Why the step failed.
        reason: String,
    },
}

impl<T> Outcome<T> {
    /// True if the step succeeded.
    pub fn is_fetched(&self) -> bool {
        matches!(self, Outcome::Fetched { .. })
    }

    /// The step's result, if it succeeded.
    pub fn data(&self) -> Option<&T> {
        match self {
            Outcome::Fetched { data } => Some(data),
            Outcome::Failed { .. } => None,
        }
    }
}

impl<T, E: std::fmt::Display> From<std::result::Result<T, E>> for Outcome<T> {
    fn from(result: std::result::Result<T, E>) -> Self {
        match result {
            Ok(data) => Outcome::Fetched { data },
            Err(err) => Outcome::Failed {
                reason: err.to_string(),
            },
        }
    }
}

/// A Redditor's profile along with the age of their account.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ProfileReport {
    /// The profile.
    #[serde(flatten)]
    pub profile: UserProfile,

    /// Age of the account in fractional days.
    pub account_age_days: f64,
}

/// The subreddits a Redditor is active in.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ActiveSubredditsReport {
    /// Username.
    pub username: String,

    /// Number of distinct subreddits.
    pub total_active_subreddits: usize,

    /// The subreddits and activity in each.
    #[serde(flatten)]
    pub communities: ActiveCommunities,
}

/// The authenticated account's subscriptions.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SubscriptionsReport {
    /// Number of subscriptions.
    pub total_subscriptions: usize,

    /// Subreddit names in byte order.
    pub subscriptions_list: Vec<String>,

    /// Every subscription, in the order Reddit returned them.
    pub detailed_subscriptions: Vec<Subscription>,
}

/// The authenticated account's friends.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct FriendsReport {
    /// Number of friends.
    pub total_friends: usize,

    /// Friend usernames.
    pub friends_list: Vec<String>,

    /// Every friend.
    pub detailed_friends: Vec<Friend>,
}

/// The results of a complete crawl of one Redditor.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct CrawlSummary {
    /// Username.
    pub username: String,

    /// When the crawl started.
    pub crawl_timestamp: DateTime<Utc>,

    /// The Redditor's profile.
    pub user_info: Outcome<ProfileReport>,

    /// The subreddits the Redditor is active in.
    pub active_subreddits: Outcome<Vec<String>>,

    /// Number of active subreddits, if they could be found.
    pub active_subreddits_count: Option<usize>,
}

/// Crawls Reddit and saves what it finds.
#[derive(Debug)]
pub struct Crawler<S: Service = RedditService, C: Clock = SystemClock> {
    client: RedditClient<S>,
    sink: JsonSink<C>,
}

impl<S: Service, C: Clock> Crawler<S, C> {
    /// Creates a crawler that fetches with `client` and saves to `sink`.
    pub fn new(client: RedditClient<S>, sink: JsonSink<C>) -> Self {
        Self { client, sink }
    }

    /// The client used to fetch data.
    pub fn client(&self) -> &RedditClient<S> {
        &self.client
    }

    /// Where results are saved.
    pub fn sink(&self) -> &JsonSink<C> {
        &self.sink
    }

    /// Fetches and saves a Redditor's public profile.
    pub async fn user_public_info(&self, username: &str) -> Result<ProfileReport> {
        info!("Fetching profile for {username}");
        let profile = self.client.user_profile(username).await?;
        let account_age_days = profile.age_in_days(self.sink.clock());
        let report = ProfileReport {
            profile,
            account_age_days,
        };
        self.save(&format!("user_public_info_{username}"), &report)?;
        Ok(report)
    }

    /// Fetches and saves up to `limit` of a Redditor's newest posts and
    /// comments.
    pub async fn user_recent_activity(&self, username: &str, limit: usize) -> Result<RecentActivity> {
        info!("Fetching up to {limit} posts and comments for {username}");
        let activity = self.client.recent_activity(username, limit).await?;
        if activity.is_empty() {
            info!("{username} has no recent activity");
        }
        self.save(&format!("user_recent_activity_{username}"), &activity)?;
        Ok(activity)
    }

    /// Finds and saves the subreddits a Redditor is active in, based on
    /// up to `limit` of their newest posts and comments.
    ///
    /// The recent activity the tally is built from is saved as well.
    pub async fn active_subreddits(&self, username: &str, limit: usize) -> Result<ActiveSubredditsReport> {
        let activity = self.user_recent_activity(username, limit).await?;
        let communities = ActiveCommunities::from_activity(&activity);
        let report = ActiveSubredditsReport {
            username: username.to_string(),
            total_active_subreddits: communities.len(),
            communities,
        };
        self.save(&format!("active_subreddits_{username}"), &report)?;
        Ok(report)
    }

    /// Fetches and saves the authenticated account's subscriptions.
    pub async fn my_subscriptions(&self) -> Result<SubscriptionsReport> {
        info!("Fetching subscriptions");
        let subscriptions = self.client.subscriptions().await?;
        let mut names: Vec<String> = subscriptions.iter().map(|s| s.name.clone()).collect();
        names.sort();
        let report = SubscriptionsReport {
            total_subscriptions: subscriptions.len(),
            subscriptions_list: names,
            detailed_subscriptions: subscriptions,
        };
        self.save("my_subscriptions", &report)?;
        Ok(report)
    }

    /// Fetches and saves the authenticated account's friends.
    pub async fn my_friends(&self) -> Result<FriendsReport> {
        info!("Fetching friends");
        let friends = self.client.friends().await?;
        let report = FriendsReport {
            total_friends: friends.len(),
            friends_list: friends.iter().map(|f| f.username.clone()).collect(),
            detailed_friends: friends,
        };
        self.save("my_friends", &report)?;
        Ok(report)
    }

    /// Crawls a Redditor's profile and active subreddits and saves a
    /// summary of the crawl.
    ///
    /// A failed step is logged and recorded in the summary; only an invalid
    /// username or failing to save the summary itself is an error.
    pub async fn crawl_user_complete(&self, username: &str) -> Result<CrawlSummary> {
        client::validate_username(username)?;
        let crawl_timestamp = self.sink.clock().now();
        info!("Starting complete crawl of {username}");

        let user_info = self.user_public_info(username).await;
        if let Err(err) = &user_info {
            warn!("Could not fetch profile for {username}: {err}");
        }

        let active = self.active_subreddits(username, DEFAULT_SUBREDDIT_LIMIT).await;
        if let Err(err) = &active {
            warn!("Could not find active subreddits for {username}: {err}");
        }
        let active_subreddits_count = active.as_ref().ok().map(|report| report.total_active_subreddits);
        let active_subreddits = active.map(|report| report.communities.sorted_communities);

        let summary = CrawlSummary {
            username: username.to_string(),
            crawl_timestamp,
            user_info: user_info.into(),
            active_subreddits: active_subreddits.into(),
            active_subreddits_count,
        };
        self.save(&format!("crawl_summary_{username}"), &summary)?;
        info!("Finished complete crawl of {username}");
        Ok(summary)
    }

    fn save<T: Serialize>(&self, data_type: &str, data: &T) -> Result<PathBuf> {
        Ok(self.sink.save(data_type, data)?)
    }
}
