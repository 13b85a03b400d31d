//! A Redditor's public profile and recent activity.

use crate::clock::{DateTime, HasAge, Utc};
use crate::reddit::thing::{AboutData, CommentData, FriendData, SubmissionData, SubredditData};
use crate::text;
use serde::{Deserialize, Serialize};

/// A thing that is attached to a subreddit.
pub trait HasSubreddit {
    /// The subreddit the thing appears in.
    fn subreddit(&self) -> &str;
}

/// A snapshot of a Redditor's public profile.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct UserProfile {
    /// Username.
    pub username: String,

    /// When the account was created.
    pub created_at: DateTime<Utc>,

    /// Karma from comments.
    pub comment_karma: i64,

    /// Karma from posts.
    pub link_karma: i64,

    /// True if the account is verified, when Reddit says.
    pub is_verified: Option<bool>,

    /// True if the account has Reddit Premium, when Reddit says.
    pub has_premium: Option<bool>,
}

impl UserProfile {
    /// Projects raw account data into a profile.
    ///
    /// Returns `None` if the data has no creation date, which is the case
    /// for suspended accounts.
    pub fn from_about(about: AboutData) -> Option<Self> {
        Some(Self {
            username: about.name,
            created_at: about.created_utc?,
            comment_karma: about.comment_karma,
            link_karma: about.link_karma,
            is_verified: about.verified,
            has_premium: about.is_gold,
        })
    }
}

impl HasAge for UserProfile {
    fn created_utc(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// A post submitted by a Redditor.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Post {
    /// Title.
    pub title: String,

    /// Subreddit the post was submitted to.
    pub subreddit: String,

    /// Submission date.
    pub created_at: DateTime<Utc>,

    /// Score.
    pub score: i64,

    /// Link to the post's comments page.
    pub url: String,

    /// Number of comments on the post.
    pub comment_count: u64,
}

impl From<SubmissionData> for Post {
    fn from(data: SubmissionData) -> Self {
        Self {
            title: text::convert_html_entities(&data.title),
            subreddit: data.subreddit,
            created_at: data.created_utc,
            score: data.score,
            url: format!("https://reddit.com{}", data.permalink),
            comment_count: data.num_comments,
        }
    }
}

impl HasSubreddit for Post {
    fn subreddit(&self) -> &str {
        &self.subreddit
    }
}

/// A comment made by a Redditor.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Comment {
    /// Comment text, shortened to an excerpt.
    pub body: String,

    /// Subreddit the comment was made in.
    pub subreddit: String,

    /// Comment date.
    pub created_at: DateTime<Utc>,

    /// Score.
    pub score: i64,

    /// Title of the post the comment replies to.
    pub parent_title: String,
}

impl From<CommentData> for Comment {
    fn from(data: CommentData) -> Self {
        Self {
            body: text::excerpt(&data.body),
            subreddit: data.subreddit,
            created_at: data.created_utc,
            score: data.score,
            parent_title: text::convert_html_entities(&data.link_title),
        }
    }
}

impl HasSubreddit for Comment {
    fn subreddit(&self) -> &str {
        &self.subreddit
    }
}

/// Either kind of public activity.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActivityItem {
    /// A submitted post.
    Post(Post),

    /// A comment.
    Comment(Comment),
}

impl ActivityItem {
    /// When the item was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            ActivityItem::Post(post) => post.created_at,
            ActivityItem::Comment(comment) => comment.created_at,
        }
    }
}

impl HasSubreddit for ActivityItem {
    fn subreddit(&self) -> &str {
        match self {
            ActivityItem::Post(post) => post.subreddit(),
            ActivityItem::Comment(comment) => comment.subreddit(),
        }
    }
}

/// A Redditor's most recent posts and comments.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(into = "RecentActivityRecord", from = "RecentActivityRecord")]
pub struct RecentActivity {
    /// Username.
    pub username: String,

    /// Most recent posts, newest first.
    pub posts: Vec<Post>,

    /// Most recent comments, newest first.
    pub comments: Vec<Comment>,
}

impl RecentActivity {
    /// True if the Redditor has neither posts nor comments.
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty() && self.comments.is_empty()
    }

    /// All activity, newest first.
    pub fn items(&self) -> Vec<ActivityItem> {
        let mut items: Vec<ActivityItem> = self
            .posts
            .iter()
            .cloned()
            .map(ActivityItem::Post)
            .chain(self.comments.iter().cloned().map(ActivityItem::Comment))
            .collect();
        items.sort_by_key(|item| std::cmp::Reverse(item.created_at()));
        items
    }
}

// On-disk shape of `RecentActivity`, which also carries the counts.
#[derive(Deserialize, Serialize)]
struct RecentActivityRecord {
    username: String,
    posts_count: usize,
    comments_count: usize,
    recent_posts: Vec<Post>,
    recent_comments: Vec<Comment>,
}

impl From<RecentActivity> for RecentActivityRecord {
    fn from(activity: RecentActivity) -> Self {
        Self {
            username: activity.username,
            posts_count: activity.posts.len(),
            comments_count: activity.comments.len(),
            recent_posts: activity.posts,
            recent_comments: activity.comments,
        }
    }
}

impl From<RecentActivityRecord> for RecentActivity {
    fn from(record: RecentActivityRecord) -> Self {
        Self {
            username: record.username,
            posts: record.recent_posts,
            comments: record.recent_comments,
        }
    }
}

/// A subreddit the authenticated account subscribes to.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Subscription {
    /// Subreddit name.
    pub name: String,

    /// Subreddit title.
    pub title: String,

    /// Number of subscribers, if public.
    pub subscribers: Option<u64>,

    /// When the subreddit was created.
    pub created_at: DateTime<Utc>,

    /// Public description, shortened to an excerpt.
    pub description: String,
}

impl From<SubredditData> for Subscription {
    fn from(data: SubredditData) -> Self {
        Self {
            name: data.display_name,
            title: text::convert_html_entities(&data.title),
            subscribers: data.subscribers,
            created_at: data.created_utc,
            description: text::excerpt(data.public_description.as_deref().unwrap_or_default()),
        }
    }
}

/// A Redditor the authenticated account has befriended.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Friend {
    /// Friend's username.
    pub username: String,

    /// When the friend was added.
    pub date_added: DateTime<Utc>,
}

impl From<FriendData> for Friend {
    fn from(data: FriendData) -> Self {
        Self {
            username: data.name,
            date_added: data.date,
        }
    }
}
