//! A "thing" in the Reddit sense.
//!
//! Historically in the Reddit API and its old source code, a "Thing" was
//! any element of the Reddit system: users, posts, comments, etc. This
//! module mirrors the JSON shapes the API returns so they can be parsed
//! with serde and projected into the crate's own types.

use crate::clock::{DateTime, Utc, deserialize_timestamp};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// A single thing wrapped in its kind tag (`t1`, `t2`, `t3`, `t5`, ...).
#[derive(Debug, Deserialize)]
pub struct Thing<T> {
    /// The kind of thing.
    pub kind: String,

    /// The thing itself.
    pub data: T,
}

/// A page of things.
#[derive(Debug, Deserialize)]
pub struct Listing<T> {
    data: ListingData<T>,
}

#[derive(Debug, Deserialize)]
struct ListingData<T> {
    #[serde(default = "Vec::new")]
    children: Vec<Child<T>>,
    #[serde(default)]
    after: Option<String>,
}

// Friends are returned as a `UserList` whose children are not wrapped in
// a kind tag, while every other listing wraps each child in a `Thing`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Child<T> {
    Thing(Thing<T>),
    Bare(T),
}

impl<T> Child<T> {
    fn into_data(self) -> T {
        match self {
            Child::Thing(thing) => thing.data,
            Child::Bare(data) => data,
        }
    }
}

impl<T: DeserializeOwned> Listing<T> {
    /// Parses a JSON listing.
    pub fn parse(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl<T> Listing<T> {
    /// Splits the page into its items and the cursor of the next page.
    pub fn into_parts(self) -> (Vec<T>, Option<String>) {
        let items = self
            .data
            .children
            .into_iter()
            .map(Child::into_data)
            .collect();
        let after = self.data.after.filter(|after| !after.is_empty());
        (items, after)
    }
}

/// Account data from `/user/<user>/about`.
#[derive(Debug, Deserialize)]
pub struct AboutData {
    /// Username.
    pub name: String,

    /// Account creation date. Missing for suspended accounts.
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub created_utc: Option<DateTime<Utc>>,

    /// Karma from comments.
    #[serde(default)]
    pub comment_karma: i64,

    /// Karma from posts.
    #[serde(default)]
    pub link_karma: i64,

    /// True if the account has been verified.
    pub verified: Option<bool>,

    /// True if the account has Reddit Premium.
    pub is_gold: Option<bool>,

    /// True if the account is suspended.
    #[serde(default)]
    pub is_suspended: bool,
}

/// A post (`t3`).
#[derive(Debug, Deserialize)]
pub struct SubmissionData {
    /// Post title.
    pub title: String,

    /// Subreddit the post was submitted to.
    pub subreddit: String,

    /// Submission date.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_utc: DateTime<Utc>,

    /// Post score.
    #[serde(default)]
    pub score: i64,

    /// Site-relative link to the post's comments page.
    pub permalink: String,

    /// Number of comments on the post.
    #[serde(default)]
    pub num_comments: u64,
}

/// A comment (`t1`).
#[derive(Debug, Deserialize)]
pub struct CommentData {
    /// Comment text, in Markdown.
    pub body: String,

    /// Subreddit the comment was made in.
    pub subreddit: String,

    /// Comment date.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_utc: DateTime<Utc>,

    /// Comment score.
    #[serde(default)]
    pub score: i64,

    /// Title of the post the comment belongs to.
    #[serde(default)]
    pub link_title: String,
}

/// A subreddit (`t5`).
#[derive(Debug, Deserialize)]
pub struct SubredditData {
    /// Subreddit name without the `r/` prefix.
    pub display_name: String,

    /// Subreddit title.
    #[serde(default)]
    pub title: String,

    /// Number of subscribers, when the subreddit reveals it.
    pub subscribers: Option<u64>,

    /// Creation date.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_utc: DateTime<Utc>,

    /// Short public description.
    #[serde(default)]
    pub public_description: Option<String>,
}

/// An entry in the authenticated account's friend list.
#[derive(Debug, Deserialize)]
pub struct FriendData {
    /// Friend's username.
    pub name: String,

    /// When the friend was added.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub date: DateTime<Utc>,
}

fn deserialize_optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "deserialize_timestamp")] DateTime<Utc>);

    let wrapper = Option::<Wrapper>::deserialize(deserializer)?;
    Ok(wrapper.map(|Wrapper(datetime)| datetime))
}
