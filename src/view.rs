//! Draws crawl results into a terminal window.

use crate::activity::{ActivityItem, RecentActivity};
use crate::aggregate::SortAlgorithm;
use crate::clock::{DateTime, Utc};
use crate::crawler::{
    ActiveSubredditsReport, CrawlSummary, FriendsReport, Outcome, ProfileReport,
    SubscriptionsReport,
};
use colored::Colorize;
use indoc::formatdoc;

const DATE_FORMAT: &str = "%b %d, %Y %H:%M UTC";

/// View renderer options.
#[derive(Debug, Default)]
pub struct ViewOptions {
    oneline: bool,
    sort_algorithm: SortAlgorithm,
}

impl ViewOptions {
    /// Incrementally builds a new set of view options.
    ///
    /// # Examples
    ///
    /// ```
    /// use redcrawl::aggregate::SortAlgorithm;
    /// use redcrawl::view::ViewOptions;
    /// let opts = ViewOptions::build()
    ///     .oneline(true)
    ///     .sort_algorithm(SortAlgorithm::Numerically)
    ///     .build();
    /// ```
    pub fn build() -> ViewOptionsBuilder {
        ViewOptionsBuilder::default()
    }
}

/// A builder for view options.
///
/// You probably don't want to use this directly; call [`ViewOptions::build()`]
/// and construct it incrementally instead.
#[derive(Debug, Default)]
#[must_use]
pub struct ViewOptionsBuilder {
    oneline: bool,
    sort_algorithm: SortAlgorithm,
}

impl ViewOptionsBuilder {
    /// Sets the "oneline" option to true or false.
    pub fn oneline(mut self, oneline: bool) -> Self {
        self.oneline = oneline;
        self
    }

    /// Sets the order of subreddit tallies.
    pub fn sort_algorithm(mut self, sort_algorithm: SortAlgorithm) -> Self {
        self.sort_algorithm = sort_algorithm;
        self
    }

    /// Finalizes the [`ViewOptions`].
    pub fn build(self) -> ViewOptions {
        ViewOptions {
            oneline: self.oneline,
            sort_algorithm: self.sort_algorithm,
        }
    }
}

/// Marks an item that can be converted into a string for display on a terminal.
pub trait Viewable {
    /// Converts the item into a string for display on a terminal.
    fn view(&self, opts: &ViewOptions) -> String;
}

fn format_date(datetime: &DateTime<Utc>) -> String {
    datetime.format(DATE_FORMAT).to_string()
}

fn format_flag(flag: Option<bool>) -> &'static str {
    match flag {
        Some(true) => "yes",
        Some(false) => "no",
        None => "unknown",
    }
}

impl Viewable for ProfileReport {
    fn view(&self, _: &ViewOptions) -> String {
        formatdoc! {"
            {}
            Created: {} ({:.0} days ago)
            Link Karma: {}
            Comment Karma: {}
            Verified: {}
            Premium: {}",
            self.profile.username.bold(),
            format_date(&self.profile.created_at),
            self.account_age_days,
            self.profile.link_karma,
            self.profile.comment_karma,
            format_flag(self.profile.is_verified),
            format_flag(self.profile.has_premium),
        }
    }
}

impl Viewable for ActivityItem {
    fn view(&self, opts: &ViewOptions) -> String {
        match self {
            ActivityItem::Post(post) if opts.oneline => {
                format!("{} {}", post.subreddit.green(), post.title)
            }
            ActivityItem::Comment(comment) if opts.oneline => {
                format!("{} {}", comment.subreddit.green(), comment.body.replace('\n', " "))
            }
            ActivityItem::Post(post) => formatdoc! {"
                {}
                {}
                {} \u{2022} {} points \u{2022} {} comments

                {}",
                post.subreddit.green(),
                post.title.bold(),
                format_date(&post.created_at).yellow(),
                post.score,
                post.comment_count,
                post.url.blue(),
            },
            ActivityItem::Comment(comment) => formatdoc! {"
                {}
                {}
                {} \u{2022} {} points

                {}",
                comment.subreddit.green(),
                comment.parent_title.bold(),
                format_date(&comment.created_at).yellow(),
                comment.score,
                comment.body,
            },
        }
    }
}

impl Viewable for RecentActivity {
    fn view(&self, opts: &ViewOptions) -> String {
        if self.is_empty() {
            return format!("{} has no recent activity", self.username);
        }
        let separator = if opts.oneline { "\n" } else { "\n\n\n" };
        self.items()
            .iter()
            .map(|item| item.view(opts))
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl Viewable for ActiveSubredditsReport {
    fn view(&self, opts: &ViewOptions) -> String {
        if self.communities.is_empty() {
            return format!("{} is not active in any subreddits", self.username);
        }
        let tallies = self.communities.sort_by(opts.sort_algorithm);
        let width = tallies.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
        tallies
            .iter()
            .map(|(name, activity)| {
                format!(
                    "{name:<width$}  {:>3}  ({} posts, {} comments)",
                    activity.total(),
                    activity.post_count,
                    activity.comment_count,
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Viewable for SubscriptionsReport {
    fn view(&self, opts: &ViewOptions) -> String {
        if opts.oneline {
            return self.subscriptions_list.join("\n");
        }
        let mut s = format!("Subscribed to {} subreddits\n", self.total_subscriptions);
        for subscription in &self.detailed_subscriptions {
            let subscribers = subscription
                .subscribers
                .map(|n| format!("{n} subscribers"))
                .unwrap_or_else(|| "subscribers hidden".to_string());
            s += &format!(
                "\n{} {} ({subscribers})",
                subscription.name.green(),
                subscription.title,
            );
        }
        s
    }
}

impl Viewable for FriendsReport {
    fn view(&self, _: &ViewOptions) -> String {
        let mut s = format!("{} friends", self.total_friends);
        for friend in &self.detailed_friends {
            s += &format!(
                "\n{} (since {})",
                friend.username.green(),
                format_date(&friend.date_added)
            );
        }
        s
    }
}

fn format_outcome<T>(outcome: &Outcome<T>) -> String {
    match outcome {
        Outcome::Fetched { .. } => "fetched".green().to_string(),
        Outcome::Failed { reason } => format!("{} ({reason})", "failed".red()),
    }
}

impl Viewable for CrawlSummary {
    fn view(&self, _: &ViewOptions) -> String {
        let count = self
            .active_subreddits_count
            .map(|n| format!(", {n} subreddits"))
            .unwrap_or_default();
        formatdoc! {"
            Crawled {} at {}
            Profile: {}
            Active subreddits: {}{}",
            self.username.bold(),
            format_date(&self.crawl_timestamp),
            format_outcome(&self.user_info),
            format_outcome(&self.active_subreddits),
            count,
        }
    }
}
