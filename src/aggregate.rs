//! Groups a Redditor's activity by subreddit.

use crate::activity::{Comment, HasSubreddit, Post, RecentActivity};
use counter::Counter;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of posts and comments a Redditor made in one subreddit.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct CommunityActivity {
    /// Number of posts.
    pub post_count: usize,

    /// Number of comments.
    pub comment_count: usize,
}

impl CommunityActivity {
    /// Posts and comments combined.
    pub fn total(&self) -> usize {
        self.post_count + self.comment_count
    }
}

/// Differentiates between the different sorting algorithms used to
/// return subreddit tallies.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum SortAlgorithm {
    /// Sort by name of subreddit, ignoring case.
    #[default]
    Lexicographically,

    /// Sort by total activity in each subreddit, busiest first.
    Numerically,
}

/// A pair of subreddit name and its activity.
pub type CommunityTally = (String, CommunityActivity);

/// The subreddits a Redditor is active in.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ActiveCommunities {
    /// Distinct subreddit names in byte order.
    pub sorted_communities: Vec<String>,

    /// Activity per subreddit.
    pub community_activity: BTreeMap<String, CommunityActivity>,
}

impl ActiveCommunities {
    /// Groups and counts posts and comments by subreddit.
    pub fn tally(posts: &[Post], comments: &[Comment]) -> Self {
        let post_counts = count(posts.iter());
        let comment_counts = count(comments.iter());

        let mut community_activity: BTreeMap<String, CommunityActivity> = BTreeMap::new();
        for (subreddit, n) in post_counts {
            community_activity.entry(subreddit).or_default().post_count = n;
        }
        for (subreddit, n) in comment_counts {
            community_activity.entry(subreddit).or_default().comment_count = n;
        }

        let sorted_communities = community_activity.keys().cloned().collect();
        Self {
            sorted_communities,
            community_activity,
        }
    }

    /// Groups and counts a Redditor's recent activity by subreddit.
    pub fn from_activity(activity: &RecentActivity) -> Self {
        Self::tally(&activity.posts, &activity.comments)
    }

    /// Number of distinct subreddits.
    pub fn len(&self) -> usize {
        self.sorted_communities.len()
    }

    /// True if the Redditor is not active anywhere.
    pub fn is_empty(&self) -> bool {
        self.sorted_communities.is_empty()
    }

    /// Sorts the tallies by subreddit name or by total activity.
    pub fn sort_by(&self, algo: SortAlgorithm) -> Vec<CommunityTally> {
        let entries = self
            .community_activity
            .iter()
            .map(|(subreddit, activity)| (subreddit.to_owned(), *activity));
        match algo {
            SortAlgorithm::Lexicographically => entries
                .sorted_by(|(lhs, _), (rhs, _)| {
                    Ord::cmp(&lhs.to_lowercase(), &rhs.to_lowercase())
                })
                .collect(),
            SortAlgorithm::Numerically => entries
                .sorted_by(|(lhs_name, lhs), (rhs_name, rhs)| {
                    Ord::cmp(&rhs.total(), &lhs.total()).then_with(|| {
                        Ord::cmp(&lhs_name.to_lowercase(), &rhs_name.to_lowercase())
                    })
                })
                .collect(),
        }
    }
}

fn count<'a, T: HasSubreddit + 'a>(iter: impl Iterator<Item = &'a T>) -> Counter<String> {
    iter.map(|item| String::from(item.subreddit()))
        .collect::<Counter<_>>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::DateTime;
    use pretty_assertions::assert_eq;

    fn post(subreddit: &str) -> Post {
        Post {
            title: "A post".to_string(),
            subreddit: subreddit.to_string(),
            created_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            score: 1,
            url: "https://reddit.com/r/test/comments/1/a_post/".to_string(),
            comment_count: 0,
        }
    }

    fn comment(subreddit: &str) -> Comment {
        Comment {
            body: "A comment".to_string(),
            subreddit: subreddit.to_string(),
            created_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            score: 1,
            parent_title: "A post".to_string(),
        }
    }

    #[test]
    fn it_tallies_posts_and_comments_by_subreddit() {
        let posts = vec![post("rust"), post("golang")];
        let comments = vec![comment("rust"), comment("rust"), comment("python")];
        let communities = ActiveCommunities::tally(&posts, &comments);

        assert_eq!(communities.sorted_communities, vec!["golang", "python", "rust"]);
        assert_eq!(
            communities.community_activity["rust"],
            CommunityActivity {
                post_count: 1,
                comment_count: 2
            }
        );
        assert_eq!(
            communities.community_activity["golang"],
            CommunityActivity {
                post_count: 1,
                comment_count: 0
            }
        );
        assert_eq!(
            communities.community_activity["python"],
            CommunityActivity {
                post_count: 0,
                comment_count: 1
            }
        );
    }

    #[test]
    fn it_counts_a_community_seen_in_posts_and_comments_once() {
        let posts = vec![post("go"), post("rust")];
        let comments = vec![comment("go")];
        let communities = ActiveCommunities::tally(&posts, &comments);

        let expected = BTreeMap::from([
            (
                "go".to_string(),
                CommunityActivity {
                    post_count: 1,
                    comment_count: 1,
                },
            ),
            (
                "rust".to_string(),
                CommunityActivity {
                    post_count: 1,
                    comment_count: 0,
                },
            ),
        ]);
        assert_eq!(communities.sorted_communities, vec!["go", "rust"]);
        assert_eq!(communities.community_activity, expected);
    }

    #[test]
    fn it_sums_counts_to_the_number_of_items() {
        let posts = vec![post("a"), post("b"), post("a"), post("C")];
        let comments = vec![comment("b"), comment("d"), comment("d")];
        let communities = ActiveCommunities::tally(&posts, &comments);

        let post_total: usize = communities
            .community_activity
            .values()
            .map(|a| a.post_count)
            .sum();
        let comment_total: usize = communities
            .community_activity
            .values()
            .map(|a| a.comment_count)
            .sum();
        assert_eq!((post_total, comment_total), (4, 3));
        assert_eq!(communities.len(), communities.community_activity.len());
    }

    #[test]
    fn it_sorts_communities_by_byte_order() {
        let posts = vec![post("rust"), post("AskReddit"), post("golang")];
        let communities = ActiveCommunities::tally(&posts, &[]);
        assert_eq!(communities.sorted_communities, vec!["AskReddit", "golang", "rust"]);
    }

    #[test]
    fn it_tallies_the_same_regardless_of_order() {
        let posts = vec![post("rust"), post("golang"), post("rust"), post("Zig")];
        let comments = vec![comment("zig"), comment("rust"), comment("python"), comment("zig")];
        let expected = ActiveCommunities::tally(&posts, &comments);

        let reversed_posts: Vec<_> = posts.iter().rev().cloned().collect();
        let reversed_comments: Vec<_> = comments.iter().rev().cloned().collect();
        assert_eq!(
            ActiveCommunities::tally(&reversed_posts, &reversed_comments),
            expected
        );

        let mut rotated_posts = posts.clone();
        rotated_posts.rotate_left(1);
        let mut rotated_comments = comments.clone();
        rotated_comments.rotate_right(2);
        assert_eq!(
            ActiveCommunities::tally(&rotated_posts, &rotated_comments),
            expected
        );
    }

    #[test]
    fn it_tallies_nothing_for_empty_activity() {
        let communities = ActiveCommunities::tally(&[], &[]);
        assert!(communities.is_empty());
        assert!(communities.community_activity.is_empty());
    }

    #[test]
    fn it_tallies_from_recent_activity() {
        let recent = RecentActivity {
            username: "tester".to_string(),
            posts: vec![post("rust")],
            comments: vec![comment("rust")],
        };
        let communities = ActiveCommunities::from_activity(&recent);
        assert_eq!(communities.community_activity["rust"].total(), 2);
    }

    #[test]
    fn it_sorts_tallies_by_subreddit_name() {
        let posts = vec![post("rust"), post("AskReddit"), post("golang"), post("rust")];
        let actual: Vec<_> = ActiveCommunities::tally(&posts, &[])
            .sort_by(SortAlgorithm::Lexicographically)
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(actual, vec!["AskReddit", "golang", "rust"]);
    }

    #[test]
    fn it_sorts_tallies_by_activity() {
        let posts = vec![post("rust"), post("golang"), post("Zig")];
        let comments = vec![comment("rust"), comment("zig"), comment("zig")];
        let actual: Vec<_> = ActiveCommunities::tally(&posts, &comments)
            .sort_by(SortAlgorithm::Numerically)
            .into_iter()
            .map(|(name, activity)| (name, activity.total()))
            .collect();
        let expected: Vec<(String, usize)> = vec![
            ("rust".to_string(), 2),
            ("zig".to_string(), 2),
            ("golang".to_string(), 1),
            ("Zig".to_string(), 1),
        ];
        assert_eq!(actual, expected);
    }
}
