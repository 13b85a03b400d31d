// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! redcrawl collects what a Redditor does in public and saves it as JSON.
//! It reads a user's profile and their most recent posts and comments,
//! works out which subreddits they are active in, and writes every result
//! to a timestamped JSON file. When given a Reddit login it can also save
//! the account's own subscriptions and friends.
//!
//! # Examples
//!
//! (In all examples, replace `reddit_user` with the actual username of a
//! Redditor.)
//!
//! Save a user's public profile:
//!
//! ```bash
//! redcrawl info reddit_user
//! ```
//!
//! Save a user's 25 most recent posts and 25 most recent comments:
//!
//! ```bash
//! redcrawl activity reddit_user
//! ```
//!
//! Tally the subreddits a user is active in, busiest first:
//!
//! ```bash
//! redcrawl subreddits -c reddit_user
//! ```
//!
//! Crawl a user completely, then save your own subscriptions and friends:
//!
//! ```bash
//! redcrawl crawl --mine reddit_user
//! ```
//!
//! Results are written to `reddit_data/` unless `--output-dir` says
//! otherwise. Each file holds a `{timestamp, data_type, data}` document.
//!
//! # Reddit API Setup
//!
//! redcrawl talks to the Reddit API as a "script" app:
//!
//! 1. Create an app at <https://www.reddit.com/prefs/apps>.
//! 2. Copy its client ID and secret into `$REDDIT_CLIENT_ID` and
//!    `$REDDIT_CLIENT_SECRET`, or into `secrets.json`.
//! 3. To read your own subscriptions and friends, also set
//!    `$REDDIT_USERNAME` and `$REDDIT_PASSWORD`.
//!
//! The first run without credentials writes a template `secrets.json` to
//! fill in. See the [`conf`] module for details. **Never commit the secrets
//! file to version control.**
//!
//! # License
//!
//! redcrawl is licensed under the terms of the [Apache License 2.0]. Please
//! see the LICENSE file accompanying this source code or visit the previous
//! link for more information on licensing.
//!
//! [Apache License 2.0]: https://www.apache.org/licenses/LICENSE-2.0

pub mod activity;
pub mod aggregate;
pub mod cli;
pub mod clock;
pub mod conf;
pub mod crawler;
pub mod http;
pub mod persist;
pub mod reddit;
pub mod text;
pub mod throttle;
pub mod view;

#[cfg(test)]
mod test_utils;
