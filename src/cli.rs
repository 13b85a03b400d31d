//! Drives the command-line program.

use crate::aggregate::SortAlgorithm;
use crate::clock::{Clock, SystemClock};
use crate::conf::{self, Credentials, DEFAULT_OUTPUT_DIR, DEFAULT_SECRETS_FILE};
use crate::crawler::{self, Crawler, DEFAULT_ACTIVITY_LIMIT, DEFAULT_SUBREDDIT_LIMIT};
use crate::persist::{self, JsonSink};
use crate::reddit::client::{self, RedditClient};
use crate::reddit::service::{RedditService, Service};
use crate::view::{ViewOptions, Viewable};
use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::Verbosity;
use indoc::formatdoc;
use log::warn;
use std::path::PathBuf;
use std::process;
use thiserror::Error;

/// Prints `message` to standard error and exits with `error_code`.
pub fn die(error_code: i32, message: &str) -> ! {
    eprintln!("{}", message);
    process::exit(error_code);
}

/// Errors that stop the program.
#[derive(Debug, Error)]
pub enum Error {
    /// Credentials could not be loaded.
    #[error(transparent)]
    Credentials(#[from] conf::Error),

    /// Could not connect to Reddit.
    #[error(transparent)]
    Connect(#[from] client::Error),

    /// The output directory could not be prepared.
    #[error(transparent)]
    Output(#[from] persist::Error),

    /// A crawl operation failed.
    #[error(transparent)]
    Crawl(#[from] crawler::Error),
}

impl Error {
    /// A message explaining the error to the person running the program.
    pub fn help(&self) -> String {
        match self {
            Error::Credentials(conf::Error::Missing { path, created }) => {
                let template = if *created {
                    format!("A template has been written to {}.", path.display())
                } else {
                    format!("Fill in the missing values in {}.", path.display())
                };
                formatdoc! {"
                    Reddit API credentials are missing.

                    Create a \"script\" app at https://www.reddit.com/prefs/apps and
                    either set these environment variables:

                        export REDDIT_CLIENT_ID=<client id>
                        export REDDIT_CLIENT_SECRET=<client secret>
                        export REDDIT_USERNAME=<username>   # optional
                        export REDDIT_PASSWORD=<password>   # optional

                    or put the same values in the secrets file. {template}
                    Never commit the secrets file to version control."
                }
            }
            err => err.to_string(),
        }
    }
}

/// Program configuration.
#[derive(Debug, Parser)]
#[command(version)]
#[command(about = "Collects a Redditor's profile, activity, and active subreddits into JSON files", long_about = None
)]
pub struct Config {
    #[command(flatten)]
    verbosity: Verbosity,

    /// Directory JSON results are written to
    #[arg(long, global = true, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Secrets file holding Reddit API credentials
    #[arg(long, global = true, default_value = DEFAULT_SECRETS_FILE)]
    secrets: PathBuf,

    #[command(subcommand)]
    command: Command,
}

impl Config {
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn output_dir(&self) -> &PathBuf {
        &self.output_dir
    }

    pub fn secrets(&self) -> &PathBuf {
        &self.secrets
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Retrieve a user's public profile
    Info {
        /// Reddit username
        username: String,
    },

    /// Retrieve a user's recent posts and comments
    #[clap(alias = "log")]
    Activity {
        /// Reddit username
        username: String,

        /// Number of posts and of comments to read
        #[arg(short = 'n', long, default_value_t = DEFAULT_ACTIVITY_LIMIT)]
        limit: usize,

        /// Output activity in a more compact form
        #[arg(long, default_value_t = false)]
        oneline: bool,
    },

    /// Tally the subreddits a user is active in
    #[clap(alias = "tally")]
    Subreddits(TallyConfig),

    /// Retrieve the subreddits the logged-in account subscribes to
    Subscriptions {
        /// Only list subreddit names
        #[arg(long, default_value_t = false)]
        oneline: bool,
    },

    /// Retrieve the logged-in account's friends
    Friends,

    /// Crawl a user's profile and active subreddits
    Crawl {
        /// Reddit username
        username: String,

        /// Also crawl the logged-in account's subscriptions and friends
        #[arg(long, default_value_t = false)]
        mine: bool,
    },
}

#[derive(Args, Debug)]
struct TallyConfig {
    /// Reddit username
    username: String,

    /// Number of posts and of comments to read
    #[arg(short = 'n', long, default_value_t = DEFAULT_SUBREDDIT_LIMIT)]
    limit: usize,

    /// Sort output by activity instead of alphabetically by subreddit
    #[arg(short = 'c', long = "count", default_value_t = false)]
    sort_by_count: bool,
}

impl TallyConfig {
    fn sort_algorithm(&self) -> SortAlgorithm {
        if self.sort_by_count {
            SortAlgorithm::Numerically
        } else {
            SortAlgorithm::Lexicographically
        }
    }
}

/// Runs the command-line program.
#[derive(Debug)]
pub struct Runner<S: Service = RedditService, C: Clock = SystemClock> {
    config: Config,
    crawler: Crawler<S, C>,
}

impl Runner {
    /// Loads credentials, connects to Reddit, and prepares the output
    /// directory named by `config`.
    pub async fn connect(config: Config) -> Result<Self, Error> {
        let credentials = Credentials::load(config.secrets())?;
        let client = RedditClient::connect(&credentials).await?;
        let sink = JsonSink::new(config.output_dir(), SystemClock)?;
        Ok(Self::new(config, Crawler::new(client, sink)))
    }
}

impl<S: Service, C: Clock> Runner<S, C> {
    /// Creates a new program runner using the given `config` and `crawler`.
    pub fn new(config: Config, crawler: Crawler<S, C>) -> Self {
        Self { config, crawler }
    }

    /// Runs the command-line program and returns its output.
    pub async fn run(&self) -> Result<String, Error> {
        match &self.config.command {
            Command::Info { username } => {
                let report = self.crawler.user_public_info(username).await?;
                Ok(report.view(&ViewOptions::default()))
            }
            Command::Activity {
                username,
                limit,
                oneline,
            } => {
                let activity = self.crawler.user_recent_activity(username, *limit).await?;
                Ok(activity.view(&ViewOptions::build().oneline(*oneline).build()))
            }
            Command::Subreddits(config) => {
                let report = self
                    .crawler
                    .active_subreddits(&config.username, config.limit)
                    .await?;
                let opts = ViewOptions::build()
                    .sort_algorithm(config.sort_algorithm())
                    .build();
                Ok(report.view(&opts))
            }
            Command::Subscriptions { oneline } => {
                let report = self.crawler.my_subscriptions().await?;
                Ok(report.view(&ViewOptions::build().oneline(*oneline).build()))
            }
            Command::Friends => {
                let report = self.crawler.my_friends().await?;
                Ok(report.view(&ViewOptions::default()))
            }
            Command::Crawl { username, mine } => self.run_crawl(username, *mine).await,
        }
    }

    async fn run_crawl(&self, username: &str, mine: bool) -> Result<String, Error> {
        let opts = ViewOptions::default();
        let summary = self.crawler.crawl_user_complete(username).await?;
        let mut output = vec![summary.view(&opts)];

        if mine && !self.crawler.client().has_user_context() {
            warn!("Skipping subscriptions and friends: no Reddit login configured");
        } else if mine {
            match self.crawler.my_subscriptions().await {
                Ok(report) => output.push(report.view(&opts)),
                Err(err) => warn!("Could not crawl subscriptions: {err}"),
            }
            match self.crawler.my_friends().await {
                Ok(report) => output.push(report.view(&opts)),
                Err(err) => warn!("Could not crawl friends: {err}"),
            }
        }

        Ok(output.join("\n\n"))
    }
}
