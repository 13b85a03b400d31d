//! Client-side request pacing driven by Reddit's rate-limit headers.
//!
//! Reddit reports the state of a client's rate-limit window in every
//! response:
//!
//! - `x-ratelimit-used`: requests made in the current window
//! - `x-ratelimit-remaining`: requests left in the current window
//! - `x-ratelimit-reset`: seconds until the window resets
//!
//! A [`Throttle`] spaces requests at least a minimum interval apart and,
//! once the window is exhausted, holds back the next request until the
//! window resets.

use log::{debug, info};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep_until};

/// The interval enforced between two consecutive requests.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(100);

/// How long to wait after an HTTP 429 that did not say how long to wait.
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(60);

/// A snapshot of the rate-limit window reported by the API.
#[derive(Clone, Debug, PartialEq)]
pub struct RateLimit {
    used: u64,
    remaining: f64,
    reset: Duration,
}

impl RateLimit {
    /// Reads the rate-limit window from response headers.
    ///
    /// Returns `None` unless both the remaining budget and the reset time
    /// are present and well-formed.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let remaining = header_value(headers, "x-ratelimit-remaining")?
            .parse::<f64>()
            .ok()?;
        let reset = header_value(headers, "x-ratelimit-reset")?
            .parse::<u64>()
            .ok()?;
        let used = header_value(headers, "x-ratelimit-used")
            .and_then(|used| used.parse::<u64>().ok())
            .unwrap_or(0);
        Some(Self {
            used,
            remaining,
            reset: Duration::from_secs(reset),
        })
    }

    /// Requests made in the current window.
    pub fn used(&self) -> u64 {
        self.used
    }

    /// Requests left in the current window.
    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    /// Time until the window resets.
    pub fn reset(&self) -> Duration {
        self.reset
    }

    /// True if no requests are left in the current window.
    pub fn is_exhausted(&self) -> bool {
        self.remaining < 1.0
    }
}

/// Parses the `Retry-After` header of a response, in seconds.
pub fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name)?.to_str().ok().map(str::trim)
}

/// Paces outgoing requests.
#[derive(Debug)]
pub struct Throttle {
    min_interval: Duration,
    next_request: Mutex<Option<Instant>>,
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }
}

impl Throttle {
    /// Creates a throttle that spaces requests `min_interval` apart.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_request: Mutex::new(None),
        }
    }

    /// Waits until the next request is allowed, then reserves the
    /// following slot.
    pub async fn wait(&self) {
        let mut next_request = self.next_request.lock().await;
        if let Some(at) = *next_request {
            if at > Instant::now() {
                debug!("Throttling request for {:?}", at - Instant::now());
            }
            sleep_until(at).await;
        }
        *next_request = Some(Instant::now() + self.min_interval);
    }

    /// Records the rate-limit window reported by the last response.
    pub async fn observe(&self, rate_limit: &RateLimit) {
        debug!(
            "Rate limit: {} used, {} remaining, reset in {}s",
            rate_limit.used(),
            rate_limit.remaining(),
            rate_limit.reset().as_secs()
        );
        if rate_limit.is_exhausted() {
            info!(
                "Rate limit exhausted, pausing for {}s",
                rate_limit.reset().as_secs()
            );
            self.defer(rate_limit.reset()).await;
        }
    }

    /// Holds back the next request for at least `delay`.
    pub async fn back_off(&self, delay: Duration) {
        info!("Backing off for {}s", delay.as_secs());
        self.defer(delay).await;
    }

    async fn defer(&self, delay: Duration) {
        let until = Instant::now() + delay;
        let mut next_request = self.next_request.lock().await;
        *next_request = Some(next_request.map_or(until, |at| at.max(until)));
    }
}
