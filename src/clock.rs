//! All things time-related.

pub use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, de};
use std::ops::Sub;

/// Tells time and returns the time.
///
/// Generally you will want to retrieve time using [`SystemClock`],
/// but in tests you may want to implement a `Clock` with a fixed time.
pub trait Clock {
    /// The current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Interacts with the system clock to get the current time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Marks a thing that has a notion of its age.
pub trait HasAge {
    /// The date the item was created, in UTC.
    fn created_utc(&self) -> DateTime<Utc>;

    /// The age of the item.
    ///
    /// `clock` is a source of time from which the age can be derived.
    /// Generally [`SystemClock::default()`] is used.
    fn age<C: Clock>(&self, clock: &C) -> TimeDelta {
        let birthday = self.created_utc();
        clock.now().sub(birthday)
    }

    /// The age of the item in fractional days.
    fn age_in_days<C: Clock>(&self, clock: &C) -> f64 {
        self.age(clock).as_seconds_f64() / 86_400.0
    }
}

/// Deserializes a Unix timestamp such as Reddit's `created_utc`, which is
/// sent as a floating-point number of seconds.
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = f64::deserialize(deserializer)?;
    DateTime::from_timestamp(secs.trunc() as i64, 0)
        .ok_or_else(|| de::Error::custom(format!("timestamp out of range: {secs}")))
}
