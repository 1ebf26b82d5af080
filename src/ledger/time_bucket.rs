//! Time utilities for the ledger
//!
//! - Day buckets: "YYYY-MM-DD" keys for daily challenge completions
//! - A [`Clock`] so "now" can be pinned in tests

use std::sync::Mutex;

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Which midnight starts a new calendar day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayBoundary {
    /// Midnight in the server's local timezone
    #[default]
    Local,
    /// Midnight UTC
    Utc,
}

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, at: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = at;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Calendar day containing `at` under the given boundary
pub fn calendar_day(at: DateTime<Utc>, boundary: DayBoundary) -> NaiveDate {
    match boundary {
        DayBoundary::Local => at.with_timezone(&Local).date_naive(),
        DayBoundary::Utc => at.date_naive(),
    }
}

/// Compute the day bucket string for `at`.
///
/// Returns a string in format "YYYY-MM-DD".
pub fn day_bucket(at: DateTime<Utc>, boundary: DayBoundary) -> String {
    calendar_day(at, boundary).format("%Y-%m-%d").to_string()
}
