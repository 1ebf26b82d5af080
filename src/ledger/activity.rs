//! Domain activity counters
//!
//! The milestone scanner and the progress report read per-user counts of
//! applications, posts, skills and so on through [`CounterSource`]. The
//! bundled [`ActivityStore`] keeps those counts in SQLite and is updated by
//! collaborators as their own records change.

use std::fmt;
use std::sync::Arc;

use rusqlite::params;
use serde::{Deserialize, Serialize};

use super::db::LedgerDb;
use super::time_bucket::Clock;
use super::users;
use crate::error::Result;

/// Kind of domain record counted per user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Counter {
    Applications,
    Interviews,
    Posts,
    Comments,
    Interactions,
    Resumes,
    Projects,
    Skills,
    WorkEntries,
}

impl Counter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Counter::Applications => "applications",
            Counter::Interviews => "interviews",
            Counter::Posts => "posts",
            Counter::Comments => "comments",
            Counter::Interactions => "interactions",
            Counter::Resumes => "resumes",
            Counter::Projects => "projects",
            Counter::Skills => "skills",
            Counter::WorkEntries => "work_entries",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|c| c.as_str() == s)
    }

    pub fn all() -> &'static [Counter] {
        &[
            Counter::Applications,
            Counter::Interviews,
            Counter::Posts,
            Counter::Comments,
            Counter::Interactions,
            Counter::Resumes,
            Counter::Projects,
            Counter::Skills,
            Counter::WorkEntries,
        ]
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of every counter for one user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityCounts {
    pub applications: u64,
    pub interviews: u64,
    pub posts: u64,
    pub comments: u64,
    pub interactions: u64,
    pub resumes: u64,
    pub projects: u64,
    pub skills: u64,
    pub work_entries: u64,
}

impl ActivityCounts {
    pub fn get(&self, counter: Counter) -> u64 {
        match counter {
            Counter::Applications => self.applications,
            Counter::Interviews => self.interviews,
            Counter::Posts => self.posts,
            Counter::Comments => self.comments,
            Counter::Interactions => self.interactions,
            Counter::Resumes => self.resumes,
            Counter::Projects => self.projects,
            Counter::Skills => self.skills,
            Counter::WorkEntries => self.work_entries,
        }
    }

    fn slot(&mut self, counter: Counter) -> &mut u64 {
        match counter {
            Counter::Applications => &mut self.applications,
            Counter::Interviews => &mut self.interviews,
            Counter::Posts => &mut self.posts,
            Counter::Comments => &mut self.comments,
            Counter::Interactions => &mut self.interactions,
            Counter::Resumes => &mut self.resumes,
            Counter::Projects => &mut self.projects,
            Counter::Skills => &mut self.skills,
            Counter::WorkEntries => &mut self.work_entries,
        }
    }

    pub fn with(mut self, counter: Counter, value: u64) -> Self {
        *self.slot(counter) = value;
        self
    }

    /// Whether the user has filled in any profile section
    pub fn has_profile_content(&self) -> bool {
        self.skills + self.work_entries + self.projects > 0
    }
}

/// Where milestone checks get their counts from.
///
/// A snapshot is all or nothing: if any count cannot be read the whole call
/// fails and nothing is awarded.
pub trait CounterSource {
    fn snapshot(&self, user_id: &str) -> Result<ActivityCounts>;
}

/// Counters persisted in the ledger database
#[derive(Clone)]
pub struct ActivityStore {
    db: LedgerDb,
    clock: Arc<dyn Clock>,
}

impl ActivityStore {
    pub fn new(db: LedgerDb, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    /// Count one new record. Returns the new total.
    pub fn record(&self, user_id: &str, counter: Counter) -> Result<u64> {
        self.adjust(user_id, counter, 1)
    }

    /// Uncount a deleted record; totals never go below zero.
    pub fn retract(&self, user_id: &str, counter: Counter) -> Result<u64> {
        self.adjust(user_id, counter, -1)
    }

    /// Overwrite a total, e.g. after a bulk import
    pub fn set(&self, user_id: &str, counter: Counter, total: u64) -> Result<u64> {
        let now = self.clock.now().timestamp_millis();
        let conn = self.db.conn();
        users::load_progress(&conn, user_id)?;
        conn.execute(
            r#"INSERT INTO activity_counters (user_id, counter, total, updated_at)
               VALUES (?1, ?2, ?3, ?4)
               ON CONFLICT(user_id, counter) DO UPDATE SET total = ?3, updated_at = ?4"#,
            params![user_id, counter.as_str(), total, now],
        )?;
        Ok(total)
    }

    fn adjust(&self, user_id: &str, counter: Counter, delta: i64) -> Result<u64> {
        let now = self.clock.now().timestamp_millis();
        let conn = self.db.conn();
        users::load_progress(&conn, user_id)?;
        let total = conn.query_row(
            r#"INSERT INTO activity_counters (user_id, counter, total, updated_at)
               VALUES (?1, ?2, MAX(?3, 0), ?4)
               ON CONFLICT(user_id, counter) DO UPDATE SET
                   total = MAX(total + ?3, 0), updated_at = ?4
               RETURNING total"#,
            params![user_id, counter.as_str(), delta, now],
            |r| r.get(0),
        )?;
        tracing::debug!("Counter {} for {} is now {}", counter, user_id, total);
        Ok(total)
    }
}

impl CounterSource for ActivityStore {
    fn snapshot(&self, user_id: &str) -> Result<ActivityCounts> {
        let conn = self.db.conn();
        let mut stmt =
            conn.prepare("SELECT counter, total FROM activity_counters WHERE user_id = ?1")?;
        let rows = stmt.query_map([user_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, u64>(1)?))
        })?;

        let mut counts = ActivityCounts::default();
        for row in rows {
            let (name, total) = row?;
            match Counter::from_str(&name) {
                Some(counter) => *counts.slot(counter) = total,
                None => tracing::warn!("Ignoring unknown activity counter '{}'", name),
            }
        }
        Ok(counts)
    }
}
