//! Shared fixtures for ledger integration tests

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use xpledger::catalog::{AchievementCategory, AchievementDefinition, BadgeDefinition, Catalog};
use xpledger::config::LedgerSettings;
use xpledger::error::{LedgerError, Result};
use xpledger::ledger::{
    ActivityCounts, CounterSource, DayBoundary, LedgerDb, ManualClock, ProgressionManager,
};

/// Settings used by every fixture: 300 XP per level, UTC days
pub fn settings(dir: &Path) -> LedgerSettings {
    LedgerSettings {
        database_path: Some(dir.join("ledger.db")),
        day_boundary: DayBoundary::Utc,
        ..LedgerSettings::default()
    }
}

/// Open a manager on `dir/ledger.db`
pub fn open_in(dir: &Path, catalog: Catalog) -> ProgressionManager {
    let settings = settings(dir);
    let db = LedgerDb::open(&dir.join("ledger.db"), std::time::Duration::from_secs(10))
        .expect("Failed to open ledger db");
    ProgressionManager::with_db(db, catalog, settings).expect("Failed to build manager")
}

/// A ledger on the built-in catalog in a fresh temp dir
pub fn builtin_ledger() -> (TempDir, ProgressionManager) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let ledger = open_in(dir.path(), Catalog::builtin());
    (dir, ledger)
}

/// A ledger on [`test_catalog`] in a fresh temp dir
pub fn test_ledger() -> (TempDir, ProgressionManager) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let ledger = open_in(dir.path(), test_catalog());
    (dir, ledger)
}

/// A built-in ledger whose clock starts at 2024-05-01 09:00 UTC
pub fn clocked_ledger() -> (TempDir, Arc<ManualClock>, ProgressionManager) {
    let (dir, ledger) = builtin_ledger();
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
    ));
    let ledger = ledger.with_clock(clock.clone());
    (dir, clock, ledger)
}

pub fn definition(key: &str, xp_reward: u32, repeatable: bool, max_repeats: Option<u32>) -> AchievementDefinition {
    AchievementDefinition {
        key: key.to_string(),
        title: key.replace('_', " "),
        description: format!("{key} description"),
        xp_reward,
        repeatable,
        max_repeats,
        category: AchievementCategory::Milestone,
        icon: None,
        condition_type: None,
        condition_value: None,
    }
}

/// Small catalog for exact XP arithmetic.
///
/// THOUGHT_LEADER is one-time here, unlike the built-in catalog.
pub fn test_catalog() -> Catalog {
    let mut thought_leader = definition("THOUGHT_LEADER", 20, false, None);
    thought_leader.category = AchievementCategory::Community;
    Catalog::new(
        vec![
            thought_leader,
            definition("SEED_290", 290, false, None),
            definition("SEED_600", 600, false, None),
            definition("FIFTY", 50, true, None),
            definition("JUMP_900", 900, true, None),
            definition("CAPPED", 10, true, Some(3)),
        ],
        (1..=5)
            .map(|level| BadgeDefinition {
                level,
                name: format!("Badge {level}"),
                description: String::new(),
                icon: None,
                color: Some("#000000".to_string()),
            })
            .collect(),
        vec![],
    )
    .expect("test catalog is valid")
}

/// Counter source that always returns the same counts
pub struct FixedCounters(pub ActivityCounts);

impl CounterSource for FixedCounters {
    fn snapshot(&self, _user_id: &str) -> Result<ActivityCounts> {
        Ok(self.0)
    }
}

/// Counter source whose batch read always fails
pub struct FailingCounters;

impl CounterSource for FailingCounters {
    fn snapshot(&self, _user_id: &str) -> Result<ActivityCounts> {
        Err(LedgerError::Counters("posts service unavailable".to_string()))
    }
}
