//! Progression ledger
//!
//! Converts user actions into XP, levels, achievements and badges, stored in
//! a SQLite database (`~/.xpledger/ledger.db`).
//!
//! # Architecture
//!
//! ```text
//!  collaborators ──► EventProcessor ◄── MilestoneScanner ◄── CounterSource
//!        │                 ▲
//!        └──► DailyChallengeGate
//!                          │
//!                    users / user_achievements / user_badges
//!                          │
//!                          ▼
//!                 ProgressReporter (read-only)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let ledger = ProgressionManager::open(&config)?;
//! ledger.users().register("u1", Some("Ada"))?;
//!
//! // Push: a known achievement key
//! ledger.trigger_event("u1", "THOUGHT_LEADER", None)?;
//!
//! // Pull: re-derive threshold achievements from counters
//! ledger.activity().record("u1", Counter::Applications)?;
//! ledger.check_milestone_achievements("u1")?;
//!
//! let status = ledger.get_xp_status("u1")?;
//! ```

mod actions;
mod activity;
mod claims;
mod daily;
mod db;
mod events;
mod levels;
mod milestones;
mod models;
mod reporter;
mod time_bucket;
mod users;

pub use actions::{ActionEffect, CollaboratorAction, Dispatch};
pub use activity::{ActivityCounts, ActivityStore, Counter, CounterSource};
pub use claims::ClaimDesk;
pub use daily::DailyChallengeGate;
pub use db::LedgerDb;
pub use events::EventProcessor;
pub use levels::{LevelProgress, level_for_xp};
pub use milestones::{MILESTONES, Milestone, MilestoneScanner, RESUME_ARCHIVIST, RESUME_BUCKET_SIZE};
pub use models::{
    AchievementProgressView, AwardedAchievement, AwardedBadge, BadgeSummary, ClaimRecord,
    DailyChallengeBoard, DailyChallengeStatus, EarnedAchievement, EarnedBadge, LeaderboardEntry,
    Meta, Progress, TriggerEventResult, UserRecord, XpStatus,
};
pub use reporter::ProgressReporter;
pub use time_bucket::{Clock, DayBoundary, ManualClock, SystemClock, day_bucket};
pub use users::UserStore;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use crate::catalog::{AchievementDefinition, BadgeDefinition, Catalog};
use crate::config::{Config, LedgerSettings};
use crate::error::Result;

/// Central handle to the ledger
///
/// Owns the database, the catalog and the clock, and hands out the
/// components that work on them. Cheap to clone.
#[derive(Clone)]
pub struct ProgressionManager {
    db: LedgerDb,
    catalog: Arc<Catalog>,
    settings: LedgerSettings,
    clock: Arc<dyn Clock>,
}

impl ProgressionManager {
    /// Open the database named by `config` and seed its catalog
    pub fn open(config: &Config) -> anyhow::Result<Self> {
        let path = config.database_path();
        let db = LedgerDb::open(&path, Duration::from_millis(config.ledger.busy_timeout_ms))?;
        let catalog = config.build_catalog()?;
        Self::with_db(db, catalog, config.ledger.clone())
    }

    /// Build on an already opened database
    pub fn with_db(db: LedgerDb, catalog: Catalog, settings: LedgerSettings) -> anyhow::Result<Self> {
        db.seed_catalog(&catalog)?;
        let manager = Self {
            db,
            catalog: Arc::new(catalog),
            settings,
            clock: Arc::new(SystemClock),
        };

        let moved = manager
            .users()
            .relevel(manager.settings.xp_per_level)
            .context("Failed to re-level users")?;
        if moved > 0 {
            tracing::warn!(
                "xp_per_level is {}; re-leveled {} users",
                manager.settings.xp_per_level,
                moved
            );
        }
        Ok(manager)
    }

    /// Replace the clock (tests pin "now" with a [`ManualClock`])
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn settings(&self) -> &LedgerSettings {
        &self.settings
    }

    pub fn db(&self) -> &LedgerDb {
        &self.db
    }

    // ========================================
    // COMPONENTS
    // ========================================

    pub fn users(&self) -> UserStore {
        UserStore::new(self.db.clone(), self.clock.clone())
    }

    pub fn activity(&self) -> ActivityStore {
        ActivityStore::new(self.db.clone(), self.clock.clone())
    }

    pub fn events(&self) -> EventProcessor {
        EventProcessor::new(
            self.db.clone(),
            self.catalog.clone(),
            self.clock.clone(),
            self.settings.xp_per_level,
        )
    }

    pub fn milestones(&self) -> MilestoneScanner {
        MilestoneScanner::new(self.events(), self.activity())
    }

    pub fn daily(&self) -> DailyChallengeGate {
        DailyChallengeGate::new(
            self.db.clone(),
            self.catalog.clone(),
            self.events(),
            self.clock.clone(),
            self.settings.day_boundary,
        )
    }

    pub fn claims(&self) -> ClaimDesk {
        ClaimDesk::new(self.db.clone(), self.clock.clone())
    }

    pub fn report(&self) -> ProgressReporter {
        ProgressReporter::new(
            self.db.clone(),
            self.catalog.clone(),
            self.clock.clone(),
            self.activity(),
            self.settings.clone(),
        )
    }

    // ========================================
    // OPERATIONS
    // ========================================

    pub fn trigger_event(&self, user_id: &str, event_key: &str, meta: Option<&Meta>) -> Result<TriggerEventResult> {
        self.events().trigger_event(user_id, event_key, meta)
    }

    pub fn check_milestone_achievements(&self, user_id: &str) -> Result<TriggerEventResult> {
        self.milestones().check_milestone_achievements(user_id)
    }

    pub fn complete_daily_challenge(&self, user_id: &str, challenge_key: &str) -> Result<TriggerEventResult> {
        self.daily().complete_daily_challenge(user_id, challenge_key)
    }

    pub fn redeem_achievement(&self, user_id: &str, user_achievement_id: i64) -> Result<ClaimRecord> {
        self.claims().redeem_achievement(user_id, user_achievement_id)
    }

    pub fn get_xp_status(&self, user_id: &str) -> Result<XpStatus> {
        self.report().get_xp_status(user_id)
    }

    pub fn get_achievement_definitions(&self) -> Vec<AchievementDefinition> {
        self.report().get_achievement_definitions()
    }

    pub fn get_achievement_definitions_with_progress(&self, user_id: &str) -> Result<Vec<AchievementProgressView>> {
        self.report().get_achievement_definitions_with_progress(user_id)
    }

    pub fn get_badge_definitions(&self) -> Vec<BadgeDefinition> {
        self.report().get_badge_definitions()
    }

    pub fn get_leaderboard(&self, limit: Option<usize>) -> Result<Vec<LeaderboardEntry>> {
        self.report().get_leaderboard(limit)
    }

    /// Apply a collaborator action: bump its counter, then scan or trigger
    pub fn report_action(
        &self,
        user_id: &str,
        action: CollaboratorAction,
        meta: Option<&Meta>,
    ) -> Result<TriggerEventResult> {
        let effect = action.effect();
        if let Some(counter) = effect.counter {
            self.activity().record(user_id, counter)?;
        }
        tracing::debug!("{} reported {}", user_id, action);
        match effect.dispatch {
            Dispatch::Scan => self.check_milestone_achievements(user_id),
            Dispatch::Trigger(key) => self.trigger_event(user_id, key, meta),
        }
    }
}
