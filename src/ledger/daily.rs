//! Daily challenge gate
//!
//! A challenge counts at most once per user per calendar day. The completion
//! row and the XP it grants are written in the same transaction.

use std::sync::Arc;

use rusqlite::{TransactionBehavior, params};

use super::db::LedgerDb;
use super::events::EventProcessor;
use super::models::TriggerEventResult;
use super::time_bucket::{Clock, DayBoundary, day_bucket};
use super::users;
use crate::catalog::Catalog;
use crate::error::{Entity, LedgerError, Result};

#[derive(Clone)]
pub struct DailyChallengeGate {
    db: LedgerDb,
    catalog: Arc<Catalog>,
    events: EventProcessor,
    clock: Arc<dyn Clock>,
    boundary: DayBoundary,
}

impl DailyChallengeGate {
    pub fn new(
        db: LedgerDb,
        catalog: Arc<Catalog>,
        events: EventProcessor,
        clock: Arc<dyn Clock>,
        boundary: DayBoundary,
    ) -> Self {
        Self {
            db,
            catalog,
            events,
            clock,
            boundary,
        }
    }

    /// Day bucket for "today"
    pub fn today(&self) -> String {
        day_bucket(self.clock.now(), self.boundary)
    }

    /// Complete a daily challenge and award its achievement.
    ///
    /// Fails with `AlreadyCompletedToday` if the user finished it earlier
    /// on the same day.
    pub fn complete_daily_challenge(&self, user_id: &str, challenge_key: &str) -> Result<TriggerEventResult> {
        let challenge = self
            .catalog
            .daily_challenge(challenge_key)
            .ok_or_else(|| LedgerError::NotFound {
                entity: Entity::DailyChallenge,
                id: challenge_key.to_string(),
            })?;

        let now = self.clock.now();
        let day = day_bucket(now, self.boundary);

        let mut conn = self.db.conn();
        let mut tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        users::load_progress(&tx, user_id)?;

        let inserted = tx.execute(
            r#"INSERT INTO daily_challenge_completions (user_id, challenge_key, day_bucket, completed_at)
               VALUES (?1, ?2, ?3, ?4)
               ON CONFLICT(user_id, challenge_key, day_bucket) DO NOTHING"#,
            params![user_id, challenge.key, day, now.timestamp_millis()],
        )?;
        if inserted == 0 {
            tracing::debug!("{} already completed {} on {}", user_id, challenge.key, day);
            return Err(LedgerError::AlreadyCompletedToday {
                key: challenge.key.clone(),
            });
        }

        let result = self.events.apply(&mut tx, user_id, &challenge.key, None)?;
        tx.commit()?;

        tracing::info!("{} completed daily challenge {} on {}", user_id, challenge.key, day);
        Ok(result)
    }

    /// Keys of the challenges a user has completed on `day`
    pub fn completed_on(&self, user_id: &str, day: &str) -> Result<Vec<String>> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare(
            "SELECT challenge_key FROM daily_challenge_completions WHERE user_id = ?1 AND day_bucket = ?2",
        )?;
        let keys = stmt
            .query_map(params![user_id, day], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(keys)
    }
}
