//! Event processor - turns an achievement key into XP, awards and badges
//!
//! Every trigger runs in one `BEGIN IMMEDIATE` transaction:
//! 1. read the user's xp/level
//! 2. record the achievement (first earn, or repeat earn under the cap)
//! 3. add the reward to xp in place and recompute the level
//! 4. award a badge for every level crossed

use std::sync::Arc;

use rusqlite::{Connection, OptionalExtension, Transaction, TransactionBehavior, params};
use tracing::{debug, info, warn};

use super::db::LedgerDb;
use super::models::{AwardedAchievement, AwardedBadge, Meta, TriggerEventResult};
use super::time_bucket::Clock;
use super::users;
use crate::catalog::{AchievementDefinition, Catalog};
use crate::error::Result;

/// Applies achievement events to user progression
#[derive(Clone)]
pub struct EventProcessor {
    db: LedgerDb,
    catalog: Arc<Catalog>,
    clock: Arc<dyn Clock>,
    xp_per_level: u32,
}

impl EventProcessor {
    pub fn new(db: LedgerDb, catalog: Arc<Catalog>, clock: Arc<dyn Clock>, xp_per_level: u32) -> Self {
        Self {
            db,
            catalog,
            clock,
            xp_per_level: xp_per_level.max(1),
        }
    }

    /// Apply one achievement event for a user.
    ///
    /// Unknown keys change nothing and return the current xp/level.
    pub fn trigger_event(
        &self,
        user_id: &str,
        event_key: &str,
        meta: Option<&Meta>,
    ) -> Result<TriggerEventResult> {
        self.batch(|events, tx| events.apply(tx, user_id, event_key, meta))
    }

    /// Run `body` in one `BEGIN IMMEDIATE` transaction, committing on success
    pub(crate) fn batch<T>(
        &self,
        body: impl FnOnce(&Self, &mut Transaction<'_>) -> Result<T>,
    ) -> Result<T> {
        let mut conn = self.db.conn();
        let mut tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let out = body(self, &mut tx)?;
        tx.commit()?;
        Ok(out)
    }

    /// Current `(xp, level)` of a user
    pub fn progress(&self, user_id: &str) -> Result<(u64, u32)> {
        let conn = self.db.conn();
        users::load_progress(&conn, user_id)
    }

    /// How many times a user has earned `key` (0 if never)
    pub fn earn_count(&self, user_id: &str, key: &str) -> Result<u32> {
        let conn = self.db.conn();
        Ok(find_user_achievement(&conn, user_id, key)?
            .map(|(_, count)| count)
            .unwrap_or(0))
    }

    /// Trigger body, run on a transaction the caller owns
    pub(crate) fn apply(
        &self,
        tx: &mut Transaction<'_>,
        user_id: &str,
        event_key: &str,
        meta: Option<&Meta>,
    ) -> Result<TriggerEventResult> {
        let (old_xp, old_level) = users::load_progress(tx, user_id)?;

        let Some(def) = self.catalog.achievement(event_key) else {
            warn!("Ignoring unknown event key '{}' for user {}", event_key, user_id);
            return Ok(TriggerEventResult::unchanged(old_xp, old_level));
        };

        let now = self.clock.now().timestamp_millis();
        let Some(awarded) = award_achievement(tx, user_id, def, meta, now)? else {
            debug!("{} already earned by {} (not repeatable or capped)", def.key, user_id);
            return Ok(TriggerEventResult::unchanged(old_xp, old_level));
        };

        let xp_gained = u64::from(def.xp_reward);
        let (xp, level) = if xp_gained > 0 {
            users::add_xp(tx, user_id, xp_gained, self.xp_per_level, now)?
        } else {
            (old_xp, old_level)
        };

        info!(
            "{} earned {} (x{}) for {} XP, now {} XP",
            user_id, def.key, awarded.earn_count, xp_gained, xp
        );

        let leveled_up = level > old_level;
        let new_badges = if leveled_up {
            info!("{} leveled up: {} -> {}", user_id, old_level, level);
            self.award_badges(tx, user_id, old_level, level, now)
        } else {
            Vec::new()
        };

        Ok(TriggerEventResult {
            xp,
            level,
            xp_gained,
            leveled_up,
            new_level: leveled_up.then_some(level),
            awarded_achievements: vec![awarded],
            new_badges,
        })
    }

    /// Award the badge of every level in `from_level+1..=to_level`.
    ///
    /// Each insert runs in its own savepoint; a failure drops only that
    /// badge and is logged.
    fn award_badges(
        &self,
        tx: &mut Transaction<'_>,
        user_id: &str,
        from_level: u32,
        to_level: u32,
        now: i64,
    ) -> Vec<AwardedBadge> {
        let mut awarded = Vec::new();
        for level in (from_level + 1)..=to_level {
            let Some(badge) = self.catalog.badge_for_level(level) else {
                debug!("No badge defined for level {}", level);
                continue;
            };
            match insert_badge(tx, user_id, level, now) {
                Ok(true) => {
                    info!("{} earned badge '{}' (level {})", user_id, badge.name, level);
                    awarded.push(AwardedBadge::from(badge));
                }
                Ok(false) => debug!("{} already owns badge for level {}", user_id, level),
                Err(e) => warn!("Failed to award level {} badge to {}: {}", level, user_id, e),
            }
        }
        awarded
    }
}

/// `(row id, earn_count)` of a user's achievement row
fn find_user_achievement(conn: &Connection, user_id: &str, key: &str) -> Result<Option<(i64, u32)>> {
    Ok(conn
        .query_row(
            "SELECT id, earn_count FROM user_achievements WHERE user_id = ?1 AND achievement_key = ?2",
            params![user_id, key],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .optional()?)
}

/// Record an earn of `def`. Returns `None` when nothing was earned.
fn award_achievement(
    conn: &Connection,
    user_id: &str,
    def: &AchievementDefinition,
    meta: Option<&Meta>,
    now: i64,
) -> Result<Option<AwardedAchievement>> {
    let awarded = |id: i64, earn_count: u32| AwardedAchievement {
        id,
        key: def.key.clone(),
        title: def.title.clone(),
        xp_reward: def.xp_reward,
        icon: def.icon.clone(),
        earn_count,
    };

    let existing = find_user_achievement(conn, user_id, &def.key)?;
    if existing.is_none() {
        let meta_json = meta.map(serde_json::to_string).transpose()?;
        let inserted = conn.execute(
            r#"INSERT INTO user_achievements
               (user_id, achievement_key, earn_count, claimed, awarded_at, meta)
               VALUES (?1, ?2, 1, 0, ?3, ?4)
               ON CONFLICT(user_id, achievement_key) DO NOTHING"#,
            params![user_id, def.key, now, meta_json],
        )?;
        if inserted == 1 {
            return Ok(Some(awarded(conn.last_insert_rowid(), 1)));
        }
        // Another writer created the row first; fall through to the repeat rules
    }

    let earned_so_far = existing.map_or(1, |(_, count)| count);
    if !def.can_repeat(earned_so_far) {
        return Ok(None);
    }

    // claimed_at and meta keep their values from the earlier earn
    let repeated = conn
        .query_row(
            r#"UPDATE user_achievements
               SET earn_count = earn_count + 1, claimed = 0, awarded_at = ?3
               WHERE user_id = ?1 AND achievement_key = ?2
                 AND (?4 IS NULL OR earn_count < ?4)
               RETURNING id, earn_count"#,
            params![user_id, def.key, now, def.max_repeats],
            |r| Ok((r.get::<_, i64>(0)?, r.get::<_, u32>(1)?)),
        )
        .optional()?;

    Ok(repeated.map(|(id, earn_count)| awarded(id, earn_count)))
}

fn insert_badge(tx: &mut Transaction<'_>, user_id: &str, level: u32, now: i64) -> rusqlite::Result<bool> {
    let sp = tx.savepoint()?;
    let inserted = sp.execute(
        r#"INSERT INTO user_badges (user_id, badge_level, awarded_at)
           VALUES (?1, ?2, ?3)
           ON CONFLICT(user_id, badge_level) DO NOTHING"#,
        params![user_id, level, now],
    )?;
    sp.commit()?;
    Ok(inserted == 1)
}
