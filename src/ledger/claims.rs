//! Claiming earned achievements

use std::sync::Arc;

use rusqlite::{OptionalExtension, params};

use super::db::LedgerDb;
use super::models::ClaimRecord;
use super::time_bucket::Clock;
use crate::error::{Entity, LedgerError, Result};

#[derive(Clone)]
pub struct ClaimDesk {
    db: LedgerDb,
    clock: Arc<dyn Clock>,
}

impl ClaimDesk {
    pub fn new(db: LedgerDb, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    /// Mark one of the user's earned achievements as claimed.
    ///
    /// The flip only happens while the row is unclaimed, so concurrent
    /// redeems of the same row succeed once.
    pub fn redeem_achievement(&self, user_id: &str, user_achievement_id: i64) -> Result<ClaimRecord> {
        let now = self.clock.now().timestamp_millis();
        let conn = self.db.conn();

        let flipped = conn.execute(
            r#"UPDATE user_achievements SET claimed = 1, claimed_at = ?3
               WHERE id = ?1 AND user_id = ?2 AND claimed = 0"#,
            params![user_achievement_id, user_id, now],
        )?;

        if flipped == 0 {
            let owned: Option<bool> = conn
                .query_row(
                    "SELECT claimed FROM user_achievements WHERE id = ?1 AND user_id = ?2",
                    params![user_achievement_id, user_id],
                    |r| r.get(0),
                )
                .optional()?;
            return Err(match owned {
                Some(_) => LedgerError::AlreadyClaimed {
                    id: user_achievement_id,
                },
                None => LedgerError::NotFound {
                    entity: Entity::Achievement,
                    id: user_achievement_id.to_string(),
                },
            });
        }

        let record = conn.query_row(
            r#"SELECT ua.id, ua.achievement_key, d.title, d.description, d.xp_reward, d.icon,
                      ua.claimed, ua.claimed_at
               FROM user_achievements ua
               JOIN achievement_definitions d ON d.key = ua.achievement_key
               WHERE ua.id = ?1"#,
            [user_achievement_id],
            |r| {
                Ok(ClaimRecord {
                    id: r.get(0)?,
                    key: r.get(1)?,
                    title: r.get(2)?,
                    description: r.get(3)?,
                    xp_reward: r.get(4)?,
                    icon: r.get(5)?,
                    claimed: r.get(6)?,
                    claimed_at: r.get(7)?,
                })
            },
        )?;

        tracing::info!("{} claimed {} (#{})", user_id, record.key, record.id);
        Ok(record)
    }
}
