//! User store - the rows that carry xp and level
//!
//! Registration and activation live here. XP writes go through
//! [`add_xp`], which only the event processor calls.

use std::sync::Arc;

use rusqlite::{Connection, OptionalExtension, Row, params};

use super::db::LedgerDb;
use super::models::UserRecord;
use super::time_bucket::Clock;
use crate::error::{LedgerError, Result};

/// Reads and writes user rows
#[derive(Clone)]
pub struct UserStore {
    db: LedgerDb,
    clock: Arc<dyn Clock>,
}

impl UserStore {
    pub fn new(db: LedgerDb, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    /// Create a user at xp 0 / level 0.
    ///
    /// Registering an existing id keeps its progression; a given name
    /// replaces the stored one.
    pub fn register(&self, user_id: &str, name: Option<&str>) -> Result<UserRecord> {
        let now = self.clock.now().timestamp_millis();
        let conn = self.db.conn();
        conn.execute(
            r#"INSERT INTO users (id, name, is_active, xp, level, created_at, updated_at)
               VALUES (?1, ?2, 1, 0, 0, ?3, ?3)
               ON CONFLICT(id) DO UPDATE SET
                   name = COALESCE(?2, name),
                   updated_at = CASE WHEN ?2 IS NULL THEN updated_at ELSE ?3 END"#,
            params![user_id, name, now],
        )?;
        get_user(&conn, user_id)
    }

    /// Fetch a user
    pub fn get(&self, user_id: &str) -> Result<UserRecord> {
        let conn = self.db.conn();
        get_user(&conn, user_id)
    }

    /// Include or exclude a user from the leaderboard
    pub fn set_active(&self, user_id: &str, active: bool) -> Result<UserRecord> {
        let now = self.clock.now().timestamp_millis();
        let conn = self.db.conn();
        let changed = conn.execute(
            "UPDATE users SET is_active = ?2, updated_at = ?3 WHERE id = ?1",
            params![user_id, active, now],
        )?;
        if changed == 0 {
            return Err(LedgerError::user_not_found(user_id));
        }
        tracing::debug!("User {} active={}", user_id, active);
        get_user(&conn, user_id)
    }

    /// Set or clear the avatar shown on the leaderboard
    pub fn set_profile_image(&self, user_id: &str, image: Option<&str>) -> Result<UserRecord> {
        let now = self.clock.now().timestamp_millis();
        let conn = self.db.conn();
        let changed = conn.execute(
            "UPDATE users SET profile_image = ?2, updated_at = ?3 WHERE id = ?1",
            params![user_id, image, now],
        )?;
        if changed == 0 {
            return Err(LedgerError::user_not_found(user_id));
        }
        get_user(&conn, user_id)
    }

    /// Recompute every stored level for `xp_per_level`.
    ///
    /// Returns how many users moved. Only needed when the configured
    /// level size differs from the one the rows were written with.
    pub fn relevel(&self, xp_per_level: u32) -> Result<usize> {
        let conn = self.db.conn();
        let changed = conn.execute(
            "UPDATE users SET level = xp / ?1 WHERE level != xp / ?1",
            params![xp_per_level.max(1)],
        )?;
        Ok(changed)
    }
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRecord> {
    Ok(UserRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        profile_image: row.get(2)?,
        is_active: row.get(3)?,
        xp: row.get(4)?,
        level: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

pub(crate) fn get_user(conn: &Connection, user_id: &str) -> Result<UserRecord> {
    conn.query_row(
        r#"SELECT id, name, profile_image, is_active, xp, level, created_at, updated_at
           FROM users WHERE id = ?1"#,
        [user_id],
        user_from_row,
    )
    .optional()?
    .ok_or_else(|| LedgerError::user_not_found(user_id))
}

/// Current `(xp, level)` of a user
pub(crate) fn load_progress(conn: &Connection, user_id: &str) -> Result<(u64, u32)> {
    conn.query_row(
        "SELECT xp, level FROM users WHERE id = ?1",
        [user_id],
        |r| Ok((r.get(0)?, r.get(1)?)),
    )
    .optional()?
    .ok_or_else(|| LedgerError::user_not_found(user_id))
}

/// Add `gained` XP in place and recompute the level from the new total.
///
/// The increment happens inside the UPDATE so concurrent writers never
/// overwrite each other's gains. Returns the new `(xp, level)`.
pub(crate) fn add_xp(
    conn: &Connection,
    user_id: &str,
    gained: u64,
    xp_per_level: u32,
    now: i64,
) -> Result<(u64, u32)> {
    conn.query_row(
        r#"UPDATE users
           SET xp = xp + ?2, level = (xp + ?2) / ?3, updated_at = ?4
           WHERE id = ?1
           RETURNING xp, level"#,
        params![user_id, gained, xp_per_level.max(1), now],
        |r| Ok((r.get(0)?, r.get(1)?)),
    )
    .optional()?
    .ok_or_else(|| LedgerError::user_not_found(user_id))
}
