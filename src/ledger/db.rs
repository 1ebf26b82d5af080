//! SQLite database connection and schema management for the ledger
//!
//! Manages the ledger database with versioned schema migrations and seeds the
//! catalog definition tables from the in-memory [`Catalog`].

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use anyhow::{Context, Result};
use rusqlite::{Connection, params};

use crate::catalog::Catalog;

const SCHEMA_VERSION: i32 = 2;

/// Shared handle to the ledger database
#[derive(Clone)]
pub struct LedgerDb {
    conn: Arc<Mutex<Connection>>,
}

impl LedgerDb {
    /// Open or create the ledger database at a specific path
    pub fn open(path: &Path, busy_timeout: Duration) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create ledger dir: {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open ledger db: {}", path.display()))?;

        // WAL lets several processes share the file; writers queue on the busy timeout
        conn.busy_timeout(busy_timeout)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Lock the connection
    ///
    /// A poisoned lock is recovered: any transaction the panicking holder had
    /// open was rolled back when it dropped.
    pub fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn();
        conn.execute_batch(SCHEMA_SQL)?;
        drop(conn);
        self.run_migrations()?;
        Ok(())
    }

    /// Run any pending migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn();

        let version: i32 = conn
            .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))
            .unwrap_or(0);

        // Migration 2: domain activity counters
        if version < 2 {
            conn.execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS activity_counters (
                    user_id TEXT NOT NULL REFERENCES users(id),
                    counter TEXT NOT NULL,
                    total INTEGER NOT NULL DEFAULT 0 CHECK (total >= 0),
                    updated_at INTEGER NOT NULL,
                    PRIMARY KEY (user_id, counter)
                );
                "#,
            )?;
            conn.execute("INSERT OR REPLACE INTO schema_version VALUES (?1)", [SCHEMA_VERSION])?;
        }

        Ok(())
    }

    /// Upsert every catalog row into the definition tables.
    ///
    /// Definitions are never deleted: user rows keep referencing retired keys.
    pub fn seed_catalog(&self, catalog: &Catalog) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        for def in catalog.achievements() {
            tx.execute(
                r#"INSERT INTO achievement_definitions
                   (key, title, description, xp_reward, repeatable, max_repeats,
                    category, icon, condition_type, condition_value)
                   VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                   ON CONFLICT(key) DO UPDATE SET
                       title = ?2, description = ?3, xp_reward = ?4, repeatable = ?5,
                       max_repeats = ?6, category = ?7, icon = ?8,
                       condition_type = ?9, condition_value = ?10"#,
                params![
                    def.key,
                    def.title,
                    def.description,
                    def.xp_reward,
                    def.repeatable,
                    def.max_repeats,
                    def.category.as_str(),
                    def.icon,
                    def.condition_type.map(|c| c.as_str()),
                    def.condition_value,
                ],
            )?;
        }

        for badge in catalog.badges() {
            tx.execute(
                r#"INSERT INTO badge_definitions (level, name, description, icon, color)
                   VALUES (?1, ?2, ?3, ?4, ?5)
                   ON CONFLICT(level) DO UPDATE SET
                       name = ?2, description = ?3, icon = ?4, color = ?5"#,
                params![badge.level, badge.name, badge.description, badge.icon, badge.color],
            )?;
        }

        for challenge in catalog.daily_challenges() {
            tx.execute(
                r#"INSERT INTO daily_challenges (key, title, description, xp_reward, icon)
                   VALUES (?1, ?2, ?3, ?4, ?5)
                   ON CONFLICT(key) DO UPDATE SET
                       title = ?2, description = ?3, xp_reward = ?4, icon = ?5"#,
                params![
                    challenge.key,
                    challenge.title,
                    challenge.description,
                    challenge.xp_reward,
                    challenge.icon,
                ],
            )?;
        }

        tx.commit()?;
        tracing::debug!(
            "Seeded catalog: {} achievements, {} badges, {} daily challenges",
            catalog.achievements().len(),
            catalog.badges().count(),
            catalog.daily_challenges().len()
        );
        Ok(())
    }
}

/// SQL schema for the ledger database
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY);
INSERT OR IGNORE INTO schema_version VALUES (1);

-- Users and their progression (level is always xp / xp_per_level)
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    name TEXT,
    profile_image TEXT,
    is_active INTEGER NOT NULL DEFAULT 1,
    xp INTEGER NOT NULL DEFAULT 0 CHECK (xp >= 0),
    level INTEGER NOT NULL DEFAULT 0 CHECK (level >= 0),
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_users_leaderboard ON users(is_active, xp DESC);

-- ============================================
-- CATALOG TABLES (seeded, never deleted)
-- ============================================

CREATE TABLE IF NOT EXISTS achievement_definitions (
    key TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    xp_reward INTEGER NOT NULL CHECK (xp_reward >= 0),
    repeatable INTEGER NOT NULL DEFAULT 0,
    max_repeats INTEGER,
    category TEXT NOT NULL,
    icon TEXT,
    condition_type TEXT,
    condition_value INTEGER
);

CREATE TABLE IF NOT EXISTS badge_definitions (
    level INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    icon TEXT,
    color TEXT
);

CREATE TABLE IF NOT EXISTS daily_challenges (
    key TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    xp_reward INTEGER NOT NULL CHECK (xp_reward >= 0),
    icon TEXT
);

-- ============================================
-- PROGRESSION RECORDS
-- ============================================

-- One row per (user, achievement); repeat earns bump earn_count in place
CREATE TABLE IF NOT EXISTS user_achievements (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL REFERENCES users(id),
    achievement_key TEXT NOT NULL REFERENCES achievement_definitions(key),
    earn_count INTEGER NOT NULL DEFAULT 1 CHECK (earn_count >= 1),
    claimed INTEGER NOT NULL DEFAULT 0,
    claimed_at INTEGER,
    awarded_at INTEGER NOT NULL,
    meta TEXT,
    UNIQUE (user_id, achievement_key)
);
CREATE INDEX IF NOT EXISTS idx_user_achievements_user ON user_achievements(user_id, awarded_at);

CREATE TABLE IF NOT EXISTS user_badges (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL REFERENCES users(id),
    badge_level INTEGER NOT NULL REFERENCES badge_definitions(level),
    awarded_at INTEGER NOT NULL,
    UNIQUE (user_id, badge_level)
);
CREATE INDEX IF NOT EXISTS idx_user_badges_user ON user_badges(user_id, awarded_at);

-- At most one completion per (user, challenge, day)
CREATE TABLE IF NOT EXISTS daily_challenge_completions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL REFERENCES users(id),
    challenge_key TEXT NOT NULL REFERENCES daily_challenges(key),
    day_bucket TEXT NOT NULL,
    completed_at INTEGER NOT NULL,
    UNIQUE (user_id, challenge_key, day_bucket)
);
"#;
