//! Ledger settings

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::ledger::DayBoundary;

/// Ledger settings (`[ledger]` table)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSettings {
    /// SQLite database path (defaults to ~/.xpledger/ledger.db)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,

    /// XP needed per level; level = floor(xp / xp_per_level)
    #[serde(default = "default_xp_per_level")]
    pub xp_per_level: u32,

    /// Which midnight starts a new day for daily challenges
    #[serde(default)]
    pub day_boundary: DayBoundary,

    /// Leaderboard size when the caller does not pass one
    #[serde(default = "default_leaderboard_limit")]
    pub leaderboard_limit: usize,

    /// How long a writer waits on a locked database before failing
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

fn default_xp_per_level() -> u32 {
    300
}

fn default_leaderboard_limit() -> usize {
    10
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            database_path: None,
            xp_per_level: default_xp_per_level(),
            day_boundary: DayBoundary::default(),
            leaderboard_limit: default_leaderboard_limit(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}
