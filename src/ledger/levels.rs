//! XP and level math
//!
//! Levels are linear: every `xp_per_level` XP is one level, starting at 0.

/// Level reached with `xp` total XP
pub fn level_for_xp(xp: u64, xp_per_level: u32) -> u32 {
    let level = xp / u64::from(xp_per_level.max(1));
    u32::try_from(level).unwrap_or(u32::MAX)
}

/// Where a user sits inside their current level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelProgress {
    pub xp: u64,
    pub level: u32,
    /// XP at which the current level started
    pub current_level_xp: u64,
    /// XP at which the next level starts
    pub next_level_xp: u64,
    /// XP earned inside the current level
    pub progress_xp: u64,
    /// 0.0 - 100.0
    pub progress_percent: f64,
}

impl LevelProgress {
    pub fn new(xp: u64, xp_per_level: u32) -> Self {
        let per_level = u64::from(xp_per_level.max(1));
        let level = level_for_xp(xp, xp_per_level);
        let current_level_xp = u64::from(level) * per_level;
        let next_level_xp = current_level_xp + per_level;
        let progress_xp = xp - current_level_xp;

        Self {
            xp,
            level,
            current_level_xp,
            next_level_xp,
            progress_xp,
            progress_percent: (progress_xp as f64 / per_level as f64) * 100.0,
        }
    }

    /// "{xp}/{next_level_xp} XP"
    pub fn display_range(&self) -> String {
        format!("{}/{} XP", self.xp, self.next_level_xp)
    }
}
