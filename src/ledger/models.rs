//! Data models returned by ledger operations
//!
//! Timestamps are milliseconds since the Unix epoch.

use serde::{Deserialize, Serialize};

use crate::catalog::{AchievementCategory, BadgeDefinition, ConditionType};

/// Opaque document attached to an earned achievement by the caller
pub type Meta = serde_json::Map<String, serde_json::Value>;

/// Stored user row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub name: Option<String>,
    pub profile_image: Option<String>,
    pub is_active: bool,
    pub xp: u64,
    pub level: u32,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Achievement awarded by a single trigger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AwardedAchievement {
    /// Id of the user achievement row
    pub id: i64,
    pub key: String,
    pub title: String,
    pub xp_reward: u32,
    pub icon: Option<String>,
    pub earn_count: u32,
}

/// Badge awarded by a level-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AwardedBadge {
    pub level: u32,
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
}

impl From<&BadgeDefinition> for AwardedBadge {
    fn from(def: &BadgeDefinition) -> Self {
        Self {
            level: def.level,
            name: def.name.clone(),
            icon: def.icon.clone(),
            color: def.color.clone(),
        }
    }
}

/// Outcome of a trigger, a milestone scan or a daily challenge
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerEventResult {
    pub xp: u64,
    pub level: u32,
    pub xp_gained: u64,
    pub leveled_up: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_level: Option<u32>,
    pub awarded_achievements: Vec<AwardedAchievement>,
    pub new_badges: Vec<AwardedBadge>,
}

impl TriggerEventResult {
    /// Result for a call that changed nothing
    pub fn unchanged(xp: u64, level: u32) -> Self {
        Self {
            xp,
            level,
            ..Self::default()
        }
    }

    /// Fold a sub-call's gains into this result
    pub fn absorb(&mut self, other: TriggerEventResult) {
        self.xp_gained += other.xp_gained;
        self.awarded_achievements.extend(other.awarded_achievements);
        self.new_badges.extend(other.new_badges);
    }
}

/// Result of claiming an earned achievement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub id: i64,
    pub key: String,
    pub title: String,
    pub description: String,
    pub xp_reward: u32,
    pub icon: Option<String>,
    pub claimed: bool,
    pub claimed_at: Option<i64>,
}

/// An achievement in a user's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarnedAchievement {
    pub id: i64,
    pub key: String,
    pub title: String,
    pub description: String,
    pub xp_reward: u32,
    pub icon: Option<String>,
    pub category: Option<AchievementCategory>,
    pub claimed: bool,
    pub claimed_at: Option<i64>,
    pub earn_count: u32,
    pub awarded_at: i64,
    pub meta: Option<Meta>,
}

/// A badge in a user's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarnedBadge {
    pub id: i64,
    pub level: u32,
    pub name: String,
    pub description: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub awarded_at: i64,
}

/// Short badge form shown next to a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadgeSummary {
    pub level: u32,
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
}

impl From<&EarnedBadge> for BadgeSummary {
    fn from(badge: &EarnedBadge) -> Self {
        Self {
            level: badge.level,
            name: badge.name.clone(),
            icon: badge.icon.clone(),
            color: badge.color.clone(),
        }
    }
}

/// Today's state of one daily challenge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyChallengeStatus {
    pub key: String,
    pub title: String,
    pub description: String,
    pub xp_reward: u32,
    pub icon: Option<String>,
    pub completed: bool,
}

/// Daily challenge board for the current day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyChallengeBoard {
    pub day: String,
    pub available: Vec<DailyChallengeStatus>,
    pub completed_today: usize,
    pub max_daily: usize,
}

/// Full progression snapshot for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XpStatus {
    pub xp: u64,
    pub level: u32,
    pub current_level_xp: u64,
    pub next_level_xp: u64,
    pub progress_xp: u64,
    pub progress_percent: f64,
    pub xp_per_level: u32,
    pub display_range: String,
    /// Newest first
    pub achievements: Vec<EarnedAchievement>,
    /// Newest first
    pub badges: Vec<EarnedBadge>,
    pub current_badge: Option<BadgeSummary>,
    pub daily_challenges: DailyChallengeBoard,
}

/// Progress towards a threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub current: u64,
    pub target: u64,
    pub percent: u32,
}

impl Progress {
    /// Clamp `current` to `target` and compute a whole percentage capped at 100
    pub fn new(current: u64, target: u64) -> Self {
        let target = target.max(1);
        let percent = ((current as f64 / target as f64) * 100.0).round().min(100.0) as u32;
        Self {
            current: current.min(target),
            target,
            percent,
        }
    }
}

/// Catalog achievement annotated with one user's state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementProgressView {
    pub key: String,
    pub title: String,
    pub description: String,
    pub xp_reward: u32,
    pub icon: Option<String>,
    pub category: AchievementCategory,
    pub condition_type: Option<ConditionType>,
    pub condition_value: Option<u32>,
    pub repeatable: bool,
    pub max_repeats: Option<u32>,
    pub earned: bool,
    pub earn_count: u32,
    pub claimed: bool,
    pub claimed_at: Option<i64>,
    pub awarded_at: Option<i64>,
    pub user_achievement_id: Option<i64>,
    pub progress: Progress,
}

/// One leaderboard row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub user_id: String,
    pub name: String,
    pub profile_image: Option<String>,
    pub xp: u64,
    pub level: u32,
    pub current_badge: Option<BadgeSummary>,
}
