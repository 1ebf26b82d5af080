//! Catalog row types
//!
//! Achievement, badge and daily challenge definitions. Rows are plain data;
//! the [`Catalog`](super::Catalog) owns them and indexes them for lookup.

use serde::{Deserialize, Serialize};

/// Achievement category for grouping in listings
///
/// Declaration order is the listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AchievementCategory {
    Daily,
    Career,
    Community,
    Cv,
    Milestone,
    Profile,
}

impl AchievementCategory {
    /// Get the string form used for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "DAILY",
            Self::Career => "CAREER",
            Self::Community => "COMMUNITY",
            Self::Cv => "CV",
            Self::Milestone => "MILESTONE",
            Self::Profile => "PROFILE",
        }
    }

    /// Parse from database string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "DAILY" => Some(Self::Daily),
            "CAREER" => Some(Self::Career),
            "COMMUNITY" => Some(Self::Community),
            "CV" => Some(Self::Cv),
            "MILESTONE" => Some(Self::Milestone),
            "PROFILE" => Some(Self::Profile),
            _ => None,
        }
    }
}

/// What a threshold achievement is measured against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConditionType {
    ApplicationCount,
    InterviewCount,
    InteractionCount,
    CvCount,
    ProfileComplete,
    ProjectCount,
    SkillCount,
    ExperienceCount,
}

impl ConditionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ApplicationCount => "APPLICATION_COUNT",
            Self::InterviewCount => "INTERVIEW_COUNT",
            Self::InteractionCount => "INTERACTION_COUNT",
            Self::CvCount => "CV_COUNT",
            Self::ProfileComplete => "PROFILE_COMPLETE",
            Self::ProjectCount => "PROJECT_COUNT",
            Self::SkillCount => "SKILL_COUNT",
            Self::ExperienceCount => "EXPERIENCE_COUNT",
        }
    }
}

/// A keyed award with an XP reward
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementDefinition {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub xp_reward: u32,
    #[serde(default)]
    pub repeatable: bool,
    /// Unbounded when absent
    #[serde(default)]
    pub max_repeats: Option<u32>,
    pub category: AchievementCategory,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub condition_type: Option<ConditionType>,
    #[serde(default)]
    pub condition_value: Option<u32>,
}

impl AchievementDefinition {
    /// Whether a user holding `earn_count` earns may earn this again
    pub fn can_repeat(&self, earn_count: u32) -> bool {
        self.repeatable && self.max_repeats.is_none_or(|max| earn_count < max)
    }
}

/// A level-indexed award
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadgeDefinition {
    pub level: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// An achievement gated to one completion per user per calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyChallengeDefinition {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub xp_reward: u32,
    #[serde(default)]
    pub icon: Option<String>,
}
