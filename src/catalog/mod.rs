//! Immutable catalogs: achievements, level badges and daily challenges
//!
//! A [`Catalog`] is built once at startup (from the config file or the
//! built-in rows), validated, and then shared read-only behind an `Arc`.
//! Lookups go through indexes built at construction time.

mod builtin;
mod definitions;

pub use definitions::{
    AchievementCategory, AchievementDefinition, BadgeDefinition, ConditionType,
    DailyChallengeDefinition,
};

use std::collections::{BTreeMap, HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// UPPER_SNAKE_CASE achievement and challenge keys
static KEY_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Z0-9_]*$").expect("key pattern is valid"));

/// Errors raised while validating catalog rows
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Invalid key format: {0} (expected UPPER_SNAKE_CASE)")]
    InvalidKey(String),

    #[error("Duplicate achievement key: {0}")]
    DuplicateAchievement(String),

    #[error("Duplicate badge level: {0}")]
    DuplicateBadge(u32),

    #[error("Badge level must be at least 1: {0}")]
    InvalidBadgeLevel(String),

    #[error("Duplicate daily challenge key: {0}")]
    DuplicateChallenge(String),

    #[error("Daily challenge {0} has no matching achievement definition")]
    UnpairedChallenge(String),

    #[error("max_repeats must be at least 1 for {0}")]
    InvalidMaxRepeats(String),
}

/// Catalog rows as they appear in the config file
///
/// Every table is optional; an empty table falls back to the built-in rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default, rename = "achievement", skip_serializing_if = "Vec::is_empty")]
    pub achievements: Vec<AchievementDefinition>,

    #[serde(default, rename = "badge", skip_serializing_if = "Vec::is_empty")]
    pub badges: Vec<BadgeDefinition>,

    #[serde(default, rename = "daily_challenge", skip_serializing_if = "Vec::is_empty")]
    pub daily_challenges: Vec<DailyChallengeDefinition>,
}

/// Validated, indexed, read-only catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    achievements: Vec<AchievementDefinition>,
    badges: BTreeMap<u32, BadgeDefinition>,
    daily_challenges: Vec<DailyChallengeDefinition>,
    achievement_index: HashMap<String, usize>,
    challenge_index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from raw rows, rejecting inconsistent input
    pub fn new(
        achievements: Vec<AchievementDefinition>,
        badges: Vec<BadgeDefinition>,
        daily_challenges: Vec<DailyChallengeDefinition>,
    ) -> Result<Self, CatalogError> {
        let mut achievement_index = HashMap::with_capacity(achievements.len());
        for (idx, def) in achievements.iter().enumerate() {
            if !KEY_FORMAT.is_match(&def.key) {
                return Err(CatalogError::InvalidKey(def.key.clone()));
            }
            if def.max_repeats == Some(0) {
                return Err(CatalogError::InvalidMaxRepeats(def.key.clone()));
            }
            if achievement_index.insert(def.key.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateAchievement(def.key.clone()));
            }
        }

        let mut badge_map = BTreeMap::new();
        for badge in badges {
            if badge.level == 0 {
                return Err(CatalogError::InvalidBadgeLevel(badge.name));
            }
            let level = badge.level;
            if badge_map.insert(level, badge).is_some() {
                return Err(CatalogError::DuplicateBadge(level));
            }
        }

        let mut challenge_index = HashMap::with_capacity(daily_challenges.len());
        for (idx, challenge) in daily_challenges.iter().enumerate() {
            if !KEY_FORMAT.is_match(&challenge.key) {
                return Err(CatalogError::InvalidKey(challenge.key.clone()));
            }
            // Daily challenges grant XP through the achievement of the same key
            if !achievement_index.contains_key(&challenge.key) {
                return Err(CatalogError::UnpairedChallenge(challenge.key.clone()));
            }
            if challenge_index.insert(challenge.key.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateChallenge(challenge.key.clone()));
            }
        }

        Ok(Self {
            achievements,
            badges: badge_map,
            daily_challenges,
            achievement_index,
            challenge_index,
        })
    }

    /// The built-in catalog
    pub fn builtin() -> Self {
        Self::new(
            builtin::achievements(),
            builtin::badges(),
            builtin::daily_challenges(),
        )
        .expect("built-in catalog is valid")
    }

    /// Build from config tables, filling empty tables with built-in rows
    pub fn from_config(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let achievements = if config.achievements.is_empty() {
            builtin::achievements()
        } else {
            config.achievements.clone()
        };
        let badges = if config.badges.is_empty() {
            builtin::badges()
        } else {
            config.badges.clone()
        };
        let daily_challenges = if config.daily_challenges.is_empty() {
            builtin::daily_challenges()
        } else {
            config.daily_challenges.clone()
        };
        Self::new(achievements, badges, daily_challenges)
    }

    /// Look up an achievement definition by key
    pub fn achievement(&self, key: &str) -> Option<&AchievementDefinition> {
        self.achievement_index
            .get(key)
            .map(|&idx| &self.achievements[idx])
    }

    /// Look up the badge awarded at a level
    pub fn badge_for_level(&self, level: u32) -> Option<&BadgeDefinition> {
        self.badges.get(&level)
    }

    /// Look up a daily challenge by key
    pub fn daily_challenge(&self, key: &str) -> Option<&DailyChallengeDefinition> {
        self.challenge_index
            .get(key)
            .map(|&idx| &self.daily_challenges[idx])
    }

    /// All achievement definitions in declaration order
    pub fn achievements(&self) -> &[AchievementDefinition] {
        &self.achievements
    }

    /// All badge definitions, level ascending
    pub fn badges(&self) -> impl Iterator<Item = &BadgeDefinition> {
        self.badges.values()
    }

    /// All daily challenges in declaration order
    pub fn daily_challenges(&self) -> &[DailyChallengeDefinition] {
        &self.daily_challenges
    }

    /// Every event key the ledger recognizes
    pub fn event_keys(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.achievements
            .iter()
            .map(|a| a.key.as_str())
            .chain(self.daily_challenges.iter().map(|c| c.key.as_str()))
            .filter(|k| seen.insert(*k))
            .collect()
    }

    /// Closest known event key to a mistyped one, if any is close enough
    pub fn suggest_key(&self, query: &str) -> Option<&str> {
        use strsim::jaro_winkler;

        // Minimum fuzzy similarity threshold (0.0 - 1.0)
        const FUZZY_THRESHOLD: f64 = 0.75;

        let query_upper = query.to_uppercase();
        self.event_keys()
            .into_iter()
            .map(|key| (key, jaro_winkler(key, &query_upper)))
            .filter(|(_, score)| *score >= FUZZY_THRESHOLD)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(key, _)| key)
    }

    /// Achievement definitions ordered by category, then XP reward descending
    pub fn achievements_for_listing(&self) -> Vec<&AchievementDefinition> {
        let mut defs: Vec<_> = self.achievements.iter().collect();
        defs.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then_with(|| b.xp_reward.cmp(&a.xp_reward))
        });
        defs
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
