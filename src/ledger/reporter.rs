//! Status and leaderboard reporter - read-only projections of the ledger

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use rusqlite::{Connection, params};

use super::activity::{ActivityCounts, ActivityStore, Counter, CounterSource};
use super::db::LedgerDb;
use super::levels::LevelProgress;
use super::models::{
    AchievementProgressView, BadgeSummary, DailyChallengeBoard, DailyChallengeStatus,
    EarnedAchievement, EarnedBadge, LeaderboardEntry, Meta, Progress, XpStatus,
};
use super::time_bucket::{Clock, day_bucket};
use super::users;
use crate::catalog::{AchievementCategory, AchievementDefinition, BadgeDefinition, Catalog};
use crate::config::LedgerSettings;
use crate::error::Result;

/// What a progress bar measures
#[derive(Debug, Clone, Copy)]
enum Measure {
    Count(Counter),
    /// 1 once any of skills, work entries or projects exist
    ProfileContent,
}

/// Progress bar definitions for the achievements that have one
const PROGRESS_TARGETS: &[(&str, Measure, u64)] = &[
    ("APPLICATION_ACE", Measure::Count(Counter::Applications), 5),
    ("INTERVIEW_TRAILBLAZER", Measure::Count(Counter::Interviews), 5),
    ("THOUGHT_LEADER", Measure::Count(Counter::Posts), 1),
    ("COMMUNITY_VOICE", Measure::Count(Counter::Comments), 1),
    ("CONNECTOR", Measure::Count(Counter::Interactions), 5),
    ("RESUME_ARCHIVIST", Measure::Count(Counter::Resumes), 3),
    ("PROFILE_PIONEER", Measure::ProfileContent, 1),
    ("LAUNCHPAD", Measure::Count(Counter::Projects), 1),
    ("PROJECT_BUILDER", Measure::Count(Counter::Projects), 5),
    ("SKILL_COLLECTOR", Measure::Count(Counter::Skills), 5),
    ("SKILL_MASTER", Measure::Count(Counter::Skills), 10),
    ("WORK_STARTER", Measure::Count(Counter::WorkEntries), 1),
    ("CAREER_CLIMBER", Measure::Count(Counter::WorkEntries), 3),
];

fn progress_for(def: &AchievementDefinition, counts: &ActivityCounts) -> Progress {
    match PROGRESS_TARGETS.iter().find(|(key, _, _)| *key == def.key) {
        Some((_, Measure::Count(counter), target)) => Progress::new(counts.get(*counter), *target),
        Some((_, Measure::ProfileContent, target)) => {
            Progress::new(u64::from(counts.has_profile_content()), *target)
        }
        None => Progress::new(0, u64::from(def.condition_value.unwrap_or(1))),
    }
}

/// Read-only queries over the ledger
#[derive(Clone)]
pub struct ProgressReporter {
    db: LedgerDb,
    catalog: Arc<Catalog>,
    clock: Arc<dyn Clock>,
    activity: ActivityStore,
    settings: LedgerSettings,
}

impl ProgressReporter {
    pub fn new(
        db: LedgerDb,
        catalog: Arc<Catalog>,
        clock: Arc<dyn Clock>,
        activity: ActivityStore,
        settings: LedgerSettings,
    ) -> Self {
        Self {
            db,
            catalog,
            clock,
            activity,
            settings,
        }
    }

    // ========================================
    // USER STATUS
    // ========================================

    /// Full progression snapshot for one user
    pub fn get_xp_status(&self, user_id: &str) -> Result<XpStatus> {
        let conn = self.db.conn();
        let (xp, level) = users::load_progress(&conn, user_id)?;
        let xp_per_level = self.settings.xp_per_level.max(1);
        let progress = LevelProgress::new(xp, xp_per_level);

        let achievements = load_earned_achievements(&conn, user_id)?;
        let badges = load_earned_badges(&conn, user_id)?;
        let current_badge = badges.first().map(BadgeSummary::from);

        let day = day_bucket(self.clock.now(), self.settings.day_boundary);
        let done = completed_challenges(&conn, user_id, &day)?;
        let available: Vec<DailyChallengeStatus> = self
            .catalog
            .daily_challenges()
            .iter()
            .map(|c| DailyChallengeStatus {
                key: c.key.clone(),
                title: c.title.clone(),
                description: c.description.clone(),
                xp_reward: c.xp_reward,
                icon: c.icon.clone(),
                completed: done.contains(&c.key),
            })
            .collect();
        let completed_today = available.iter().filter(|c| c.completed).count();

        Ok(XpStatus {
            xp,
            level,
            current_level_xp: progress.current_level_xp,
            next_level_xp: progress.next_level_xp,
            progress_xp: progress.progress_xp,
            progress_percent: progress.progress_percent,
            xp_per_level,
            display_range: progress.display_range(),
            achievements,
            badges,
            current_badge,
            daily_challenges: DailyChallengeBoard {
                day,
                max_daily: available.len(),
                available,
                completed_today,
            },
        })
    }

    // ========================================
    // CATALOG VIEWS
    // ========================================

    /// Catalog achievements, by category then XP reward descending
    pub fn get_achievement_definitions(&self) -> Vec<AchievementDefinition> {
        self.catalog
            .achievements_for_listing()
            .into_iter()
            .cloned()
            .collect()
    }

    /// Badge definitions, level ascending
    pub fn get_badge_definitions(&self) -> Vec<BadgeDefinition> {
        self.catalog.badges().cloned().collect()
    }

    /// Every key accepted by `trigger_event`
    pub fn event_keys(&self) -> Vec<String> {
        self.catalog
            .event_keys()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Every catalog achievement with the user's earn state and progress
    pub fn get_achievement_definitions_with_progress(
        &self,
        user_id: &str,
    ) -> Result<Vec<AchievementProgressView>> {
        self.get_achievement_definitions_with_progress_from(user_id, &self.activity)
    }

    /// Same as [`Self::get_achievement_definitions_with_progress`], reading
    /// counts from `counters`
    pub fn get_achievement_definitions_with_progress_from(
        &self,
        user_id: &str,
        counters: &dyn CounterSource,
    ) -> Result<Vec<AchievementProgressView>> {
        let earned = {
            let conn = self.db.conn();
            users::load_progress(&conn, user_id)?;
            load_earn_state(&conn, user_id)?
        };
        // The bundled counter source shares the connection, so the lock is released first
        let counts = counters.snapshot(user_id)?;

        let views = self
            .catalog
            .achievements_for_listing()
            .into_iter()
            .map(|def| {
                let state = earned.get(&def.key);
                AchievementProgressView {
                    key: def.key.clone(),
                    title: def.title.clone(),
                    description: def.description.clone(),
                    xp_reward: def.xp_reward,
                    icon: def.icon.clone(),
                    category: def.category,
                    condition_type: def.condition_type,
                    condition_value: def.condition_value,
                    repeatable: def.repeatable,
                    max_repeats: def.max_repeats,
                    earned: state.is_some(),
                    earn_count: state.map_or(0, |s| s.earn_count),
                    claimed: state.is_some_and(|s| s.claimed),
                    claimed_at: state.and_then(|s| s.claimed_at),
                    awarded_at: state.map(|s| s.awarded_at),
                    user_achievement_id: state.map(|s| s.id),
                    progress: progress_for(def, &counts),
                }
            })
            .collect();
        Ok(views)
    }

    // ========================================
    // LEADERBOARD
    // ========================================

    /// Active users by XP descending; `limit` defaults to the configured size
    pub fn get_leaderboard(&self, limit: Option<usize>) -> Result<Vec<LeaderboardEntry>> {
        let limit = limit.unwrap_or(self.settings.leaderboard_limit);
        let conn = self.db.conn();
        let mut stmt = conn.prepare(
            r#"SELECT u.id, u.name, u.profile_image, u.xp, u.level,
                      b.level, b.name, b.icon, b.color
               FROM users u
               LEFT JOIN badge_definitions b ON b.level = (
                   SELECT ub.badge_level FROM user_badges ub
                   WHERE ub.user_id = u.id
                   ORDER BY ub.awarded_at DESC, ub.id DESC
                   LIMIT 1
               )
               WHERE u.is_active = 1
               ORDER BY u.xp DESC, u.id ASC
               LIMIT ?1"#,
        )?;

        let rows = stmt.query_map([limit], |row| {
            let badge_level: Option<u32> = row.get(5)?;
            let current_badge = match badge_level {
                Some(level) => Some(BadgeSummary {
                    level,
                    name: row.get(6)?,
                    icon: row.get(7)?,
                    color: row.get(8)?,
                }),
                None => None,
            };
            Ok(LeaderboardEntry {
                rank: 0,
                user_id: row.get(0)?,
                name: row
                    .get::<_, Option<String>>(1)?
                    .unwrap_or_else(|| "Anonymous".to_string()),
                profile_image: row.get(2)?,
                xp: row.get(3)?,
                level: row.get(4)?,
                current_badge,
            })
        })?;

        let mut entries = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        for (idx, entry) in entries.iter_mut().enumerate() {
            entry.rank = idx + 1;
        }
        Ok(entries)
    }
}

/// Earn state of one user achievement row
struct EarnState {
    id: i64,
    earn_count: u32,
    claimed: bool,
    claimed_at: Option<i64>,
    awarded_at: i64,
}

fn load_earn_state(conn: &Connection, user_id: &str) -> Result<HashMap<String, EarnState>> {
    let mut stmt = conn.prepare(
        r#"SELECT achievement_key, id, earn_count, claimed, claimed_at, awarded_at
           FROM user_achievements WHERE user_id = ?1"#,
    )?;
    let rows = stmt.query_map([user_id], |row| {
        Ok((
            row.get::<_, String>(0)?,
            EarnState {
                id: row.get(1)?,
                earn_count: row.get(2)?,
                claimed: row.get(3)?,
                claimed_at: row.get(4)?,
                awarded_at: row.get(5)?,
            },
        ))
    })?;
    Ok(rows.collect::<rusqlite::Result<HashMap<_, _>>>()?)
}

fn load_earned_achievements(conn: &Connection, user_id: &str) -> Result<Vec<EarnedAchievement>> {
    let mut stmt = conn.prepare(
        r#"SELECT ua.id, ua.achievement_key, COALESCE(d.title, ua.achievement_key),
                  COALESCE(d.description, ''), COALESCE(d.xp_reward, 0), d.icon, d.category,
                  ua.claimed, ua.claimed_at, ua.earn_count, ua.awarded_at, ua.meta
           FROM user_achievements ua
           LEFT JOIN achievement_definitions d ON d.key = ua.achievement_key
           WHERE ua.user_id = ?1
           ORDER BY ua.awarded_at DESC, ua.id DESC"#,
    )?;

    let rows = stmt.query_map([user_id], |row| {
        let category: Option<String> = row.get(6)?;
        let meta: Option<String> = row.get(11)?;
        Ok((
            EarnedAchievement {
                id: row.get(0)?,
                key: row.get(1)?,
                title: row.get(2)?,
                description: row.get(3)?,
                xp_reward: row.get(4)?,
                icon: row.get(5)?,
                category: category.as_deref().and_then(AchievementCategory::from_str),
                claimed: row.get(7)?,
                claimed_at: row.get(8)?,
                earn_count: row.get(9)?,
                awarded_at: row.get(10)?,
                meta: None,
            },
            meta,
        ))
    })?;

    let mut achievements = Vec::new();
    for row in rows {
        let (mut achievement, meta) = row?;
        if let Some(raw) = meta {
            match serde_json::from_str::<Meta>(&raw) {
                Ok(parsed) => achievement.meta = Some(parsed),
                Err(e) => tracing::warn!("Unreadable meta on user achievement {}: {}", achievement.id, e),
            }
        }
        achievements.push(achievement);
    }
    Ok(achievements)
}

fn load_earned_badges(conn: &Connection, user_id: &str) -> Result<Vec<EarnedBadge>> {
    let mut stmt = conn.prepare(
        r#"SELECT ub.id, ub.badge_level, b.name, b.description, b.icon, b.color, ub.awarded_at
           FROM user_badges ub
           JOIN badge_definitions b ON b.level = ub.badge_level
           WHERE ub.user_id = ?1
           ORDER BY ub.awarded_at DESC, ub.id DESC"#,
    )?;
    let badges = stmt
        .query_map([user_id], |row| {
            Ok(EarnedBadge {
                id: row.get(0)?,
                level: row.get(1)?,
                name: row.get(2)?,
                description: row.get(3)?,
                icon: row.get(4)?,
                color: row.get(5)?,
                awarded_at: row.get(6)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(badges)
}

fn completed_challenges(conn: &Connection, user_id: &str, day: &str) -> Result<HashSet<String>> {
    let mut stmt = conn.prepare(
        "SELECT challenge_key FROM daily_challenge_completions WHERE user_id = ?1 AND day_bucket = ?2",
    )?;
    let keys = stmt
        .query_map(params![user_id, day], |row| row.get(0))?
        .collect::<rusqlite::Result<HashSet<String>>>()?;
    Ok(keys)
}
