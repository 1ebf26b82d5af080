//! Milestone scanner - re-derives threshold achievements from activity counts
//!
//! Pull-based: collaborators call [`MilestoneScanner::check_milestone_achievements`]
//! after any mutation and the scanner awards whatever the counts now justify.
//! A scan runs as one transaction through the [`EventProcessor`], so
//! rescanning never awards a non-repeatable achievement twice.

use super::activity::{ActivityStore, Counter, CounterSource};
use super::events::EventProcessor;
use super::models::TriggerEventResult;
use super::users;
use crate::error::Result;

/// One threshold achievement: earned once `counter >= threshold`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Milestone {
    pub key: &'static str,
    pub counter: Counter,
    pub threshold: u64,
}

const fn milestone(key: &'static str, counter: Counter, threshold: u64) -> Milestone {
    Milestone {
        key,
        counter,
        threshold,
    }
}

/// Threshold achievements checked on every scan
pub const MILESTONES: &[Milestone] = &[
    milestone("APPLICATION_ACE", Counter::Applications, 5),
    milestone("INTERVIEW_TRAILBLAZER", Counter::Interviews, 5),
    milestone("CONNECTOR", Counter::Interactions, 5),
    milestone("PROJECT_BUILDER", Counter::Projects, 5),
    milestone("SKILL_COLLECTOR", Counter::Skills, 5),
    milestone("SKILL_MASTER", Counter::Skills, 10),
    milestone("CAREER_CLIMBER", Counter::WorkEntries, 3),
    milestone("LAUNCHPAD", Counter::Projects, 1),
    milestone("WORK_STARTER", Counter::WorkEntries, 1),
];

/// Repeatable achievement earned once per full bucket of resumes
pub const RESUME_ARCHIVIST: &str = "RESUME_ARCHIVIST";

/// Resumes per RESUME_ARCHIVIST earn
pub const RESUME_BUCKET_SIZE: u64 = 3;

/// Reconciles achievements against activity counts
#[derive(Clone)]
pub struct MilestoneScanner {
    events: EventProcessor,
    activity: ActivityStore,
}

impl MilestoneScanner {
    pub fn new(events: EventProcessor, activity: ActivityStore) -> Self {
        Self { events, activity }
    }

    /// Scan using the ledger's own activity counters
    pub fn check_milestone_achievements(&self, user_id: &str) -> Result<TriggerEventResult> {
        self.check_milestone_achievements_with(user_id, &self.activity)
    }

    /// Scan using counts from any [`CounterSource`].
    ///
    /// The counts are read in one batch before anything is written; if that
    /// read fails the scan fails and nothing changes. Every award of the
    /// scan commits together.
    pub fn check_milestone_achievements_with(
        &self,
        user_id: &str,
        counters: &dyn CounterSource,
    ) -> Result<TriggerEventResult> {
        self.events.progress(user_id)?;
        let counts = counters.snapshot(user_id)?;

        let total = self.events.batch(|events, tx| {
            let (_, start_level) = users::load_progress(tx, user_id)?;
            let mut total = TriggerEventResult::default();

            // One call per full bucket on every scan; the cap stops repeats
            for _ in 0..counts.resumes / RESUME_BUCKET_SIZE {
                let result = events.apply(tx, user_id, RESUME_ARCHIVIST, None)?;
                let awarded = !result.awarded_achievements.is_empty();
                total.absorb(result);
                if !awarded {
                    break;
                }
            }

            for m in MILESTONES {
                if counts.get(m.counter) >= m.threshold {
                    total.absorb(events.apply(tx, user_id, m.key, None)?);
                }
            }

            let (xp, level) = users::load_progress(tx, user_id)?;
            total.xp = xp;
            total.level = level;
            total.leveled_up = level > start_level;
            total.new_level = total.leveled_up.then_some(level);
            Ok(total)
        })?;

        if !total.awarded_achievements.is_empty() {
            tracing::info!(
                "Milestone scan for {}: {} awards, +{} XP",
                user_id,
                total.awarded_achievements.len(),
                total.xp_gained
            );
        }
        Ok(total)
    }
}
