//! Collaborator contract
//!
//! Other services report what just happened to a user as a
//! [`CollaboratorAction`]. Each action maps to an optional counter bump and
//! then either a milestone scan or one direct trigger.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::activity::Counter;

/// Something a collaborator did for a user after its own write succeeded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollaboratorAction {
    JobApplicationCreated,
    InterviewCreated,
    ResumeCreated,
    SkillCreated,
    ProjectCreated,
    WorkHistoryCreated,
    InteractionCreated,
    ProfileUpdated,
    CommunityPostCreated,
    CommunityCommentCreated,
    InterviewCompleted,
    ConsultationCompleted,
    AdviceStepCompleted,
}

/// How the ledger reacts to an action after counting it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Re-run the milestone scan
    Scan,
    /// Trigger one achievement key
    Trigger(&'static str),
}

/// Counter to bump (if any) and what to run next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionEffect {
    pub counter: Option<Counter>,
    pub dispatch: Dispatch,
}

impl CollaboratorAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::JobApplicationCreated => "job-application-created",
            Self::InterviewCreated => "interview-created",
            Self::ResumeCreated => "resume-created",
            Self::SkillCreated => "skill-created",
            Self::ProjectCreated => "project-created",
            Self::WorkHistoryCreated => "work-history-created",
            Self::InteractionCreated => "interaction-created",
            Self::ProfileUpdated => "profile-updated",
            Self::CommunityPostCreated => "community-post-created",
            Self::CommunityCommentCreated => "community-comment-created",
            Self::InterviewCompleted => "interview-completed",
            Self::ConsultationCompleted => "consultation-completed",
            Self::AdviceStepCompleted => "advice-step-completed",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|a| a.as_str() == s)
    }

    pub fn all() -> &'static [CollaboratorAction] {
        &[
            Self::JobApplicationCreated,
            Self::InterviewCreated,
            Self::ResumeCreated,
            Self::SkillCreated,
            Self::ProjectCreated,
            Self::WorkHistoryCreated,
            Self::InteractionCreated,
            Self::ProfileUpdated,
            Self::CommunityPostCreated,
            Self::CommunityCommentCreated,
            Self::InterviewCompleted,
            Self::ConsultationCompleted,
            Self::AdviceStepCompleted,
        ]
    }

    pub fn effect(&self) -> ActionEffect {
        let (counter, dispatch) = match self {
            Self::JobApplicationCreated => (Some(Counter::Applications), Dispatch::Scan),
            Self::InterviewCreated => (Some(Counter::Interviews), Dispatch::Scan),
            Self::ResumeCreated => (Some(Counter::Resumes), Dispatch::Scan),
            Self::SkillCreated => (Some(Counter::Skills), Dispatch::Scan),
            Self::ProjectCreated => (Some(Counter::Projects), Dispatch::Scan),
            Self::WorkHistoryCreated => (Some(Counter::WorkEntries), Dispatch::Scan),
            Self::InteractionCreated => (Some(Counter::Interactions), Dispatch::Scan),
            Self::ProfileUpdated => (None, Dispatch::Scan),
            Self::CommunityPostCreated => (Some(Counter::Posts), Dispatch::Trigger("THOUGHT_LEADER")),
            Self::CommunityCommentCreated => {
                (Some(Counter::Comments), Dispatch::Trigger("COMMUNITY_VOICE"))
            }
            Self::InterviewCompleted => (None, Dispatch::Trigger("INTERVIEW_INSIGHT")),
            Self::ConsultationCompleted => (None, Dispatch::Trigger("ADVISOR")),
            Self::AdviceStepCompleted => (None, Dispatch::Trigger("ADVICE_STEP_COMPLETE")),
        };
        ActionEffect { counter, dispatch }
    }
}

impl fmt::Display for CollaboratorAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
