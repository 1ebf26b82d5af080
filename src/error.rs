//! Error types for the progression ledger.

use std::fmt;

use thiserror::Error;

/// Kind of record a [`LedgerError::NotFound`] refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    User,
    Achievement,
    DailyChallenge,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::User => write!(f, "User"),
            Entity::Achievement => write!(f, "Achievement"),
            Entity::DailyChallenge => write!(f, "Daily challenge"),
        }
    }
}

/// Coarse classification used by callers that map errors onto responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Internal,
}

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: Entity, id: String },

    #[error("Daily challenge already completed today: {key}")]
    AlreadyCompletedToday { key: String },

    #[error("Achievement already claimed: {id}")]
    AlreadyClaimed { id: i64 },

    #[error("Activity counters unavailable: {0}")]
    Counters(String),

    #[error("Invalid meta payload: {0}")]
    Meta(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl LedgerError {
    pub fn user_not_found(user_id: &str) -> Self {
        LedgerError::NotFound {
            entity: Entity::User,
            id: user_id.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::NotFound { .. } => ErrorKind::NotFound,
            LedgerError::AlreadyCompletedToday { .. } | LedgerError::AlreadyClaimed { .. } => {
                ErrorKind::Conflict
            }
            LedgerError::Counters(_) | LedgerError::Meta(_) | LedgerError::Database(_) => {
                ErrorKind::Internal
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
