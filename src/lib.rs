//! xpledger - a progression ledger
//!
//! Turns discrete user actions into experience points, levels, one-time or
//! repeatable achievements and level-indexed badges.
//!
//! ## Feeding the ledger
//!
//! 1. **Push**: a collaborator that knows which achievement it earned calls
//!    [`ProgressionManager::trigger_event`] with the key.
//!
//! 2. **Pull**: a collaborator bumps an activity counter and calls
//!    [`ProgressionManager::check_milestone_achievements`], which awards
//!    whatever threshold achievements the counts now justify.
//!
//! Daily challenges go through [`ProgressionManager::complete_daily_challenge`],
//! which allows one completion per user, challenge and calendar day.

pub mod catalog;
pub mod config;
pub mod error;
pub mod ledger;

pub use catalog::Catalog;
pub use config::Config;
pub use error::{ErrorKind, LedgerError};
pub use ledger::ProgressionManager;
