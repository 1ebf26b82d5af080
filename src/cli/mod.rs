//! CLI command implementations

pub mod events;
pub mod init;
pub mod report;
pub mod user;

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use xpledger::Config;
use xpledger::ledger::{Meta, ProgressionManager, TriggerEventResult};

/// Options shared by every command
pub struct CliContext {
    pub config_path: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
    pub json: bool,
}

impl CliContext {
    /// Load the config, applying `--db` on top
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load(self.config_path.as_deref())?;
        if let Some(db) = &self.db_path {
            config.ledger.database_path = Some(db.clone());
        }
        Ok(config)
    }

    pub fn open_ledger(&self) -> Result<ProgressionManager> {
        let config = self.load_config()?;
        ProgressionManager::open(&config)
            .with_context(|| format!("Failed to open ledger at {}", config.database_path().display()))
    }

    /// Print `value` as JSON with `--json`, otherwise through `human`
    pub fn emit<T: Serialize>(&self, value: &T, human: impl FnOnce(&T)) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            human(value);
        }
        Ok(())
    }
}

/// Parse a `--meta` argument (a JSON object)
pub fn parse_meta(raw: Option<&str>) -> Result<Option<Meta>> {
    raw.map(|s| serde_json::from_str::<Meta>(s).context("--meta must be a JSON object"))
        .transpose()
}

pub fn print_trigger_result(result: &TriggerEventResult) {
    if result.awarded_achievements.is_empty() {
        println!("No new achievements.");
    }
    for a in &result.awarded_achievements {
        let icon = a.icon.as_deref().unwrap_or("*");
        if a.earn_count > 1 {
            println!("  {} {} (+{} XP, x{})", icon, a.title, a.xp_reward, a.earn_count);
        } else {
            println!("  {} {} (+{} XP)", icon, a.title, a.xp_reward);
        }
    }
    if let Some(level) = result.new_level {
        println!("  Level up! Now level {}", level);
    }
    for b in &result.new_badges {
        println!("  {} New badge: {} (level {})", b.icon.as_deref().unwrap_or("*"), b.name, b.level);
    }
    println!("XP: {} (+{})  Level: {}", result.xp, result.xp_gained, result.level);
}
