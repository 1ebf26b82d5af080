//! Init command implementation

use anyhow::{Result, bail};
use tracing::info;

use xpledger::Config;
use xpledger::ledger::ProgressionManager;

use super::CliContext;

/// Write a default config and create the ledger database
pub fn init_command(ctx: &CliContext, force: bool) -> Result<()> {
    let config_path = ctx
        .config_path
        .clone()
        .unwrap_or_else(Config::global_config_path);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let mut config = Config::default();
    if let Some(db) = &ctx.db_path {
        config.ledger.database_path = Some(db.clone());
    }
    config.save_to_file(&config_path)?;
    info!("Created {}", config_path.display());

    let ledger = ProgressionManager::open(&config)?;
    println!("Config:   {}", config_path.display());
    println!("Database: {}", config.database_path().display());
    println!(
        "Catalog:  {} achievements, {} badges, {} daily challenges",
        ledger.catalog().achievements().len(),
        ledger.catalog().badges().count(),
        ledger.catalog().daily_challenges().len()
    );
    Ok(())
}
