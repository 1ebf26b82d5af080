//! Configuration loading and management

mod io;
mod settings;

pub use settings::LedgerSettings;

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, CatalogConfig};

/// Main configuration structure
///
/// ```toml
/// [ledger]
/// xp_per_level = 300
/// day_boundary = "local"
///
/// [[badge]]
/// level = 1
/// name = "Bronze Explorer"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Ledger settings
    #[serde(default)]
    pub ledger: LedgerSettings,

    /// Catalog overrides; empty tables fall back to the built-in catalog
    #[serde(flatten)]
    pub catalog: CatalogConfig,
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Check settings that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.ledger.xp_per_level == 0 {
            anyhow::bail!("ledger.xp_per_level must be at least 1");
        }
        Ok(())
    }

    /// Build the immutable catalog described by this config
    pub fn build_catalog(&self) -> Result<Catalog> {
        Catalog::from_config(&self.catalog).context("Invalid catalog in config")
    }
}
