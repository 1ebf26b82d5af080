//! Configuration file I/O operations

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

use super::Config;

const CONFIG_HEADER: &str = "\
# xpledger configuration
#
# Add [[achievement]], [[badge]] or [[daily_challenge]] tables to replace
# the matching built-in catalog table.
";

impl Config {
    /// Get the global config directory path (~/.xpledger/)
    pub fn global_config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".xpledger")
    }

    /// Get the global config file path (~/.xpledger/config.toml)
    pub fn global_config_path() -> PathBuf {
        Self::global_config_dir().join("config.toml")
    }

    /// Database path from settings, or ~/.xpledger/ledger.db
    pub fn database_path(&self) -> PathBuf {
        self.ledger
            .database_path
            .clone()
            .unwrap_or_else(|| Self::global_config_dir().join("ledger.db"))
    }

    /// Load configuration from an explicit path, or the global config.
    ///
    /// A missing global config is not an error; defaults are used instead.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        let global_path = Self::global_config_path();
        if global_path.exists() {
            Self::from_file(&global_path)
        } else {
            tracing::debug!("No config at {}, using defaults", global_path.display());
            Ok(Self::default())
        }
    }

    /// TOML text for this config, headed by a note on the catalog tables
    pub fn render(&self) -> Result<String> {
        let body = toml::to_string_pretty(self).context("Failed to serialize config")?;
        Ok(format!("{CONFIG_HEADER}\n{body}"))
    }

    /// Write the config to `path`, replacing any existing file whole.
    ///
    /// Writers serialize on `<path>.lock`; readers only ever see the old or
    /// the new file.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = self.render()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let lock_path = path.with_extension("toml.lock");
        let lock = File::create(&lock_path)
            .with_context(|| format!("Failed to open {}", lock_path.display()))?;
        lock.lock_exclusive()
            .with_context(|| format!("Failed to lock {}", lock_path.display()))?;

        let temp_path = path.with_extension("toml.tmp");
        let mut temp = File::create(&temp_path)
            .with_context(|| format!("Failed to create {}", temp_path.display()))?;
        temp.write_all(content.as_bytes())
            .and_then(|_| temp.sync_all())
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;

        drop(lock);
        tracing::debug!("Saved config to {}", path.display());
        Ok(())
    }
}
