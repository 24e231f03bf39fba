//! # Terminal Configuration
//!
//! One JSON file configures the whole terminal; every field has a default so
//! a missing or partial file still yields a runnable configuration.

use std::path::PathBuf;

use anyhow::Context;
use gk_engine::EngineConfig;
use gk_sync::SyncConfig;
use serde::{Deserialize, Serialize};

/// Environment variable pointing at the JSON configuration file.
pub const CONFIG_ENV: &str = "GATEKEY_CONFIG";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "GATEKEY_DATA_DIR";

/// Complete terminal configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Directory holding the queue, revocation, and enrollment files plus
    /// the exclusive lock.
    pub data_dir: PathBuf,
    /// Validation engine configuration.
    pub engine: EngineConfig,
    /// Sync coordinator configuration.
    pub sync: SyncConfig,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("gatekey-data"),
            engine: EngineConfig::default(),
            sync: SyncConfig::default(),
        }
    }
}

impl TerminalConfig {
    /// Load configuration from the file named by `GATEKEY_CONFIG`, falling
    /// back to defaults when the variable is unset. `GATEKEY_DATA_DIR`
    /// overrides the data directory either way.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = match std::env::var(CONFIG_ENV) {
            Ok(path) => {
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file {path}"))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("Failed to parse config file {path}"))?
            }
            Err(_) => {
                tracing::info!("{CONFIG_ENV} not set, using default configuration");
                Self::default()
            }
        };

        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            config.data_dir = PathBuf::from(dir);
        }

        Ok(config)
    }
}
