//! # Sync Configuration

use serde::{Deserialize, Serialize};

/// Synchronization coordinator configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Seconds between periodic flushes. The first flush runs immediately on
    /// startup to drain any backlog left from a previous run.
    pub flush_interval_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            flush_interval_secs: 30,
        }
    }
}

impl SyncConfig {
    /// Create a config for testing. The interval is long enough that tests
    /// drive every flush explicitly.
    pub fn for_testing() -> Self {
        Self {
            flush_interval_secs: 3_600,
        }
    }
}
