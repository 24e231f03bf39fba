//! # Engine Configuration

use serde::{Deserialize, Serialize};
use shared_types::AccessAction;

/// Validation engine configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Debounce window for identical raw scan strings, in seconds. Absorbs
    /// rapid duplicate camera reads of a still-presented QR code; input
    /// hygiene only, never part of the decision logic.
    pub cooldown_secs: u64,

    /// Direction this terminal records. Gate staff switch it when the
    /// device moves between the entry and exit posts.
    pub action: AccessAction,

    /// When true, an otherwise-valid credential is refused until at least
    /// one revocation refresh has completed on this device. Default keeps
    /// the permissive behavior: an unpopulated cache treats every
    /// credential as not revoked.
    pub require_revocation_snapshot: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: 5,
            action: AccessAction::Entry,
            require_revocation_snapshot: false,
        }
    }
}

impl EngineConfig {
    /// Create a config for testing (no cooldown so tests control timing).
    pub fn for_testing() -> Self {
        Self {
            cooldown_secs: 0,
            action: AccessAction::Entry,
            require_revocation_snapshot: false,
        }
    }
}
