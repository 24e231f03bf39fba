//! # Outbound Ports (Driven Ports)
//!
//! Dependencies the orchestrator needs, injected at construction. The
//! runtime implements them over `gk-store`; tests implement them with
//! in-memory mocks. Nothing behind these ports may reach the network on
//! the decision path.

use shared_types::{AccessEvent, EventId, KeyMaterial, StorageError};

/// Access to the enrollment key material.
pub trait EnrolledKeyProvider: Send + Sync {
    /// The enrolled key, or `None` if the device was never enrolled.
    fn enrolled_key(&self) -> Result<Option<KeyMaterial>, StorageError>;
}

/// Membership queries against the local revocation snapshot.
pub trait RevocationLookup: Send + Sync {
    /// Whether the authorization is revoked, per local state only.
    fn is_revoked(&self, authorization_id: &str) -> bool;

    /// Whether any snapshot has ever been populated on this device.
    fn has_snapshot(&self) -> bool;
}

/// Durable recording of access events.
pub trait EventSink: Send + Sync {
    /// Commit one event to stable storage.
    ///
    /// # Errors
    /// * `StorageError` - the event could not be durably recorded
    fn enqueue(&self, event: &AccessEvent) -> Result<EventId, StorageError>;
}

/// Whether the terminal currently has connectivity.
///
/// Only stamps `offline_validated` on recorded events; decisions are
/// identical online and offline.
pub trait ConnectivityProbe: Send + Sync {
    fn is_online(&self) -> bool;
}
