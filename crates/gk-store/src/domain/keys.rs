//! # Key Layout
//!
//! Byte-key conventions for the key-value files. Each concern lives in its
//! own file, so prefixes exist for self-description and scans, not for
//! cross-concern separation.

use shared_types::EventId;

/// Prefix of every queued access event record.
pub const EVENT_PREFIX: &[u8] = b"event:";

/// Key of the persisted revocation snapshot.
pub const REVOCATION_SNAPSHOT: &[u8] = b"revocation:snapshot";

/// Key of the revocation snapshot metadata.
pub const REVOCATION_META: &[u8] = b"revocation:meta";

/// Key of the enrollment key material.
pub const KEY_MATERIAL: &[u8] = b"enrollment:key-material";

/// Storage key of one access event.
pub fn event_key(id: EventId) -> Vec<u8> {
    let mut key = EVENT_PREFIX.to_vec();
    key.extend_from_slice(id.to_string().as_bytes());
    key
}
