//! # Revocation Cache
//!
//! Locally persisted mirror of the server-side revocation list. Membership
//! queries answer purely from local state; the refresh trigger (scheduling,
//! connectivity detection) lives outside this crate.
//!
//! A refresh is a full replacement, not a merge: merging could resurrect
//! revocations the server has since expired while the terminal was offline.
//! Readers racing a refresh observe either the previous snapshot or the new
//! one, never a mix.

use std::collections::HashSet;

use parking_lot::RwLock;
use shared_types::{RevocationEntry, StorageError, Timestamp};

use crate::domain::keys::{REVOCATION_META, REVOCATION_SNAPSHOT};
use crate::ports::outbound::KeyValueStore;

/// Metadata of the currently held snapshot.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct SnapshotMeta {
    refreshed_at: Timestamp,
    entry_count: usize,
}

struct Inner<S> {
    kv: S,
    revoked: HashSet<String>,
    meta: Option<SnapshotMeta>,
}

/// Persistent revocation snapshot with atomic full replacement.
pub struct RevocationCache<S: KeyValueStore> {
    inner: RwLock<Inner<S>>,
}

impl<S: KeyValueStore> RevocationCache<S> {
    /// Open the cache, restoring the last persisted snapshot if one exists.
    pub fn open(kv: S) -> Result<Self, StorageError> {
        let meta: Option<SnapshotMeta> = match kv.get(REVOCATION_META)? {
            Some(bytes) => Some(decode(REVOCATION_META, &bytes)?),
            None => None,
        };

        let revoked = match kv.get(REVOCATION_SNAPSHOT)? {
            Some(bytes) => {
                let entries: Vec<RevocationEntry> = decode(REVOCATION_SNAPSHOT, &bytes)?;
                entries.into_iter().map(|e| e.authorization_id).collect()
            }
            None => HashSet::new(),
        };

        if let Some(ref meta) = meta {
            tracing::info!(
                entries = revoked.len(),
                refreshed_at = meta.refreshed_at,
                "Restored revocation snapshot"
            );
        } else {
            tracing::warn!("No revocation snapshot has ever been populated");
        }

        Ok(Self {
            inner: RwLock::new(Inner { kv, revoked, meta }),
        })
    }

    /// Whether the authorization is in the local snapshot.
    ///
    /// Purely local; with no snapshot ever populated this is `false`, a
    /// documented staleness risk the engine can tighten via its
    /// `require_revocation_snapshot` policy.
    pub fn is_revoked(&self, authorization_id: &str) -> bool {
        self.inner.read().revoked.contains(authorization_id)
    }

    /// Whether at least one refresh has ever completed on this device.
    pub fn has_snapshot(&self) -> bool {
        self.inner.read().meta.is_some()
    }

    /// When the current snapshot was taken, if any.
    pub fn refreshed_at(&self) -> Option<Timestamp> {
        self.inner.read().meta.as_ref().map(|m| m.refreshed_at)
    }

    /// Number of revoked authorizations currently held.
    pub fn len(&self) -> usize {
        self.inner.read().revoked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Atomically replace the snapshot with a freshly fetched list.
    ///
    /// The new snapshot is persisted before it becomes visible; a failed
    /// persist leaves the previous snapshot fully in effect.
    pub fn refresh(
        &self,
        entries: Vec<RevocationEntry>,
        now: Timestamp,
    ) -> Result<(), StorageError> {
        let meta = SnapshotMeta {
            refreshed_at: now,
            entry_count: entries.len(),
        };
        let snapshot_bytes = encode(&entries)?;
        let meta_bytes = encode(&meta)?;

        let mut inner = self.inner.write();
        inner.kv.put(REVOCATION_SNAPSHOT, &snapshot_bytes)?;
        inner.kv.put(REVOCATION_META, &meta_bytes)?;

        inner.revoked = entries.into_iter().map(|e| e.authorization_id).collect();
        inner.meta = Some(meta);

        tracing::info!(entries = inner.revoked.len(), "Revocation snapshot replaced");
        Ok(())
    }
}

fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, StorageError> {
    bincode::serialize(value).map_err(|e| StorageError::Io {
        message: e.to_string(),
    })
}

fn decode<T: serde::de::DeserializeOwned>(key: &[u8], bytes: &[u8]) -> Result<T, StorageError> {
    bincode::deserialize(bytes).map_err(|e| StorageError::CorruptRecord {
        key: String::from_utf8_lossy(key).into_owned(),
        message: e.to_string(),
    })
}
