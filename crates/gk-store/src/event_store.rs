//! # Event Store
//!
//! Durable queue of access events awaiting transmission. Events enter via
//! `enqueue` at decision time and leave the drain set only through
//! `mark_synced` once the backend acknowledges them; `mark_failed` keeps an
//! event eligible for retry while making the failure observable.

use parking_lot::RwLock;
use shared_types::{AccessEvent, EventId, StorageError, SyncStatus};

use crate::domain::keys::{event_key, EVENT_PREFIX};
use crate::ports::outbound::KeyValueStore;

/// Durable access-event queue over a `KeyValueStore`.
///
/// Writes are serialized by the write lock; reads may run concurrently.
pub struct EventStore<S: KeyValueStore> {
    kv: RwLock<S>,
}

impl<S: KeyValueStore> EventStore<S> {
    /// Open the queue over an already-opened storage backend.
    pub fn open(kv: S) -> Self {
        Self { kv: RwLock::new(kv) }
    }

    /// Durably record an access event.
    ///
    /// Returns only after the backend commits the write; a crash right after
    /// `Ok` leaves the event PENDING and visible on restart.
    pub fn enqueue(&self, event: &AccessEvent) -> Result<EventId, StorageError> {
        let bytes = encode_event(event)?;
        self.kv.write().put(&event_key(event.event_id), &bytes)?;

        tracing::debug!(
            event_id = %event.event_id,
            outcome = ?event.scan_result,
            "Access event enqueued"
        );
        Ok(event.event_id)
    }

    /// All events not yet acknowledged by the backend (PENDING or FAILED),
    /// oldest scan first.
    pub fn dequeue_all(&self) -> Result<Vec<AccessEvent>, StorageError> {
        let mut events: Vec<AccessEvent> = self
            .kv
            .read()
            .prefix_scan(EVENT_PREFIX)?
            .into_iter()
            .map(|(key, value)| decode_event(&key, &value))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .filter(|e| e.sync_status != SyncStatus::Synced)
            .collect();

        events.sort_by_key(|e| e.scanned_at);
        Ok(events)
    }

    /// Number of events awaiting acknowledgment.
    pub fn pending_count(&self) -> Result<usize, StorageError> {
        Ok(self.dequeue_all()?.len())
    }

    /// Look up one event by identifier.
    pub fn get(&self, id: EventId) -> Result<Option<AccessEvent>, StorageError> {
        let key = event_key(id);
        match self.kv.read().get(&key)? {
            Some(bytes) => Ok(Some(decode_event(&key, &bytes)?)),
            None => Ok(None),
        }
    }

    /// Record backend acknowledgment. Terminal transition; the event leaves
    /// the drain set.
    pub fn mark_synced(&self, id: EventId) -> Result<(), StorageError> {
        self.update_status(id, |event| {
            event.sync_status = SyncStatus::Synced;
        })
    }

    /// Record a failed transmission attempt. The event stays eligible for
    /// the next flush; only the status and retry counter change.
    pub fn mark_failed(&self, id: EventId) -> Result<(), StorageError> {
        self.update_status(id, |event| {
            event.sync_status = SyncStatus::Failed;
            event.sync_attempts += 1;
        })
    }

    fn update_status(
        &self,
        id: EventId,
        mutate: impl FnOnce(&mut AccessEvent),
    ) -> Result<(), StorageError> {
        let key = event_key(id);
        let mut kv = self.kv.write();

        let bytes = kv.get(&key)?.ok_or_else(|| StorageError::NotFound {
            key: String::from_utf8_lossy(&key).into_owned(),
        })?;

        let mut event = decode_event(&key, &bytes)?;
        mutate(&mut event);
        kv.put(&key, &encode_event(&event)?)
    }
}

fn encode_event(event: &AccessEvent) -> Result<Vec<u8>, StorageError> {
    bincode::serialize(event).map_err(|e| StorageError::Io {
        message: e.to_string(),
    })
}

fn decode_event(key: &[u8], bytes: &[u8]) -> Result<AccessEvent, StorageError> {
    bincode::deserialize(bytes).map_err(|e| StorageError::CorruptRecord {
        key: String::from_utf8_lossy(key).into_owned(),
        message: e.to_string(),
    })
}
