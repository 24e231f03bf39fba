//! # Port Adapters
//!
//! Connects the engine's outbound ports to the store subsystem. Each adapter
//! is a thin shim over an `Arc`-shared store so the engine and the sync
//! coordinator can see the same state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use gk_engine::{ConnectivityProbe, EnrolledKeyProvider, EventSink, RevocationLookup};
use gk_store::{EventStore, KeyMaterialStore, KeyValueStore, RevocationCache};
use shared_types::{AccessEvent, EventId, KeyMaterial, StorageError};

/// Serves the enrollment key from the key material store.
pub struct StoredKeyProvider<S: KeyValueStore> {
    store: Arc<KeyMaterialStore<S>>,
}

impl<S: KeyValueStore> StoredKeyProvider<S> {
    pub fn new(store: Arc<KeyMaterialStore<S>>) -> Self {
        Self { store }
    }
}

impl<S: KeyValueStore> EnrolledKeyProvider for StoredKeyProvider<S> {
    fn enrolled_key(&self) -> Result<Option<KeyMaterial>, StorageError> {
        self.store.load()
    }
}

/// Answers revocation queries from the local snapshot.
pub struct SnapshotRevocationLookup<S: KeyValueStore> {
    cache: Arc<RevocationCache<S>>,
}

impl<S: KeyValueStore> SnapshotRevocationLookup<S> {
    pub fn new(cache: Arc<RevocationCache<S>>) -> Self {
        Self { cache }
    }
}

impl<S: KeyValueStore> RevocationLookup for SnapshotRevocationLookup<S> {
    fn is_revoked(&self, authorization_id: &str) -> bool {
        self.cache.is_revoked(authorization_id)
    }

    fn has_snapshot(&self) -> bool {
        self.cache.has_snapshot()
    }
}

/// Records decisions in the durable event queue.
pub struct DurableEventSink<S: KeyValueStore> {
    events: Arc<EventStore<S>>,
}

impl<S: KeyValueStore> DurableEventSink<S> {
    pub fn new(events: Arc<EventStore<S>>) -> Self {
        Self { events }
    }
}

impl<S: KeyValueStore> EventSink for DurableEventSink<S> {
    fn enqueue(&self, event: &AccessEvent) -> Result<EventId, StorageError> {
        self.events.enqueue(event)
    }
}

/// Connectivity flag shared between the runtime and the engine.
///
/// The runtime flips it from whatever link monitoring it has; the engine only
/// reads it to stamp `offline_validated`.
#[derive(Clone)]
pub struct SharedConnectivity {
    online: Arc<AtomicBool>,
}

impl SharedConnectivity {
    pub fn new(online: bool) -> Self {
        Self {
            online: Arc::new(AtomicBool::new(online)),
        }
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }
}

impl ConnectivityProbe for SharedConnectivity {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}
