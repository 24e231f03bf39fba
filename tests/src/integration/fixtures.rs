//! # Test Fixtures
//!
//! Signing, enrollment, and wiring helpers shared by the integration
//! scenarios. The issuer side (key generation, payload signing, QR string
//! assembly) lives only here; production code never signs anything.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use ed25519_dalek::{Signer, SigningKey};
use parking_lot::Mutex;
use std::collections::HashSet;

use gk_engine::{
    ConnectivityProbe, EngineConfig, EnrolledKeyProvider, EventSink, RevocationLookup,
    ValidationOrchestrator,
};
use gk_store::{EventStore, KeyMaterialStore, KeyValueStore, RevocationCache};
use gk_sync::{BatchAck, IngestionGateway, TransportError};
use shared_types::{
    AccessEvent, EventId, KeyMaterial, StorageError, Timestamp,
};

/// A fixed "now" all scenarios agree on.
pub const NOW: Timestamp = 1_700_100_000;

// =============================================================================
// ISSUER SIDE
// =============================================================================

/// Backend issuer double: holds the signing key whose public half the
/// terminal is enrolled with.
pub struct Issuer {
    signing_key: SigningKey,
    pub key_material: KeyMaterial,
}

impl Issuer {
    pub fn new() -> Self {
        let signing_key = SigningKey::from_bytes(&rand::random::<[u8; 32]>());
        let key_material = KeyMaterial {
            key_id: "org-12-key-1".to_string(),
            public_key: signing_key.verifying_key().to_bytes(),
            organization_id: "org-12".to_string(),
            enrolled_at: NOW - 86_400,
            max_clock_skew_minutes: 5,
        };
        Self {
            signing_key,
            key_material,
        }
    }

    /// Issue a credential valid around [`NOW`] for the given authorization.
    pub fn issue(&self, authorization_id: &str) -> String {
        self.issue_with(authorization_id, None, NOW - 3_600, NOW + 3_600)
    }

    /// Issue a credential carrying a vehicle plate.
    pub fn issue_with_vehicle(&self, authorization_id: &str, plate: &str) -> String {
        self.issue_with(authorization_id, Some(plate), NOW - 3_600, NOW + 3_600)
    }

    /// Issue a credential with an explicit validity window.
    pub fn issue_with(
        &self,
        authorization_id: &str,
        plate: Option<&str>,
        valid_from: Timestamp,
        valid_to: Timestamp,
    ) -> String {
        let mut payload = serde_json::json!({
            "authorizationId": authorization_id,
            "organizationId": self.key_material.organization_id,
            "unitCode": "C-310",
            "personName": "Alex Visitor",
            "personDocument": "11223344",
            "serviceType": "DELIVERY",
            "validFrom": valid_from,
            "validTo": valid_to,
            "issuedAt": valid_from,
            "kid": self.key_material.key_id,
        });
        if let Some(plate) = plate {
            payload["vehiclePlate"] = serde_json::json!(plate);
            payload["vehicleType"] = serde_json::json!("truck");
            payload["vehicleColor"] = serde_json::json!("white");
        }

        let bytes = payload.to_string().into_bytes();
        let signature = self.signing_key.sign(&bytes).to_bytes();
        gk_credential::encode_segments(&bytes, &signature)
    }
}

// =============================================================================
// TERMINAL-SIDE WIRING
// =============================================================================

/// The three stores a terminal keeps, shared the way the runtime shares them.
pub struct StoreBundle<S: KeyValueStore> {
    pub events: Arc<EventStore<S>>,
    pub revocations: Arc<RevocationCache<S>>,
    pub enrollment: Arc<KeyMaterialStore<S>>,
}

impl<S: KeyValueStore> StoreBundle<S> {
    pub fn open(events: S, revocations: S, enrollment: S) -> Result<Self, StorageError> {
        Ok(Self {
            events: Arc::new(EventStore::open(events)),
            revocations: Arc::new(RevocationCache::open(revocations)?),
            enrollment: Arc::new(KeyMaterialStore::open(enrollment)),
        })
    }
}

pub struct KeyProvider<S: KeyValueStore>(pub Arc<KeyMaterialStore<S>>);

impl<S: KeyValueStore> EnrolledKeyProvider for KeyProvider<S> {
    fn enrolled_key(&self) -> Result<Option<KeyMaterial>, StorageError> {
        self.0.load()
    }
}

pub struct RevocationAdapter<S: KeyValueStore>(pub Arc<RevocationCache<S>>);

impl<S: KeyValueStore> RevocationLookup for RevocationAdapter<S> {
    fn is_revoked(&self, authorization_id: &str) -> bool {
        self.0.is_revoked(authorization_id)
    }

    fn has_snapshot(&self) -> bool {
        self.0.has_snapshot()
    }
}

pub struct EventAdapter<S: KeyValueStore>(pub Arc<EventStore<S>>);

impl<S: KeyValueStore> EventSink for EventAdapter<S> {
    fn enqueue(&self, event: &AccessEvent) -> Result<EventId, StorageError> {
        self.0.enqueue(event)
    }
}

#[derive(Clone)]
pub struct ConnectivityFlag(pub Arc<AtomicBool>);

impl ConnectivityFlag {
    pub fn online() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn offline() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn set(&self, online: bool) {
        self.0.store(online, Ordering::SeqCst);
    }
}

impl ConnectivityProbe for ConnectivityFlag {
    fn is_online(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub type Engine<S> = ValidationOrchestrator<
    KeyProvider<S>,
    RevocationAdapter<S>,
    EventAdapter<S>,
    ConnectivityFlag,
>;

/// Wire an engine over the bundle the way the runtime does.
pub fn engine<S: KeyValueStore>(
    stores: &StoreBundle<S>,
    connectivity: ConnectivityFlag,
    config: EngineConfig,
) -> Engine<S> {
    ValidationOrchestrator::new(
        KeyProvider(Arc::clone(&stores.enrollment)),
        RevocationAdapter(Arc::clone(&stores.revocations)),
        EventAdapter(Arc::clone(&stores.events)),
        connectivity,
        config,
    )
}

// =============================================================================
// BACKEND SIDE
// =============================================================================

/// Ingestion backend double that deduplicates by `event_id` and can lose
/// acknowledgments or go down entirely.
#[derive(Default)]
pub struct DedupGateway {
    pub ingested: Mutex<HashSet<EventId>>,
    pub batches: Mutex<Vec<usize>>,
    /// Fail the next call at the transport level.
    pub fail_next: AtomicBool,
    /// With `fail_next`, still ingest before failing (lost acknowledgment).
    pub ingest_before_failing: AtomicBool,
}

impl DedupGateway {
    pub fn ingested_count(&self) -> usize {
        self.ingested.lock().len()
    }

    pub fn lose_next_ack(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
        self.ingest_before_failing.store(true, Ordering::SeqCst);
    }

    pub fn go_down(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
        self.ingest_before_failing.store(false, Ordering::SeqCst);
    }
}

#[async_trait]
impl IngestionGateway for DedupGateway {
    async fn submit_batch(&self, events: &[AccessEvent]) -> Result<BatchAck, TransportError> {
        self.batches.lock().push(events.len());
        let ids: Vec<EventId> = events.iter().map(|e| e.event_id).collect();

        if self.fail_next.swap(false, Ordering::SeqCst) {
            if self.ingest_before_failing.load(Ordering::SeqCst) {
                self.ingested.lock().extend(ids);
            }
            return Err(TransportError::Unreachable {
                message: "link lost".into(),
            });
        }

        self.ingested.lock().extend(ids.iter().copied());
        Ok(BatchAck {
            accepted: ids,
            rejected: Vec::new(),
        })
    }
}
