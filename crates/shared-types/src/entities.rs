//! # Core Domain Entities
//!
//! Defines the entities flowing through the scan-to-sync pipeline.
//!
//! ## Clusters
//!
//! - **Credential**: `CredentialPayload`, `SignedCredential`, `ServiceType`
//! - **Decision**: `ValidationOutcome`, `AccessEvent`, `AccessAction`
//! - **Replication**: `RevocationEntry`, `SyncStatus`, `EventId`
//! - **Enrollment**: `KeyMaterial`

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// CLUSTER A: THE CREDENTIAL
// =============================================================================

/// Seconds since the Unix epoch.
pub type Timestamp = u64;

/// A 32-byte Ed25519 public key.
pub type PublicKey = [u8; 32];

/// A 64-byte Ed25519 signature.
pub type Signature = [u8; 64];

/// The kind of visit a credential authorizes.
///
/// Legacy issuers still emit `GUEST`, `SERVICE`, and `FAMILY`; those decode
/// to their modern counterparts so old QR codes keep scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceType {
    #[serde(rename = "VISIT", alias = "GUEST", alias = "FAMILY")]
    Visit,
    #[serde(rename = "DELIVERY")]
    Delivery,
    #[serde(rename = "TECHNICIAN", alias = "SERVICE")]
    Technician,
    #[serde(rename = "OTHER")]
    Other,
}

/// The structured content of a scanned QR credential.
///
/// Field names mirror the issuance service's JSON contract (camelCase on the
/// wire). Immutable once decoded; the codec is the only producer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialPayload {
    /// Opaque identifier of the authorization this credential was issued for.
    pub authorization_id: String,
    /// Organization the credential belongs to.
    pub organization_id: String,
    /// Unit (apartment/lot/suite) the visitor is headed to.
    pub unit_code: String,
    /// Visitor's display name.
    pub person_name: String,
    /// Visitor's identity document number.
    pub person_document: String,
    /// Kind of visit authorized.
    pub service_type: ServiceType,
    /// Start of the validity window (inclusive).
    pub valid_from: Timestamp,
    /// End of the validity window (inclusive).
    pub valid_to: Timestamp,
    /// Vehicle plate, when the visitor registered a vehicle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_plate: Option<String>,
    /// Vehicle type (car, motorcycle, truck, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,
    /// Vehicle color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_color: Option<String>,
    /// When the credential was issued.
    pub issued_at: Timestamp,
    /// Identifier of the public key that signs this credential.
    pub kid: String,
}

impl CredentialPayload {
    /// Whether the credential carries a vehicle that gate staff must
    /// visually confirm before admission.
    pub fn has_vehicle(&self) -> bool {
        self.vehicle_plate.is_some()
    }
}

/// A decoded credential together with the exact bytes that were signed and
/// the detached signature over them.
///
/// Produced once per scan by the codec; not persisted beyond the validation
/// step unless an event is recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedCredential {
    /// The structured payload.
    pub payload: CredentialPayload,
    /// The raw payload bytes the issuer signed (decoded first segment).
    pub signed_bytes: Vec<u8>,
    /// Detached Ed25519 signature over `signed_bytes`.
    pub signature: Signature,
}

// =============================================================================
// CLUSTER B: THE DECISION
// =============================================================================

/// Terminal result of validating one scan.
///
/// Drives both the operator-facing display and the recorded access event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationOutcome {
    /// Authentic, inside its validity window, not revoked.
    Valid,
    /// Signature verification failed, or a confirmed vehicle mismatch.
    Invalid,
    /// Authentic but outside the validity window (after skew tolerance).
    Expired,
    /// Present in the local revocation snapshot.
    Revoked,
    /// The scanned string could not be decoded into a credential.
    FormatError,
}

/// Direction of passage being recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessAction {
    Entry,
    Exit,
}

/// Synchronization state of a recorded access event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncStatus {
    /// Durably recorded locally, not yet acknowledged by the backend.
    Pending,
    /// Acknowledged by the backend; terminal state.
    Synced,
    /// Last transmission attempt failed; still eligible for retry.
    Failed,
}

/// Stable client-generated identifier of an access event.
///
/// The backend deduplicates by this identifier, which is what makes batch
/// resends after a crash idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One recorded access decision, owned by the event store until synchronized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessEvent {
    /// Stable identifier used for backend deduplication.
    pub event_id: EventId,
    /// Authorization the scan resolved to; `None` for format errors, where
    /// no payload could be decoded.
    pub authorization_id: Option<String>,
    /// Direction of passage.
    pub action: AccessAction,
    /// Outcome of the validation pipeline.
    pub scan_result: ValidationOutcome,
    /// Visitor name, when decodable.
    pub person_name: Option<String>,
    /// Visitor document, when decodable.
    pub person_document: Option<String>,
    /// Vehicle plate from the credential, when present.
    pub vehicle_plate: Option<String>,
    /// Staff's visual plate confirmation. Set only when a vehicle plate was
    /// present and confirmation was requested.
    pub vehicle_match: Option<bool>,
    /// True when the decision was produced without connectivity.
    pub offline_validated: bool,
    /// When the scan happened.
    pub scanned_at: Timestamp,
    /// Synchronization state.
    pub sync_status: SyncStatus,
    /// Number of failed transmission attempts so far.
    pub sync_attempts: u32,
}

// =============================================================================
// CLUSTER C: REPLICATED STATE
// =============================================================================

/// One entry of the locally mirrored revocation list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevocationEntry {
    /// Authorization whose credentials are no longer honored.
    pub authorization_id: String,
    /// When the backend revoked it.
    pub revoked_at: Timestamp,
}

// =============================================================================
// CLUSTER D: ENROLLMENT
// =============================================================================

/// Public key material provisioned during device enrollment.
///
/// Written once by the enrollment flow; read-only to the validation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMaterial {
    /// Identifier credentials reference via their `kid` field.
    pub key_id: String,
    /// Raw Ed25519 public key.
    pub public_key: PublicKey,
    /// Organization this terminal is enrolled with.
    pub organization_id: String,
    /// When enrollment happened.
    pub enrolled_at: Timestamp,
    /// Clock drift tolerated when checking validity windows, in minutes.
    pub max_clock_skew_minutes: u32,
}

impl KeyMaterial {
    /// Skew tolerance in seconds, for window arithmetic.
    pub fn clock_skew_secs(&self) -> u64 {
        u64::from(self.max_clock_skew_minutes) * 60
    }
}
