//! # Scan State Machine Types
//!
//! The orchestrator's externally visible state and the disposition of each
//! `scan` call. Transitions live in `service.rs`; these types only name the
//! positions.

use shared_types::{CredentialPayload, Timestamp, ValidationOutcome};

/// Where the orchestrator currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanState {
    /// Ready for the next scan.
    Idle,
    /// A credential passed every check but carries a vehicle plate; the
    /// decision (and its event) wait for staff to confirm the plate.
    AwaitingVehicleConfirmation(PendingVehicle),
    /// A decision was reached and displayed; `reset` returns to `Idle`.
    Decided(ValidationOutcome),
}

/// The validated credential parked while staff check the vehicle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingVehicle {
    /// Payload of the credential under confirmation.
    pub payload: CredentialPayload,
    /// When the scan happened; the deferred event keeps this instant.
    pub scanned_at: Timestamp,
    /// Whether the terminal was offline at scan time.
    pub offline_validated: bool,
}

/// Outcome of one `scan` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanDisposition {
    /// The pipeline ran to a terminal outcome; one event was enqueued.
    Decided(ValidationOutcome),
    /// All checks passed but a vehicle plate needs visual confirmation; no
    /// event recorded yet.
    AwaitingVehicleConfirmation {
        vehicle_plate: String,
        vehicle_type: Option<String>,
        vehicle_color: Option<String>,
    },
    /// Identical raw string re-scanned inside the cooldown window.
    IgnoredDuplicate,
    /// A vehicle confirmation is still pending; new scans are ignored.
    IgnoredBusy,
}
