//! # Validation Orchestrator
//!
//! Application service wiring the credential domain functions to the
//! outbound ports. Implements the inbound `ValidationApi`.
//!
//! ## Invariants
//!
//! - Exactly one access event per terminal decision; a pending vehicle
//!   confirmation defers its event, and an abandoned one records nothing.
//! - Decisions never depend on backend availability; everything here reads
//!   local state only.
//! - A storage failure on the event write aborts the decision with a
//!   blocking error instead of dropping the event silently.

use shared_types::{
    AccessEvent, CredentialPayload, EventId, Timestamp, ValidationOutcome,
};

use crate::config::EngineConfig;
use crate::domain::errors::EngineError;
use crate::domain::state::{PendingVehicle, ScanDisposition, ScanState};
use crate::ports::inbound::ValidationApi;
use crate::ports::outbound::{
    ConnectivityProbe, EnrolledKeyProvider, EventSink, RevocationLookup,
};

/// The scan-to-decision orchestrator.
///
/// All collaborators are injected, which keeps the pipeline deterministic
/// under test: a mock clock value comes in through `scan`, mock ports come
/// in through the constructor.
pub struct ValidationOrchestrator<K, R, E, C>
where
    K: EnrolledKeyProvider,
    R: RevocationLookup,
    E: EventSink,
    C: ConnectivityProbe,
{
    keys: K,
    revocations: R,
    events: E,
    connectivity: C,
    config: EngineConfig,
    state: ScanState,
    /// Last accepted raw scan and when, for the duplicate debounce.
    cooldown: Option<(String, Timestamp)>,
}

impl<K, R, E, C> ValidationOrchestrator<K, R, E, C>
where
    K: EnrolledKeyProvider,
    R: RevocationLookup,
    E: EventSink,
    C: ConnectivityProbe,
{
    pub fn new(keys: K, revocations: R, events: E, connectivity: C, config: EngineConfig) -> Self {
        Self {
            keys,
            revocations,
            events,
            connectivity,
            config,
            state: ScanState::Idle,
            cooldown: None,
        }
    }

    /// Engine configuration, for display surfaces.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the full decision pipeline on a decoded-or-not credential.
    fn validate(&mut self, raw: &str, now: Timestamp) -> Result<ScanDisposition, EngineError> {
        // Not enrolled is fatal, not an INVALID outcome: the problem is the
        // device, not the visitor's credential.
        let key = self
            .keys
            .enrolled_key()?
            .ok_or(EngineError::NotEnrolled)?;

        let credential = match gk_credential::decode(raw) {
            Ok(credential) => credential,
            Err(err) => {
                tracing::warn!(error = %err, "Scan did not decode to a credential");
                return self.decide(ValidationOutcome::FormatError, None, now);
            }
        };
        let payload = credential.payload.clone();

        if !gk_credential::verify_credential(&credential, &key) {
            tracing::warn!(
                authorization_id = %payload.authorization_id,
                "Signature verification failed"
            );
            return self.decide(ValidationOutcome::Invalid, Some(payload), now);
        }

        if !gk_credential::is_within_window(
            payload.valid_from,
            payload.valid_to,
            now,
            key.max_clock_skew_minutes,
        ) {
            return self.decide(ValidationOutcome::Expired, Some(payload), now);
        }

        if self.config.require_revocation_snapshot && !self.revocations.has_snapshot() {
            tracing::warn!(
                authorization_id = %payload.authorization_id,
                "No revocation snapshot yet; refusing under strict policy"
            );
            return self.decide(ValidationOutcome::Invalid, Some(payload), now);
        }

        if self.revocations.is_revoked(&payload.authorization_id) {
            return self.decide(ValidationOutcome::Revoked, Some(payload), now);
        }

        if payload.has_vehicle() {
            let disposition = ScanDisposition::AwaitingVehicleConfirmation {
                vehicle_plate: payload.vehicle_plate.clone().unwrap_or_default(),
                vehicle_type: payload.vehicle_type.clone(),
                vehicle_color: payload.vehicle_color.clone(),
            };
            self.state = ScanState::AwaitingVehicleConfirmation(PendingVehicle {
                payload,
                scanned_at: now,
                offline_validated: !self.connectivity.is_online(),
            });
            return Ok(disposition);
        }

        self.decide(ValidationOutcome::Valid, Some(payload), now)
    }

    /// Finalize a decision: record its event, then expose the outcome.
    ///
    /// The state moves to `Decided` only after the event is durably
    /// committed; a storage failure aborts back to idle with a blocking
    /// error so the operator knows recording is broken.
    fn decide(
        &mut self,
        outcome: ValidationOutcome,
        payload: Option<CredentialPayload>,
        scanned_at: Timestamp,
    ) -> Result<ScanDisposition, EngineError> {
        let offline = !self.connectivity.is_online();
        let event = build_event(outcome, payload.as_ref(), None, scanned_at, offline, &self.config);

        self.commit_event(&event)?;
        self.state = ScanState::Decided(outcome);
        Ok(ScanDisposition::Decided(outcome))
    }

    /// Enqueue with one local retry before declaring storage broken.
    fn commit_event(&self, event: &AccessEvent) -> Result<EventId, EngineError> {
        match self.events.enqueue(event) {
            Ok(id) => Ok(id),
            Err(first) => {
                tracing::warn!(error = %first, "Event write failed, retrying once");
                self.events.enqueue(event).map_err(|err| {
                    tracing::error!(error = %err, "Event write failed persistently");
                    EngineError::Storage(err)
                })
            }
        }
    }
}

impl<K, R, E, C> ValidationApi for ValidationOrchestrator<K, R, E, C>
where
    K: EnrolledKeyProvider,
    R: RevocationLookup,
    E: EventSink,
    C: ConnectivityProbe,
{
    fn scan(&mut self, raw: &str, now: Timestamp) -> Result<ScanDisposition, EngineError> {
        if matches!(self.state, ScanState::AwaitingVehicleConfirmation(_)) {
            tracing::debug!("Scan ignored: vehicle confirmation pending");
            return Ok(ScanDisposition::IgnoredBusy);
        }

        if let Some((last_raw, last_at)) = &self.cooldown {
            if last_raw == raw && now.saturating_sub(*last_at) < self.config.cooldown_secs {
                tracing::debug!("Duplicate scan suppressed by cooldown");
                return Ok(ScanDisposition::IgnoredDuplicate);
            }
        }
        // A scan from `Decided` implicitly dismisses the shown outcome; the
        // runtime may also dismiss explicitly via `reset`.
        let disposition = self.validate(raw, now)?;
        // Latch the cooldown only for completed scans. A fatal error (not
        // enrolled, broken storage) must stay retryable with the same code.
        self.cooldown = Some((raw.to_string(), now));
        Ok(disposition)
    }

    fn confirm_vehicle(&mut self, matched: bool) -> Result<ScanDisposition, EngineError> {
        match std::mem::replace(&mut self.state, ScanState::Idle) {
            ScanState::AwaitingVehicleConfirmation(pending) => {
                let outcome = if matched {
                    ValidationOutcome::Valid
                } else {
                    ValidationOutcome::Invalid
                };
                let event = build_event(
                    outcome,
                    Some(&pending.payload),
                    Some(matched),
                    pending.scanned_at,
                    pending.offline_validated,
                    &self.config,
                );

                match self.commit_event(&event) {
                    Ok(_) => {
                        self.state = ScanState::Decided(outcome);
                        Ok(ScanDisposition::Decided(outcome))
                    }
                    Err(err) => {
                        // Keep the confirmation pending so it can be retried
                        // once storage recovers.
                        self.state = ScanState::AwaitingVehicleConfirmation(pending);
                        Err(err)
                    }
                }
            }
            other => {
                self.state = other;
                Err(EngineError::NoPendingConfirmation)
            }
        }
    }

    fn reset(&mut self) {
        if matches!(self.state, ScanState::AwaitingVehicleConfirmation(_)) {
            tracing::debug!("Pending vehicle confirmation abandoned; nothing recorded");
        }
        self.state = ScanState::Idle;
    }

    fn state(&self) -> &ScanState {
        &self.state
    }
}

/// Assemble the access event for a decision.
fn build_event(
    outcome: ValidationOutcome,
    payload: Option<&CredentialPayload>,
    vehicle_match: Option<bool>,
    scanned_at: Timestamp,
    offline_validated: bool,
    config: &EngineConfig,
) -> AccessEvent {
    AccessEvent {
        event_id: EventId::generate(),
        authorization_id: payload.map(|p| p.authorization_id.clone()),
        action: config.action,
        scan_result: outcome,
        person_name: payload.map(|p| p.person_name.clone()),
        person_document: payload.map(|p| p.person_document.clone()),
        vehicle_plate: payload.and_then(|p| p.vehicle_plate.clone()),
        vehicle_match,
        offline_validated,
        scanned_at,
        sync_status: shared_types::SyncStatus::Pending,
        sync_attempts: 0,
    }
}

// =============================================================================
// TESTS
// =============================================================================
