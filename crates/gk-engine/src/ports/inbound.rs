//! # Inbound Port (Driving Port / API)
//!
//! The surface the scan-capture layer drives. The capture layer owns the
//! camera and the clock; this subsystem owns every decision.

use shared_types::Timestamp;

use crate::domain::errors::EngineError;
use crate::domain::state::{ScanDisposition, ScanState};

/// Validation engine API.
pub trait ValidationApi {
    /// Process one raw scanned string at instant `now`.
    ///
    /// # Errors
    /// * `EngineError::NotEnrolled` - no key material; scanning refused
    /// * `EngineError::Storage` - the decision's event could not be recorded
    fn scan(&mut self, raw: &str, now: Timestamp) -> Result<ScanDisposition, EngineError>;

    /// Resolve a pending vehicle confirmation with the staff's visual
    /// verdict. A mismatch turns the decision INVALID. The deferred event
    /// keeps the original scan instant.
    fn confirm_vehicle(&mut self, matched: bool) -> Result<ScanDisposition, EngineError>;

    /// Dismiss a displayed decision (or abandon a pending confirmation,
    /// recording nothing) and return to idle.
    fn reset(&mut self);

    /// Current state, for display.
    fn state(&self) -> &ScanState;
}
