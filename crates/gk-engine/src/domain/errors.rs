//! # Engine Errors
//!
//! Only the conditions that stop the pipeline are errors here. Malformed
//! scans, bad signatures, expiry, and revocation are decisions, not errors;
//! they resolve to a `ValidationOutcome` and normal operation continues.

use shared_types::StorageError;
use thiserror::Error;

/// Fatal or out-of-protocol conditions in the validation pipeline.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The device holds no enrollment key material. Scans are refused
    /// outright; reporting INVALID would misattribute the problem to the
    /// visitor's credential.
    #[error("Device is not enrolled; no key material available")]
    NotEnrolled,

    /// The access event could not be committed to durable storage even
    /// after retrying. Surfaced as a blocking condition: dropping the
    /// event silently would break the durability contract.
    #[error("Failed to record access event: {0}")]
    Storage(#[from] StorageError),

    /// `confirm_vehicle` was called with no confirmation pending.
    #[error("No vehicle confirmation is pending")]
    NoPendingConfirmation,
}
