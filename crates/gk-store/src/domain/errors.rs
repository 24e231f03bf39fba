//! Store-specific error types. I/O-level failures use the shared
//! `StorageError` so they cross crate boundaries unchanged.

use thiserror::Error;

/// Errors from enrollment key provisioning.
#[derive(Debug, Error)]
pub enum EnrollmentError {
    /// The device already holds key material; enrollment happens exactly
    /// once and re-provisioning must be an explicit administrative reset.
    #[error("Device is already enrolled (key id: {key_id})")]
    AlreadyEnrolled { key_id: String },

    /// Underlying storage failure.
    #[error(transparent)]
    Storage(#[from] shared_types::StorageError),
}
