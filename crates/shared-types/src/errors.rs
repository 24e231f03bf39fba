//! # Shared Error Types
//!
//! Error types that cross subsystem boundaries. Errors private to one
//! subsystem live in that crate's domain layer.

use thiserror::Error;

/// Failure writing to or reading from durable local storage.
///
/// Storage failures on the enqueue path are the one local condition that must
/// surface to the operator: silently dropping an access event would violate
/// the durability contract.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    /// Underlying I/O failure (disk full, permission, device removed).
    #[error("Storage I/O failure: {message}")]
    Io { message: String },

    /// A persisted record could not be decoded.
    #[error("Corrupt record for key {key}: {message}")]
    CorruptRecord { key: String, message: String },

    /// The record addressed by an operation does not exist.
    #[error("No such record: {key}")]
    NotFound { key: String },
}
