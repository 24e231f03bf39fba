//! # Credential Format Errors
//!
//! Every way a scanned string can fail to decode into a credential. All of
//! these are recoverable: the orchestrator maps them to a FORMAT_ERROR
//! outcome and the terminal keeps scanning.

use thiserror::Error;

/// A scanned string could not be decoded into a signed credential.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormatError {
    /// The scan produced an empty string.
    #[error("Empty scan input")]
    Empty,

    /// The payload/signature separator is missing.
    #[error("Missing segment separator")]
    MissingSeparator,

    /// More than two segments were present.
    #[error("Trailing data after signature segment")]
    TrailingSegment,

    /// A segment is not valid base64url.
    #[error("Segment '{segment}' is not valid base64url")]
    Base64 { segment: &'static str },

    /// The payload bytes are not a well-formed credential document
    /// (bad JSON, missing required field, or an unparsable timestamp).
    #[error("Malformed credential payload: {message}")]
    Payload { message: String },

    /// The signature segment decoded to the wrong number of bytes.
    #[error("Signature must be 64 bytes, got {got}")]
    SignatureLength { got: usize },
}
