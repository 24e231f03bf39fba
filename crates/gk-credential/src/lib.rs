//! # Credential Subsystem
//!
//! Decoding and cryptographic verification of scanned QR credentials.
//!
//! ## Architecture
//!
//! Everything in this crate is pure domain logic: no I/O, no clocks, no
//! logging. The orchestrator in `gk-engine` composes these functions into
//! the scan pipeline and supplies the enrollment key and current time.
//!
//! - `domain::codec`: wire-format decoding (base64url segments + JSON)
//! - `domain::ed25519`: detached-signature verification
//! - `domain::window`: validity-window arithmetic with clock-skew tolerance
//!
//! ## Security Notes
//!
//! - **Untrusted Input**: every malformed scan maps to a `FormatError`
//!   value; no input can panic the codec.
//! - **Strict Verification**: uses `verify_strict`, which rejects the
//!   malleable/small-order signatures plain `verify` tolerates.

pub mod domain;

// Re-export public API
pub use domain::codec::{decode, encode_segments, SEGMENT_SEPARATOR};
pub use domain::ed25519::{verify, verify_credential};
pub use domain::errors::FormatError;
pub use domain::window::is_within_window;
