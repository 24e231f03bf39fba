//! # Shared Types Crate
//!
//! This crate contains all domain entities shared across the Gatekey
//! subsystems: credential payloads, validation outcomes, access events,
//! revocation entries, and enrollment key material.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Immutable Decisions**: A `ValidationOutcome` and the `AccessEvent`
//!   derived from it are never rewritten after creation; only the event's
//!   `sync_status` (and its retry counter) transition.
//! - **No I/O**: This crate is pure data. Persistence and transport live in
//!   `gk-store` and `gk-sync`.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
