//! Port definitions for the validation engine.

pub mod inbound;
pub mod outbound;
