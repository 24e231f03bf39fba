//! Port definitions for the store subsystem.

pub mod outbound;
