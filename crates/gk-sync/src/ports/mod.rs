//! Port definitions for the synchronization subsystem.

pub mod outbound;
