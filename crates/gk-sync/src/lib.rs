//! # Synchronization Subsystem
//!
//! Drains the durable access-event queue to the backend in the background.
//! The scan pipeline never waits on anything in this crate.
//!
//! ## Architecture
//!
//! - **Ports Layer** (`ports/`): the `IngestionGateway` outbound port the
//!   backend transport implements
//! - **Service Layer** (`coordinator.rs`): the `SyncCoordinator` background
//!   task, flush triggers, and shutdown
//!
//! ## Reconciliation Contract
//!
//! Every flush resubmits all unsynced events as one batch. The backend
//! deduplicates by `event_id`, so resending a batch whose acknowledgment was
//! lost is harmless. Locally, only a per-event acknowledgment moves an event
//! to SYNCED; any other fate leaves it eligible for the next flush.

pub mod config;
pub mod coordinator;
pub mod ports;

// Re-export public API
pub use config::SyncConfig;
pub use coordinator::{FlushOutcome, SyncCoordinator};
pub use ports::outbound::{BatchAck, IngestionGateway, TransportError};
