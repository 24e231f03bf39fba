//! # Outbound Port (Driven Port)
//!
//! The backend transport the coordinator drains events through. The runtime
//! provides the real implementation; tests provide mocks.

use async_trait::async_trait;
use shared_types::{AccessEvent, EventId};
use thiserror::Error;

/// Transport-level failure talking to the ingestion backend.
///
/// Never surfaced to the operator: every transport failure resolves to
/// "events stay pending, retry later".
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The backend could not be reached at all.
    #[error("Backend unreachable: {message}")]
    Unreachable { message: String },

    /// The backend answered but refused the batch as a whole.
    #[error("Backend rejected the batch: {message}")]
    Rejected { message: String },
}

/// Per-event acknowledgment for one submitted batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchAck {
    /// Events the backend durably accepted (or already had, by `event_id`).
    pub accepted: Vec<EventId>,
    /// Events the backend examined and refused.
    pub rejected: Vec<EventId>,
}

/// Backend ingestion endpoint for recorded access events.
///
/// The contract is idempotent: the backend deduplicates by `event_id`, so
/// submitting the same batch twice (after a lost acknowledgment) must
/// acknowledge, not duplicate, the repeated events.
#[async_trait]
pub trait IngestionGateway: Send + Sync {
    /// Submit one batch of events and await per-event acknowledgment.
    ///
    /// # Errors
    /// * `TransportError` - the batch as a whole did not get through
    async fn submit_batch(&self, events: &[AccessEvent]) -> Result<BatchAck, TransportError>;
}
