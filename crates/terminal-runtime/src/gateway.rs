//! # Loopback Ingestion Gateway
//!
//! Stand-in backend used until the terminal is pointed at a real ingestion
//! endpoint. Accepts every event and deduplicates by `event_id`, matching
//! the contract the real backend honors. Lives behind the
//! `IngestionGateway` trait so swapping in an HTTP transport touches only
//! the wiring.

use std::collections::HashSet;

use async_trait::async_trait;
use gk_sync::{BatchAck, IngestionGateway, TransportError};
use parking_lot::Mutex;
use shared_types::{AccessEvent, EventId};

/// Accepts everything, remembers what it has seen.
#[derive(Default)]
pub struct LoopbackGateway {
    seen: Mutex<HashSet<EventId>>,
}

impl LoopbackGateway {
    /// Number of distinct events accepted so far.
    pub fn accepted_count(&self) -> usize {
        self.seen.lock().len()
    }
}

#[async_trait]
impl IngestionGateway for LoopbackGateway {
    async fn submit_batch(&self, events: &[AccessEvent]) -> Result<BatchAck, TransportError> {
        let mut seen = self.seen.lock();
        let mut duplicates = 0;
        for event in events {
            if !seen.insert(event.event_id) {
                duplicates += 1;
            }
        }
        tracing::info!(
            count = events.len(),
            duplicates,
            total = seen.len(),
            "Loopback gateway accepted batch"
        );

        Ok(BatchAck {
            accepted: events.iter().map(|e| e.event_id).collect(),
            rejected: Vec::new(),
        })
    }
}
