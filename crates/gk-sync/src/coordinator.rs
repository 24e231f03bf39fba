//! # Sync Coordinator
//!
//! Background task that drains the event queue to the ingestion backend.
//!
//! ## Triggers
//!
//! - Fixed interval (first tick immediately on startup, draining backlog).
//! - Connectivity-restored notification from the runtime.
//! - Explicit `flush` calls (runtime shutdown does one final drain).
//!
//! A flush already in progress is never started twice; overlapping triggers
//! collapse into the running one.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use gk_store::{EventStore, KeyValueStore};
use shared_types::StorageError;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;

use crate::config::SyncConfig;
use crate::ports::outbound::IngestionGateway;

/// Result of one flush attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// Nothing was pending.
    Idle,
    /// Another flush was already running; this trigger collapsed into it.
    Skipped,
    /// A batch was submitted and per-event acknowledgments were recorded.
    Completed { synced: usize, failed: usize },
    /// The transport failed; every event stays eligible for the next flush.
    TransportDown,
}

/// Drains unsynced access events to the backend.
///
/// Owns the background task; the scan pipeline never calls into this type.
pub struct SyncCoordinator<S: KeyValueStore + 'static> {
    worker: FlushWorker<S>,
    config: SyncConfig,
    connectivity: Arc<Notify>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    handle: parking_lot::Mutex<Option<JoinHandle<()>>>,
}

impl<S: KeyValueStore + 'static> SyncCoordinator<S> {
    pub fn new(
        events: Arc<EventStore<S>>,
        gateway: Arc<dyn IngestionGateway>,
        config: SyncConfig,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            worker: FlushWorker {
                events,
                gateway,
                in_flight: Arc::new(AtomicBool::new(false)),
            },
            config,
            connectivity: Arc::new(Notify::new()),
            shutdown_tx,
            shutdown_rx,
            handle: parking_lot::Mutex::new(None),
        }
    }

    /// Spawn the background flush loop.
    pub fn initialize(&self) {
        let worker = self.worker.clone();
        let connectivity = Arc::clone(&self.connectivity);
        let mut shutdown = self.shutdown_rx.clone();
        let interval_secs = self.config.flush_interval_secs;

        let task = tokio::spawn(async move {
            tracing::info!(interval_secs, "Sync coordinator started");
            let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = interval.tick() => {}
                    _ = connectivity.notified() => {
                        tracing::info!("Connectivity restored, flushing early");
                    }
                    _ = shutdown.changed() => {
                        if *shutdown.borrow() {
                            break;
                        }
                    }
                }

                if let Err(err) = worker.flush().await {
                    tracing::error!(error = %err, "Flush failed against local storage");
                }
            }

            // One final drain so a clean shutdown leaves as little pending
            // as the backend allows.
            if let Err(err) = worker.flush().await {
                tracing::error!(error = %err, "Final flush failed against local storage");
            }
            tracing::info!("Sync coordinator stopped");
        });

        *self.handle.lock() = Some(task);
    }

    /// Signal that connectivity came back; the loop flushes promptly instead
    /// of waiting out the interval.
    pub fn notify_connectivity_restored(&self) {
        self.connectivity.notify_one();
    }

    /// Run one flush now.
    ///
    /// # Errors
    /// * `StorageError` - the local queue could not be read or updated
    pub async fn flush(&self) -> Result<FlushOutcome, StorageError> {
        self.worker.flush().await
    }

    /// Stop the background task, letting it run its final drain.
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
        let task = self.handle.lock().take();
        if let Some(task) = task {
            if let Err(err) = task.await {
                tracing::error!(error = %err, "Sync coordinator task panicked");
            }
        }
    }
}

/// The flushing half, cloneable into the background task.
struct FlushWorker<S: KeyValueStore + 'static> {
    events: Arc<EventStore<S>>,
    gateway: Arc<dyn IngestionGateway>,
    in_flight: Arc<AtomicBool>,
}

impl<S: KeyValueStore + 'static> Clone for FlushWorker<S> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
            gateway: Arc::clone(&self.gateway),
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

impl<S: KeyValueStore + 'static> FlushWorker<S> {
    async fn flush(&self) -> Result<FlushOutcome, StorageError> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            tracing::debug!("Flush already in progress, skipping trigger");
            return Ok(FlushOutcome::Skipped);
        }
        let outcome = self.flush_inner().await;
        self.in_flight.store(false, Ordering::SeqCst);
        outcome
    }

    async fn flush_inner(&self) -> Result<FlushOutcome, StorageError> {
        let batch = self.events.dequeue_all()?;
        if batch.is_empty() {
            return Ok(FlushOutcome::Idle);
        }

        tracing::info!(count = batch.len(), "Submitting event batch");
        let ack = match self.gateway.submit_batch(&batch).await {
            Ok(ack) => ack,
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    count = batch.len(),
                    "Batch submission failed, events stay pending"
                );
                for event in &batch {
                    self.events.mark_failed(event.event_id)?;
                }
                return Ok(FlushOutcome::TransportDown);
            }
        };

        let accepted: HashSet<_> = ack.accepted.into_iter().collect();
        let mut synced = 0;
        let mut failed = 0;
        for event in &batch {
            if accepted.contains(&event.event_id) {
                self.events.mark_synced(event.event_id)?;
                synced += 1;
            } else {
                self.events.mark_failed(event.event_id)?;
                failed += 1;
            }
        }

        tracing::info!(synced, failed, "Flush completed");
        Ok(FlushOutcome::Completed { synced, failed })
    }
}

// =============================================================================
// TESTS
// =============================================================================
