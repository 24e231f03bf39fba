//! # Gatekey Terminal Runtime
//!
//! Entry point for the handheld gate terminal. Wires the subsystems together
//! and runs them:
//!
//! ```text
//! stdin scans ──► ValidationOrchestrator ──► EventStore ──► SyncCoordinator
//!                      │                        │                 │
//!                 gk-credential            events.db       LoopbackGateway
//!                 RevocationCache
//!                 KeyMaterialStore
//! ```
//!
//! ## Startup Sequence
//!
//! 1. Initialize tracing
//! 2. Load configuration (file named by `GATEKEY_CONFIG`, else defaults)
//! 3. Acquire the exclusive data-directory lock
//! 4. Open the file-backed stores (events, revocations, enrollment)
//! 5. Provision enrollment from `GATEKEY_ENROLLMENT` on first run
//! 6. Start the sync coordinator
//! 7. Serve scans from stdin until Ctrl+C, then drain and exit
//!
//! Scan capture hardware feeds decoded QR strings in as lines; `/yes` and
//! `/no` resolve a pending vehicle confirmation, `/reset` dismisses the
//! displayed decision, `/status` prints queue depth.

mod adapters;
mod config;
mod gateway;

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use gk_engine::{ScanDisposition, ValidationApi, ValidationOrchestrator};
use gk_store::{
    DataDirLock, EventStore, FileBackedKVStore, KeyMaterialStore, RevocationCache,
};
use gk_sync::SyncCoordinator;
use shared_types::{KeyMaterial, Timestamp};

use crate::adapters::{
    DurableEventSink, SharedConnectivity, SnapshotRevocationLookup, StoredKeyProvider,
};
use crate::config::TerminalConfig;
use crate::gateway::LoopbackGateway;

/// Environment variable naming a JSON file with `KeyMaterial` to provision
/// on first run.
const ENROLLMENT_ENV: &str = "GATEKEY_ENROLLMENT";

type Engine = ValidationOrchestrator<
    StoredKeyProvider<FileBackedKVStore>,
    SnapshotRevocationLookup<FileBackedKVStore>,
    DurableEventSink<FileBackedKVStore>,
    SharedConnectivity,
>;

fn now() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Provision enrollment key material from the environment on first run.
fn provision_if_needed(
    enrollment: &KeyMaterialStore<FileBackedKVStore>,
) -> anyhow::Result<()> {
    if enrollment.load()?.is_some() {
        return Ok(());
    }
    match std::env::var(ENROLLMENT_ENV) {
        Ok(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read enrollment file {path}"))?;
            let material: KeyMaterial = serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse enrollment file {path}"))?;
            enrollment.provision(&material)?;
            Ok(())
        }
        Err(_) => {
            warn!("Device is not enrolled and {ENROLLMENT_ENV} is not set; scans will be refused");
            Ok(())
        }
    }
}

/// Serve scans from stdin until the stream closes or Ctrl+C arrives.
async fn run_scan_loop(
    engine: &mut Engine,
    events: &EventStore<FileBackedKVStore>,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl+C received");
                return Ok(());
            }
        };
        let Some(line) = line else {
            info!("Input closed");
            return Ok(());
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let result = match line {
            "/quit" => return Ok(()),
            "/reset" => {
                engine.reset();
                continue;
            }
            "/status" => {
                info!(
                    state = ?engine.state(),
                    pending_events = events.pending_count()?,
                    "Terminal status"
                );
                continue;
            }
            "/yes" => engine.confirm_vehicle(true),
            "/no" => engine.confirm_vehicle(false),
            raw => engine.scan(raw, now()),
        };

        match result {
            Ok(ScanDisposition::Decided(outcome)) => {
                info!(?outcome, "Decision");
            }
            Ok(ScanDisposition::AwaitingVehicleConfirmation {
                vehicle_plate,
                vehicle_type,
                vehicle_color,
            }) => {
                info!(
                    plate = %vehicle_plate,
                    kind = vehicle_type.as_deref().unwrap_or("unknown"),
                    color = vehicle_color.as_deref().unwrap_or("unknown"),
                    "Check the vehicle, then /yes or /no"
                );
            }
            Ok(ScanDisposition::IgnoredDuplicate) | Ok(ScanDisposition::IgnoredBusy) => {}
            Err(err) => {
                error!(error = %err, "Scan could not be processed");
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = TerminalConfig::load()?;
    info!("==========================================");
    info!("  Gatekey Terminal Runtime v0.1.0");
    info!("  Data Dir: {:?}", config.data_dir);
    info!("  Action:   {:?}", config.engine.action);
    info!("==========================================");

    let _lock = DataDirLock::acquire(&config.data_dir)
        .context("Another terminal process may be using this data directory")?;

    let events = Arc::new(EventStore::open(FileBackedKVStore::open(
        &config.data_dir.join("events.db"),
    )?));
    let revocations = Arc::new(RevocationCache::open(FileBackedKVStore::open(
        &config.data_dir.join("revocations.db"),
    )?)?);
    let enrollment = Arc::new(KeyMaterialStore::open(FileBackedKVStore::open(
        &config.data_dir.join("enrollment.db"),
    )?));
    provision_if_needed(&enrollment)?;

    let connectivity = SharedConnectivity::new(true);
    let coordinator = SyncCoordinator::new(
        Arc::clone(&events),
        Arc::new(LoopbackGateway::default()),
        config.sync.clone(),
    );
    coordinator.initialize();

    let mut engine: Engine = ValidationOrchestrator::new(
        StoredKeyProvider::new(Arc::clone(&enrollment)),
        SnapshotRevocationLookup::new(Arc::clone(&revocations)),
        DurableEventSink::new(Arc::clone(&events)),
        connectivity.clone(),
        config.engine.clone(),
    );

    info!(
        pending_events = events.pending_count()?,
        revocations = revocations.len(),
        "Terminal ready; scan a credential or /status, /reset, /quit"
    );

    run_scan_loop(&mut engine, &events).await?;

    info!("Shutting down, draining pending events");
    coordinator.shutdown().await;
    Ok(())
}
