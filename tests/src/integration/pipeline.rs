//! # Pipeline Integration
//!
//! Drives the real engine over real (in-memory) stores and the real sync
//! coordinator, end to end: scan → decision → durable event → backend
//! acknowledgment. Only the issuer and the backend are doubles.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use gk_engine::{
        EngineConfig, EngineError, ScanDisposition, ScanState, ValidationApi,
    };
    use gk_store::InMemoryKVStore;
    use gk_sync::{FlushOutcome, SyncConfig, SyncCoordinator};
    use shared_types::{RevocationEntry, SyncStatus, ValidationOutcome};

    use crate::integration::fixtures::{
        engine, ConnectivityFlag, DedupGateway, Issuer, StoreBundle, NOW,
    };

    fn memory_bundle() -> StoreBundle<InMemoryKVStore> {
        StoreBundle::open(
            InMemoryKVStore::new(),
            InMemoryKVStore::new(),
            InMemoryKVStore::new(),
        )
        .unwrap()
    }

    fn enrolled_bundle(issuer: &Issuer) -> StoreBundle<InMemoryKVStore> {
        let stores = memory_bundle();
        stores.enrollment.provision(&issuer.key_material).unwrap();
        stores
    }

    #[tokio::test]
    async fn test_scan_to_acknowledged_event() {
        let issuer = Issuer::new();
        let stores = enrolled_bundle(&issuer);
        let gateway = Arc::new(DedupGateway::default());
        let coordinator = SyncCoordinator::new(
            Arc::clone(&stores.events),
            gateway.clone(),
            SyncConfig::for_testing(),
        );
        let mut terminal = engine(&stores, ConnectivityFlag::online(), EngineConfig::for_testing());

        let disposition = terminal.scan(&issuer.issue("auth-1"), NOW).unwrap();
        assert_eq!(
            disposition,
            ScanDisposition::Decided(ValidationOutcome::Valid)
        );
        assert_eq!(stores.events.pending_count().unwrap(), 1);

        let outcome = coordinator.flush().await.unwrap();
        assert_eq!(outcome, FlushOutcome::Completed { synced: 1, failed: 0 });
        assert_eq!(stores.events.pending_count().unwrap(), 0);
        assert_eq!(gateway.ingested_count(), 1);
    }

    #[tokio::test]
    async fn test_revocation_refresh_changes_decisions_mid_stream() {
        let issuer = Issuer::new();
        let stores = enrolled_bundle(&issuer);
        let mut terminal = engine(&stores, ConnectivityFlag::online(), EngineConfig::for_testing());

        // Before any snapshot, the credential is admitted.
        assert_eq!(
            terminal.scan(&issuer.issue("auth-7"), NOW).unwrap(),
            ScanDisposition::Decided(ValidationOutcome::Valid)
        );
        terminal.reset();

        // A refresh lands (the sync side fetched a new list).
        stores
            .revocations
            .refresh(
                vec![RevocationEntry {
                    authorization_id: "auth-7".to_string(),
                    revoked_at: NOW,
                }],
                NOW,
            )
            .unwrap();

        // The very same authorization is now refused. A fresh issuance is
        // used so the scan is not absorbed as a duplicate.
        assert_eq!(
            terminal
                .scan(&issuer.issue_with("auth-7", None, NOW - 1_800, NOW + 1_800), NOW + 1)
                .unwrap(),
            ScanDisposition::Decided(ValidationOutcome::Revoked)
        );

        // Both decisions were recorded.
        let pending = stores.events.dequeue_all().unwrap();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].scan_result, ValidationOutcome::Valid);
        assert_eq!(pending[1].scan_result, ValidationOutcome::Revoked);
    }

    #[tokio::test]
    async fn test_vehicle_confirmation_defers_then_syncs() {
        let issuer = Issuer::new();
        let stores = enrolled_bundle(&issuer);
        let gateway = Arc::new(DedupGateway::default());
        let coordinator = SyncCoordinator::new(
            Arc::clone(&stores.events),
            gateway.clone(),
            SyncConfig::for_testing(),
        );
        let mut terminal = engine(&stores, ConnectivityFlag::online(), EngineConfig::for_testing());

        let disposition = terminal
            .scan(&issuer.issue_with_vehicle("auth-3", "XYZ9A88"), NOW)
            .unwrap();
        assert!(matches!(
            disposition,
            ScanDisposition::AwaitingVehicleConfirmation { .. }
        ));

        // Nothing recorded, so nothing to flush, while staff walk around
        // the vehicle.
        assert_eq!(coordinator.flush().await.unwrap(), FlushOutcome::Idle);

        terminal.confirm_vehicle(true).unwrap();
        assert_eq!(*terminal.state(), ScanState::Decided(ValidationOutcome::Valid));

        let pending = stores.events.dequeue_all().unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].vehicle_match, Some(true));
        assert_eq!(pending[0].vehicle_plate.as_deref(), Some("XYZ9A88"));
        assert_eq!(pending[0].scanned_at, NOW);

        assert_eq!(
            coordinator.flush().await.unwrap(),
            FlushOutcome::Completed { synced: 1, failed: 0 }
        );
    }

    #[tokio::test]
    async fn test_offline_decisions_sync_after_reconnect() {
        let issuer = Issuer::new();
        let stores = enrolled_bundle(&issuer);
        let gateway = Arc::new(DedupGateway::default());
        let coordinator = SyncCoordinator::new(
            Arc::clone(&stores.events),
            gateway.clone(),
            SyncConfig::for_testing(),
        );
        let connectivity = ConnectivityFlag::offline();
        let mut terminal = engine(&stores, connectivity.clone(), EngineConfig::for_testing());

        terminal.scan(&issuer.issue("auth-1"), NOW).unwrap();
        terminal.reset();
        terminal.scan(&issuer.issue("auth-2"), NOW + 1).unwrap();

        let pending = stores.events.dequeue_all().unwrap();
        assert_eq!(pending.len(), 2);
        assert!(pending.iter().all(|e| e.offline_validated));

        // The link is down; the flush fails and the events stay queued.
        gateway.go_down();
        assert_eq!(
            coordinator.flush().await.unwrap(),
            FlushOutcome::TransportDown
        );
        assert_eq!(stores.events.pending_count().unwrap(), 2);

        // Reconnect; the same events drain.
        connectivity.set(true);
        assert_eq!(
            coordinator.flush().await.unwrap(),
            FlushOutcome::Completed { synced: 2, failed: 0 }
        );
        assert_eq!(gateway.ingested_count(), 2);
    }

    #[tokio::test]
    async fn test_refused_scans_are_recorded_and_synced() {
        let issuer = Issuer::new();
        let stores = enrolled_bundle(&issuer);
        let gateway = Arc::new(DedupGateway::default());
        let coordinator = SyncCoordinator::new(
            Arc::clone(&stores.events),
            gateway.clone(),
            SyncConfig::for_testing(),
        );
        let mut terminal = engine(&stores, ConnectivityFlag::online(), EngineConfig::for_testing());

        // Expired: the window ended yesterday.
        let expired = issuer.issue_with("auth-8", None, NOW - 90_000, NOW - 86_400);
        assert_eq!(
            terminal.scan(&expired, NOW).unwrap(),
            ScanDisposition::Decided(ValidationOutcome::Expired)
        );
        terminal.reset();

        // Tampered: one flipped byte in the signature segment.
        let mut raw = issuer.issue("auth-9").into_bytes();
        let last = raw.len() - 1;
        raw[last] = if raw[last] == b'A' { b'B' } else { b'A' };
        assert_eq!(
            terminal
                .scan(&String::from_utf8(raw).unwrap(), NOW + 1)
                .unwrap(),
            ScanDisposition::Decided(ValidationOutcome::Invalid)
        );
        terminal.reset();

        // Garbage that never decodes.
        assert_eq!(
            terminal.scan("not a credential at all", NOW + 2).unwrap(),
            ScanDisposition::Decided(ValidationOutcome::FormatError)
        );

        let pending = stores.events.dequeue_all().unwrap();
        assert_eq!(pending.len(), 3);
        assert_eq!(pending[2].authorization_id, None);

        assert_eq!(
            coordinator.flush().await.unwrap(),
            FlushOutcome::Completed { synced: 3, failed: 0 }
        );
    }

    #[tokio::test]
    async fn test_unenrolled_terminal_refuses_without_recording() {
        let issuer = Issuer::new();
        let stores = memory_bundle();
        let mut terminal = engine(&stores, ConnectivityFlag::online(), EngineConfig::for_testing());

        assert!(matches!(
            terminal.scan(&issuer.issue("auth-1"), NOW),
            Err(EngineError::NotEnrolled)
        ));
        assert_eq!(stores.events.pending_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_synced_events_keep_final_status() {
        let issuer = Issuer::new();
        let stores = enrolled_bundle(&issuer);
        let gateway = Arc::new(DedupGateway::default());
        let coordinator = SyncCoordinator::new(
            Arc::clone(&stores.events),
            gateway,
            SyncConfig::for_testing(),
        );
        let mut terminal = engine(&stores, ConnectivityFlag::online(), EngineConfig::for_testing());

        terminal.scan(&issuer.issue("auth-1"), NOW).unwrap();
        let id = stores.events.dequeue_all().unwrap()[0].event_id;

        coordinator.flush().await.unwrap();

        let event = stores.events.get(id).unwrap().unwrap();
        assert_eq!(event.sync_status, SyncStatus::Synced);
        // A later flush has nothing left to send.
        assert_eq!(coordinator.flush().await.unwrap(), FlushOutcome::Idle);
    }
}
