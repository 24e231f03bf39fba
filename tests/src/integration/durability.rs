//! # Durability Integration
//!
//! On-disk scenarios: process restarts, lost acknowledgments, and the
//! data-directory lock. Everything here runs against the file-backed store
//! in a temporary directory.

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use gk_engine::{EngineConfig, ScanDisposition, ValidationApi};
    use gk_store::{DataDirLock, FileBackedKVStore, LockError};
    use gk_sync::{FlushOutcome, SyncConfig, SyncCoordinator};
    use shared_types::{RevocationEntry, SyncStatus, ValidationOutcome};

    use crate::integration::fixtures::{
        engine, ConnectivityFlag, DedupGateway, Issuer, StoreBundle, NOW,
    };

    fn file_bundle(dir: &Path) -> StoreBundle<FileBackedKVStore> {
        StoreBundle::open(
            FileBackedKVStore::open(&dir.join("events.db")).unwrap(),
            FileBackedKVStore::open(&dir.join("revocations.db")).unwrap(),
            FileBackedKVStore::open(&dir.join("enrollment.db")).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_events_survive_restart_then_sync() {
        let dir = tempfile::tempdir().unwrap();
        let issuer = Issuer::new();

        // First run: three decisions, then the process dies before any sync.
        {
            let stores = file_bundle(dir.path());
            stores.enrollment.provision(&issuer.key_material).unwrap();
            let mut terminal =
                engine(&stores, ConnectivityFlag::offline(), EngineConfig::for_testing());

            for (i, auth) in ["auth-1", "auth-2", "auth-3"].iter().enumerate() {
                terminal.scan(&issuer.issue(auth), NOW + i as u64).unwrap();
                terminal.reset();
            }
            assert_eq!(stores.events.pending_count().unwrap(), 3);
        }

        // Second run: the backlog is visible and drains in scan order.
        let stores = file_bundle(dir.path());
        let pending = stores.events.dequeue_all().unwrap();
        assert_eq!(pending.len(), 3);
        assert!(pending.iter().all(|e| e.sync_status == SyncStatus::Pending));
        assert_eq!(
            pending.iter().map(|e| e.scanned_at).collect::<Vec<_>>(),
            vec![NOW, NOW + 1, NOW + 2]
        );

        let gateway = Arc::new(DedupGateway::default());
        let coordinator = SyncCoordinator::new(
            Arc::clone(&stores.events),
            gateway.clone(),
            SyncConfig::for_testing(),
        );
        assert_eq!(
            coordinator.flush().await.unwrap(),
            FlushOutcome::Completed { synced: 3, failed: 0 }
        );
        assert_eq!(gateway.ingested_count(), 3);
    }

    #[tokio::test]
    async fn test_lost_acknowledgment_resend_is_idempotent_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let issuer = Issuer::new();
        let stores = file_bundle(dir.path());
        stores.enrollment.provision(&issuer.key_material).unwrap();
        let mut terminal = engine(&stores, ConnectivityFlag::online(), EngineConfig::for_testing());

        terminal.scan(&issuer.issue("auth-1"), NOW).unwrap();
        terminal.reset();
        terminal.scan(&issuer.issue("auth-2"), NOW + 1).unwrap();

        let gateway = Arc::new(DedupGateway::default());
        let coordinator = SyncCoordinator::new(
            Arc::clone(&stores.events),
            gateway.clone(),
            SyncConfig::for_testing(),
        );

        // The batch lands backend-side but the acknowledgment is lost.
        gateway.lose_next_ack();
        assert_eq!(
            coordinator.flush().await.unwrap(),
            FlushOutcome::TransportDown
        );
        assert_eq!(gateway.ingested_count(), 2);

        let pending = stores.events.dequeue_all().unwrap();
        assert_eq!(pending.len(), 2);
        assert!(pending.iter().all(|e| e.sync_status == SyncStatus::Failed));
        assert!(pending.iter().all(|e| e.sync_attempts == 1));

        // The resend carries the same event_ids; the backend's dedup means
        // no duplicate records even though the batch went over twice.
        assert_eq!(
            coordinator.flush().await.unwrap(),
            FlushOutcome::Completed { synced: 2, failed: 0 }
        );
        assert_eq!(gateway.ingested_count(), 2);
        assert_eq!(*gateway.batches.lock(), vec![2, 2]);
    }

    #[tokio::test]
    async fn test_enrollment_and_revocations_survive_restart() {
        let dir = tempfile::tempdir().unwrap();
        let issuer = Issuer::new();

        {
            let stores = file_bundle(dir.path());
            stores.enrollment.provision(&issuer.key_material).unwrap();
            stores
                .revocations
                .refresh(
                    vec![RevocationEntry {
                        authorization_id: "auth-5".to_string(),
                        revoked_at: NOW - 100,
                    }],
                    NOW - 100,
                )
                .unwrap();
        }

        let stores = file_bundle(dir.path());
        assert!(stores.revocations.has_snapshot());
        let mut terminal = engine(&stores, ConnectivityFlag::online(), EngineConfig::for_testing());

        assert_eq!(
            terminal.scan(&issuer.issue("auth-5"), NOW).unwrap(),
            ScanDisposition::Decided(ValidationOutcome::Revoked)
        );
        terminal.reset();
        assert_eq!(
            terminal.scan(&issuer.issue("auth-6"), NOW + 1).unwrap(),
            ScanDisposition::Decided(ValidationOutcome::Valid)
        );
    }

    #[test]
    fn test_second_terminal_process_is_locked_out() {
        let dir = tempfile::tempdir().unwrap();

        let held = DataDirLock::acquire(dir.path()).unwrap();
        let err = DataDirLock::acquire(dir.path()).unwrap_err();
        assert!(matches!(err, LockError::AlreadyLocked { .. }));

        drop(held);
        assert!(DataDirLock::acquire(dir.path()).is_ok());
    }
}
