//! # Key Material Store
//!
//! Holds the enrollment public key. The enrollment flow writes it exactly
//! once; the validation engine only reads it. Absence means the device was
//! never enrolled, which the engine treats as a fatal not-enrolled
//! condition rather than a verification failure.

use parking_lot::RwLock;
use shared_types::{KeyMaterial, StorageError};

use crate::domain::errors::EnrollmentError;
use crate::domain::keys::KEY_MATERIAL;
use crate::ports::outbound::KeyValueStore;

/// Persistent enrollment key material.
pub struct KeyMaterialStore<S: KeyValueStore> {
    kv: RwLock<S>,
}

impl<S: KeyValueStore> KeyMaterialStore<S> {
    pub fn open(kv: S) -> Self {
        Self { kv: RwLock::new(kv) }
    }

    /// The enrolled key, or `None` if the device was never enrolled.
    pub fn load(&self) -> Result<Option<KeyMaterial>, StorageError> {
        match self.kv.read().get(KEY_MATERIAL)? {
            Some(bytes) => {
                let material =
                    bincode::deserialize(&bytes).map_err(|e| StorageError::CorruptRecord {
                        key: String::from_utf8_lossy(KEY_MATERIAL).into_owned(),
                        message: e.to_string(),
                    })?;
                Ok(Some(material))
            }
            None => Ok(None),
        }
    }

    /// Provision key material during enrollment. Fails if the device is
    /// already enrolled.
    pub fn provision(&self, material: &KeyMaterial) -> Result<(), EnrollmentError> {
        let mut kv = self.kv.write();

        if kv.exists(KEY_MATERIAL)? {
            let existing = self
                .decode_locked(&*kv)?
                .map(|m| m.key_id)
                .unwrap_or_default();
            return Err(EnrollmentError::AlreadyEnrolled { key_id: existing });
        }

        let bytes = bincode::serialize(material).map_err(|e| StorageError::Io {
            message: e.to_string(),
        })?;
        kv.put(KEY_MATERIAL, &bytes)?;

        tracing::info!(key_id = %material.key_id, org = %material.organization_id, "Device enrolled");
        Ok(())
    }

    fn decode_locked(&self, kv: &S) -> Result<Option<KeyMaterial>, StorageError> {
        match kv.get(KEY_MATERIAL)? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes).map_err(|e| {
                StorageError::CorruptRecord {
                    key: String::from_utf8_lossy(KEY_MATERIAL).into_owned(),
                    message: e.to_string(),
                }
            })?)),
            None => Ok(None),
        }
    }
}
