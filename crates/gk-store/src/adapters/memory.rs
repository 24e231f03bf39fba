//! In-memory key-value store for unit tests.

use std::collections::HashMap;

use shared_types::StorageError;

use crate::ports::outbound::KeyValueStore;

/// In-memory key-value store.
///
/// Used by unit tests and by integration scenarios that simulate crashes by
/// cloning the underlying map into a fresh store.
#[derive(Debug, Default, Clone)]
pub struct InMemoryKVStore {
    data: HashMap<Vec<u8>, Vec<u8>>,
}

impl InMemoryKVStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the raw contents, for crash-simulation tests.
    pub fn contents(&self) -> HashMap<Vec<u8>, Vec<u8>> {
        self.data.clone()
    }

    /// Build a store preloaded with raw contents.
    pub fn from_contents(data: HashMap<Vec<u8>, Vec<u8>>) -> Self {
        Self { data }
    }
}

impl KeyValueStore for InMemoryKVStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.data.get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        self.data.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StorageError> {
        self.data.remove(key);
        Ok(())
    }

    fn exists(&self, key: &[u8]) -> Result<bool, StorageError> {
        Ok(self.data.contains_key(key))
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StorageError> {
        Ok(self
            .data
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}
