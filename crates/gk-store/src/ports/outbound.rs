//! # Outbound Ports (Driven Ports)
//!
//! The storage backend interface the store components are written against.
//! Swapping the adapter changes where bytes land (file, memory, platform
//! storage) without touching queue or cache semantics.

use shared_types::StorageError;

/// Abstract interface for durable key-value operations.
///
/// Production: `FileBackedKVStore` (adapters/file.rs)
/// Testing: `InMemoryKVStore` (adapters/memory.rs)
///
/// ## Durability
///
/// `put` must not return `Ok` until the write has reached stable storage.
/// The in-memory adapter trivially satisfies this for tests; the file
/// adapter fsyncs before returning.
pub trait KeyValueStore: Send + Sync {
    /// Get a value by key.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError>;

    /// Put a single key-value pair, durably.
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StorageError>;

    /// Delete a key. Deleting an absent key is not an error.
    fn delete(&mut self, key: &[u8]) -> Result<(), StorageError>;

    /// Check if a key exists.
    fn exists(&self, key: &[u8]) -> Result<bool, StorageError>;

    /// Iterate over all pairs whose key starts with `prefix`.
    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StorageError>;
}
