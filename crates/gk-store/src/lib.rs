//! # Local Store Subsystem
//!
//! Durable, offline-capable local state for the terminal:
//!
//! - **EventStore**: append-friendly queue of access events awaiting
//!   transmission, surviving process restarts and device reboots.
//! - **RevocationCache**: locally persisted mirror of the server-side
//!   revocation list, answering membership queries with no network.
//! - **KeyMaterialStore**: the enrollment public key, written once and
//!   read-only afterwards.
//!
//! ## Architecture
//!
//! Persistence goes through the `KeyValueStore` outbound port. Production
//! uses `FileBackedKVStore` (one file per concern, atomic temp-and-rename
//! writes, fsync before success); tests use `InMemoryKVStore`. A
//! `DataDirLock` guards the data directory against a second terminal
//! process.
//!
//! ## Durability Contract
//!
//! `EventStore::enqueue` does not return `Ok` until the record is committed
//! to stable storage. A crash immediately after a successful enqueue leaves
//! the event visible, still PENDING, on the next start.

pub mod adapters;
pub mod domain;
pub mod event_store;
pub mod key_material;
pub mod ports;
pub mod revocation;

// Re-export public API
pub use adapters::file::FileBackedKVStore;
pub use adapters::lock::{DataDirLock, LockError};
pub use adapters::memory::InMemoryKVStore;
pub use domain::errors::EnrollmentError;
pub use event_store::EventStore;
pub use key_material::KeyMaterialStore;
pub use ports::outbound::KeyValueStore;
pub use revocation::RevocationCache;
