//! Storage adapters implementing the outbound ports.

pub mod file;
pub mod lock;
pub mod memory;
