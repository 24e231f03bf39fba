//! Pure credential-handling logic.

pub mod codec;
pub mod ed25519;
pub mod errors;
pub mod window;
