//! Store-internal domain: key layout and error types.

pub mod errors;
pub mod keys;
