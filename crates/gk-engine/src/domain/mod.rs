//! Engine domain: state machine types and errors.

pub mod errors;
pub mod state;
