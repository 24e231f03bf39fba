//! # Validation Engine Subsystem
//!
//! Composes codec, signature verification, window check, and revocation
//! lookup into the scan-to-decision pipeline, and owns the debounce and
//! vehicle-confirmation policy around it.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): state machine types and engine errors
//! - **Ports Layer** (`ports/`): inbound API plus the outbound dependencies
//!   (enrollment key, revocation lookup, event sink, connectivity probe)
//!   injected at construction
//! - **Service Layer** (`service.rs`): the `ValidationOrchestrator`
//!
//! ## Decision Pipeline
//!
//! ```text
//! scan(raw) ──decode──► verify signature ──► check window ──► check revocation
//!     │failure:            │failure:            │out of         │revoked:
//!     ▼                    ▼                    ▼window:        ▼
//!  FORMAT_ERROR         INVALID              EXPIRED         REVOKED
//!                                                               │ok
//!                              no vehicle ◄────────────────────┤
//!                                 │                             │vehicle plate
//!                                 ▼                             ▼
//!                               VALID              AwaitingVehicleConfirmation
//! ```
//!
//! Every terminal decision enqueues exactly one access event; a pending
//! vehicle confirmation defers the event until staff confirm the plate.
//! Decisions never touch the network.

pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use config::EngineConfig;
pub use domain::errors::EngineError;
pub use domain::state::{ScanDisposition, ScanState};
pub use ports::inbound::ValidationApi;
pub use ports::outbound::{ConnectivityProbe, EnrolledKeyProvider, EventSink, RevocationLookup};
pub use service::ValidationOrchestrator;
