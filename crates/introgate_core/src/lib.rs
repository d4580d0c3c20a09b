//! Core permission-gating logic for the IntroGate onboarding flow.
//! This crate is the single source of truth for gating invariants.
//!
//! The host UI layer injects the platform collaborators (permission probe,
//! durable state store), dispatches its lifecycle events into the
//! coordinator, and renders whatever signals come back. The core never
//! holds a reference to its rendering host.

pub mod db;
pub mod logging;
pub mod model;
pub mod probe;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::gate::{PermissionState, PersistedGateState, UiSignal};
pub use probe::{ManualProbe, PermissionProbe, ProbeError};
pub use repo::state_store::{
    MemoryStateStore, PermissionStateStore, SqliteStateStore, StoreError, StoreResult,
};
pub use service::onboarding_controller::OnboardingController;
pub use service::permission_coordinator::{
    GateOutcome, Persistence, PermissionCoordinator, REPEATED_DENIAL_THRESHOLD,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
