//! Domain model for the onboarding permission gate.
//!
//! # Responsibility
//! - Define the canonical gating states and outbound render signals.
//! - Keep one durable-state shape shared by coordinator and controller.
//!
//! # Invariants
//! - `PermissionState` is always derived from probe observations, never
//!   persisted directly.
//! - Durable state is limited to the two booleans in `PersistedGateState`.

pub mod gate;
