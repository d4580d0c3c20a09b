//! Gating use-case services.
//!
//! # Responsibility
//! - Orchestrate probe and store into the permission-gating state machine.
//! - Keep host/FFI layers decoupled from storage and platform details.

pub mod onboarding_controller;
pub mod permission_coordinator;
