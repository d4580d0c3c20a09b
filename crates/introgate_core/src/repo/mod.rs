//! Durable-state layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the store contract the coordinator and controller write through.
//! - Isolate SQLite details from the gating state machine.
//!
//! # Invariants
//! - A write completed by `save` is visible to the next `load`.
//! - Store failures surface as semantic errors; callers decide whether to
//!   degrade to ephemeral state, never the store itself.

pub mod state_store;
