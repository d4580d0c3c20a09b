//! Host-facing FFI surface for the IntroGate core.

pub mod api;
