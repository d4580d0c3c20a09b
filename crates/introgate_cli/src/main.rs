//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `introgate_core` linkage.
//! - Replay one deterministic gating session for quick local sanity checks.

use introgate_core::{GateOutcome, ManualProbe, MemoryStateStore, PermissionCoordinator};

fn main() {
    println!("introgate_core version={}", introgate_core::core_version());

    // Scripted session: enforced platform, prompt denied once, the next tap
    // redirects to settings, the user grants there and returns.
    let store = MemoryStateStore::new();
    let mut gate = PermissionCoordinator::new(ManualProbe::enforced(false, true), &store);

    print_outcome("resumed", &gate.on_resumed());
    print_outcome("tap", &gate.on_action_requested());
    print_outcome("dialog_denied", &gate.on_system_dialog_result(false));
    print_outcome("tap", &gate.on_action_requested());

    gate.probe().set_granted(true);
    print_outcome("resumed_after_settings", &gate.on_resumed());
}

fn print_outcome(trigger: &str, outcome: &GateOutcome) {
    let signals: Vec<&str> = outcome.signals.iter().map(|signal| signal.code()).collect();
    println!(
        "{trigger}: state={} navigation_allowed={} signals={}",
        outcome.state.as_str(),
        outcome.navigation_allowed,
        signals.join(",")
    );
}
