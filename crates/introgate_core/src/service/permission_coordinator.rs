//! Permission-gating state machine.
//!
//! # Responsibility
//! - Decide, for each user/system event, which render signals the host
//!   shows: granted UI, denied UI, system dialog, settings redirect.
//! - Keep the durable navigation gate in sync with every transition.
//!
//! # Invariants
//! - A granted observation always wins and resets the denial count,
//!   regardless of whether it came from a re-probe or a dialog result.
//! - The denial count increments only on an explicit system-dialog denial,
//!   never from a cold-start probe.
//! - Public event methods never return `Err`; a failed persist degrades the
//!   session to ephemeral state and is reported inside the outcome.

use crate::model::gate::{PermissionState, PersistedGateState, UiSignal};
use crate::probe::PermissionProbe;
use crate::repo::state_store::{PermissionStateStore, StoreError};
use log::{info, warn};

/// Denial count at which the gate stops re-prompting and routes the user to
/// system settings in the same outcome.
pub const REPEATED_DENIAL_THRESHOLD: u32 = 2;

/// Durability of the state written during one event.
#[derive(Debug)]
pub enum Persistence {
    /// The transition was persisted.
    Durable,
    /// The event did not need a durable write.
    Unchanged,
    /// Persisting failed; the in-memory state still reflects the transition
    /// for this session and the next resume recomputes from the probe.
    Ephemeral(StoreError),
}

impl Persistence {
    /// Whether the durable store matches the in-memory state after the event.
    pub fn is_durable(&self) -> bool {
        !matches!(self, Self::Ephemeral(_))
    }
}

/// Result of one coordinator event: the derived state, the gate position,
/// and the render signals the host plays back in order.
#[derive(Debug)]
pub struct GateOutcome {
    pub state: PermissionState,
    pub navigation_allowed: bool,
    pub signals: Vec<UiSignal>,
    pub persistence: Persistence,
}

/// The permission-gating state machine.
///
/// One coordinator is created each time the gating screen becomes visible.
/// `denial_count` and `has_requested_before` are session-scoped; the
/// navigation gate and completion flag live in the injected store. All
/// methods run on one logical control thread (see the hosting event
/// dispatch); the coordinator performs no blocking I/O beyond the
/// synchronous store.
pub struct PermissionCoordinator<P: PermissionProbe, S: PermissionStateStore> {
    probe: P,
    store: S,
    persisted: PersistedGateState,
    denial_count: u32,
    has_requested_before: bool,
}

impl<P: PermissionProbe, S: PermissionStateStore> PermissionCoordinator<P, S> {
    /// Creates a fresh session over the injected collaborators.
    ///
    /// The persisted gate is loaded once up front; a load failure logs and
    /// starts the session from defaults, since the probe is the source of
    /// truth on the next resume anyway.
    pub fn new(probe: P, store: S) -> Self {
        let persisted = match store.load() {
            Ok(state) => state,
            Err(err) => {
                warn!("event=gate_load module=coordinator status=degraded error={err}");
                PersistedGateState::default()
            }
        };

        Self {
            probe,
            store,
            persisted,
            denial_count: 0,
            has_requested_before: false,
        }
    }

    /// Shared read access to the probe, for hosts that push readings in.
    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Explicit denials observed in this session.
    pub fn denial_count(&self) -> u32 {
        self.denial_count
    }

    /// The gating screen became visible (including after returning from
    /// system settings). Re-probes and re-derives the gate.
    pub fn on_resumed(&mut self) -> GateOutcome {
        let state = self.probe.current_state();
        let outcome = match state {
            PermissionState::Granted => self.granted(),
            _ => self.denied(state, self.denial_count > 0, false),
        };
        self.log_transition("resumed", &outcome);
        outcome
    }

    /// The user tapped the primary action button.
    ///
    /// Re-probes first so a stale tap after an out-of-band grant never shows
    /// a prompt. Once a denial has been observed, or the platform signals
    /// the user permanently declined, the tap routes straight to settings
    /// because a repeat system prompt would silently no-op.
    pub fn on_action_requested(&mut self) -> GateOutcome {
        let state = self.probe.current_state();
        let outcome = if state == PermissionState::Granted {
            self.granted()
        } else if self.denial_count == 0 && !self.has_requested_before {
            self.has_requested_before = true;
            self.prompt(state, UiSignal::ShowSystemDialog)
        } else if state != PermissionState::Denied || self.denial_count >= 1 {
            // `Denied` is the only derived state with rationale still
            // available; `Unknown` fails toward settings, not a dead prompt.
            self.prompt(state, UiSignal::ShowSettingsRedirect)
        } else {
            self.prompt(state, UiSignal::ShowSystemDialog)
        };
        self.log_transition("action_requested", &outcome);
        outcome
    }

    /// The OS permission prompt reported its outcome.
    ///
    /// On the denial that lands exactly on [`REPEATED_DENIAL_THRESHOLD`],
    /// the outcome additionally carries `ShowSettingsRedirect` so the host
    /// opens settings immediately instead of waiting for another dead-end
    /// tap.
    pub fn on_system_dialog_result(&mut self, granted: bool) -> GateOutcome {
        let outcome = if granted {
            self.granted()
        } else {
            self.denial_count += 1;
            let repeated = self.denial_count > 1;
            let state = if repeated {
                PermissionState::DeniedPermanently
            } else {
                PermissionState::Denied
            };
            let redirect = self.denial_count == REPEATED_DENIAL_THRESHOLD;
            self.denied(state, repeated, redirect)
        };
        self.log_transition("dialog_result", &outcome);
        outcome
    }

    /// The single granted path: grant wins, whatever produced it.
    fn granted(&mut self) -> GateOutcome {
        self.denial_count = 0;
        let persistence = self.persist_navigation(true);
        GateOutcome {
            state: PermissionState::Granted,
            navigation_allowed: true,
            signals: vec![UiSignal::ShowGrantedUi, UiSignal::NavigationAllowed(true)],
            persistence,
        }
    }

    fn denied(&mut self, state: PermissionState, repeated: bool, redirect: bool) -> GateOutcome {
        let persistence = self.persist_navigation(false);
        let mut signals = vec![
            UiSignal::ShowDeniedUi { repeated },
            UiSignal::NavigationAllowed(false),
        ];
        if redirect {
            signals.push(UiSignal::ShowSettingsRedirect);
        }
        GateOutcome {
            state,
            navigation_allowed: false,
            signals,
            persistence,
        }
    }

    /// An outcome that launches a platform surface without moving the gate.
    fn prompt(&self, state: PermissionState, signal: UiSignal) -> GateOutcome {
        GateOutcome {
            state,
            navigation_allowed: self.persisted.navigation_allowed,
            signals: vec![signal],
            persistence: Persistence::Unchanged,
        }
    }

    /// Load-modify-write of the navigation gate, preserving the completion
    /// flag written by the onboarding controller.
    ///
    /// An unreadable store skips the write entirely: saving the cached
    /// completion flag could clobber a durably-recorded `true` with a stale
    /// `false`. The in-memory transition still applies for this session.
    fn persist_navigation(&mut self, allowed: bool) -> Persistence {
        self.persisted.navigation_allowed = allowed;

        match self.store.load() {
            Ok(state) => self.persisted.onboarding_completed = state.onboarding_completed,
            Err(err) => {
                warn!("event=gate_persist module=coordinator status=ephemeral error={err}");
                return Persistence::Ephemeral(err);
            }
        }

        match self.store.save(self.persisted) {
            Ok(()) => Persistence::Durable,
            Err(err) => {
                warn!("event=gate_persist module=coordinator status=ephemeral error={err}");
                Persistence::Ephemeral(err)
            }
        }
    }

    fn log_transition(&self, trigger: &str, outcome: &GateOutcome) {
        info!(
            "event=gate_transition module=coordinator status=ok trigger={trigger} state={} navigation_allowed={} denial_count={} durable={}",
            outcome.state.as_str(),
            outcome.navigation_allowed,
            self.denial_count,
            outcome.persistence.is_durable()
        );
    }
}
