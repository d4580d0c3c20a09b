//! Onboarding completion controller.
//!
//! # Responsibility
//! - Gate whether the intro flow is shown at all.
//! - Record completion exactly once when the host's "done" action fires.
//!
//! # Invariants
//! - Once `onboarding_completed` persists as `true`, the intro step is
//!   permanently skipped; the coordinator is never instantiated again for
//!   that install.
//! - `complete_onboarding` is idempotent.

use crate::model::gate::PersistedGateState;
use crate::repo::state_store::{PermissionStateStore, StoreError, StoreResult};
use log::{info, warn};

/// Consumes the persisted navigation gate to control the intro flow.
pub struct OnboardingController<S: PermissionStateStore> {
    store: S,
}

impl<S: PermissionStateStore> OnboardingController<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Whether the host should show the intro flow on launch.
    ///
    /// A load failure answers `true`: re-showing onboarding is the safe
    /// direction when the stored flag cannot be read.
    pub fn should_show_onboarding(&self) -> bool {
        match self.store.load() {
            Ok(state) => !state.onboarding_completed,
            Err(err) => {
                warn!("event=onboarding_load module=controller status=degraded error={err}");
                true
            }
        }
    }

    /// Whether the persisted gate currently allows leaving the intro step.
    ///
    /// Hosts read this after a restart to decide whether the "done" action
    /// starts active; the coordinator keeps it current while the gating
    /// screen is visible.
    pub fn navigation_allowed(&self) -> StoreResult<bool> {
        Ok(self.store.load()?.navigation_allowed)
    }

    /// Persists `onboarding_completed = true`, preserving the navigation
    /// gate. Calling it again is a no-op.
    ///
    /// The host calls this when `navigation_allowed` is `true` and the user
    /// triggers the "done" action.
    pub fn complete_onboarding(&self) -> Result<(), StoreError> {
        let current = self.store.load()?;
        if current.onboarding_completed {
            return Ok(());
        }

        self.store.save(PersistedGateState {
            onboarding_completed: true,
            ..current
        })?;
        info!("event=onboarding_complete module=controller status=ok");
        Ok(())
    }
}
