//! Gate state and render-signal model.
//!
//! # Responsibility
//! - Define the derived permission state the coordinator reports.
//! - Define the outbound signals a host UI renders.
//! - Define the durable subset of coordinator state.
//!
//! # Invariants
//! - `PermissionState` is recomputed from probe answers; it has no storage.
//! - Signal string codes are stable once published to a host.

use serde::{Deserialize, Serialize};

/// Derived permission state for the gating permission.
///
/// `Unknown` means the probe could not answer; callers treat it as denied
/// and never as granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionState {
    /// The probe could not answer the grant query.
    Unknown,
    /// Granted, or not enforced on this platform at all.
    Granted,
    /// Denied, but a renewed system prompt would still reach the user.
    Denied,
    /// Denied and the platform would silently suppress a renewed prompt.
    DeniedPermanently,
}

impl PermissionState {
    /// Stable string id for host-facing transport.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Granted => "granted",
            Self::Denied => "denied",
            Self::DeniedPermanently => "denied_permanently",
        }
    }

    /// Returns whether this state allows onboarding navigation.
    pub fn allows_navigation(self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Outbound render signal emitted by the coordinator for the host UI.
///
/// The core never holds a reference to its rendering host; it only returns
/// these values and the host subscribes or polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiSignal {
    /// Render the granted/confirmed state of the gating screen.
    ShowGrantedUi,
    /// Render the denied state; `repeated` selects the stronger copy that
    /// points the user at system settings.
    ShowDeniedUi { repeated: bool },
    /// Launch the OS permission prompt.
    ShowSystemDialog,
    /// Navigate the user to the system notification settings surface.
    ShowSettingsRedirect,
    /// Enable or disable forward navigation out of the intro step.
    NavigationAllowed(bool),
}

impl UiSignal {
    /// Stable, payload-sensitive string code for host-facing transport.
    pub fn code(self) -> &'static str {
        match self {
            Self::ShowGrantedUi => "show_granted_ui",
            Self::ShowDeniedUi { repeated: false } => "show_denied_ui",
            Self::ShowDeniedUi { repeated: true } => "show_denied_ui_repeated",
            Self::ShowSystemDialog => "show_system_dialog",
            Self::ShowSettingsRedirect => "show_settings_redirect",
            Self::NavigationAllowed(true) => "navigation_allowed",
            Self::NavigationAllowed(false) => "navigation_blocked",
        }
    }
}

/// Durable subset of coordinator state, surviving process death.
///
/// Both flags default to `false` on a fresh install.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedGateState {
    /// Whether onboarding may proceed past the intro step.
    pub navigation_allowed: bool,
    /// Once `true`, the intro step is permanently skipped.
    pub onboarding_completed: bool,
}

#[cfg(test)]
mod tests {
    use super::{PermissionState, PersistedGateState, UiSignal};

    #[test]
    fn permission_state_serializes_with_stable_wire_names() {
        let granted = serde_json::to_string(&PermissionState::Granted).expect("serialize granted");
        assert_eq!(granted, "\"granted\"");

        let permanent = serde_json::to_string(&PermissionState::DeniedPermanently)
            .expect("serialize permanent denial");
        assert_eq!(permanent, "\"denied_permanently\"");
    }

    #[test]
    fn permission_state_string_ids_match_serde_names() {
        for state in [
            PermissionState::Unknown,
            PermissionState::Granted,
            PermissionState::Denied,
            PermissionState::DeniedPermanently,
        ] {
            let wire = serde_json::to_string(&state).expect("serialize state");
            assert_eq!(wire, format!("\"{}\"", state.as_str()));
        }
    }

    #[test]
    fn only_granted_allows_navigation() {
        assert!(PermissionState::Granted.allows_navigation());
        assert!(!PermissionState::Unknown.allows_navigation());
        assert!(!PermissionState::Denied.allows_navigation());
        assert!(!PermissionState::DeniedPermanently.allows_navigation());
    }

    #[test]
    fn signal_codes_distinguish_payload_variants() {
        assert_eq!(UiSignal::ShowDeniedUi { repeated: false }.code(), "show_denied_ui");
        assert_eq!(
            UiSignal::ShowDeniedUi { repeated: true }.code(),
            "show_denied_ui_repeated"
        );
        assert_eq!(UiSignal::NavigationAllowed(true).code(), "navigation_allowed");
        assert_eq!(UiSignal::NavigationAllowed(false).code(), "navigation_blocked");
    }

    #[test]
    fn persisted_state_defaults_to_fresh_install() {
        let state = PersistedGateState::default();
        assert!(!state.navigation_allowed);
        assert!(!state.onboarding_completed);
    }
}
