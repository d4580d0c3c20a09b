//! Permission probe contract.
//!
//! # Responsibility
//! - Define the pure platform query the coordinator re-evaluates on every
//!   event: is the gating permission granted, and would a renewed request
//!   still reach the user?
//! - Derive one `PermissionState` from the raw platform answers.
//!
//! # Invariants
//! - Probing has no side effects.
//! - A probe failure never derives `Granted` (fail safe, never silently
//!   grant).

use crate::model::gate::PermissionState;
use std::cell::Cell;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Probe query errors. Not expected in practice; collaborator contracts
/// guarantee availability, but the coordinator still fails safe on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    Unavailable,
}

impl Display for ProbeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "permission probe could not answer the platform query"),
        }
    }
}

impl Error for ProbeError {}

/// Platform query for the current grant status of the gating permission.
///
/// Implemented by the host against the real platform; the core ships
/// [`ManualProbe`] for hosts that push readings in and for tests.
pub trait PermissionProbe {
    /// Whether this platform version enforces the permission at all.
    ///
    /// Policy constant per platform/version; when `false` the gate is a
    /// no-op and every derived state is `Granted`.
    fn permission_enforced(&self) -> bool;

    /// Whether the gating permission is currently granted.
    fn is_granted(&self) -> Result<bool, ProbeError>;

    /// Whether a renewed system prompt would still show an educational
    /// rationale. `false` means the user permanently declined and a repeat
    /// prompt would silently no-op.
    fn can_show_rationale(&self) -> Result<bool, ProbeError>;

    /// Derives the current permission state from the raw answers.
    ///
    /// - Not enforced -> `Granted` unconditionally.
    /// - Grant query failed -> `Unknown` (treated as denied downstream).
    /// - Rationale query failed -> `DeniedPermanently`, so callers route to
    ///   settings instead of risking a suppressed prompt.
    fn current_state(&self) -> PermissionState {
        if !self.permission_enforced() {
            return PermissionState::Granted;
        }

        match self.is_granted() {
            Ok(true) => PermissionState::Granted,
            Ok(false) => match self.can_show_rationale() {
                Ok(true) => PermissionState::Denied,
                Ok(false) | Err(_) => PermissionState::DeniedPermanently,
            },
            Err(_) => PermissionState::Unknown,
        }
    }
}

impl<P: PermissionProbe + ?Sized> PermissionProbe for &P {
    fn permission_enforced(&self) -> bool {
        (**self).permission_enforced()
    }

    fn is_granted(&self) -> Result<bool, ProbeError> {
        (**self).is_granted()
    }

    fn can_show_rationale(&self) -> Result<bool, ProbeError> {
        (**self).can_show_rationale()
    }
}

/// Probe fed with readings by the caller instead of querying a platform.
///
/// The host boundary pushes fresh platform facts before dispatching each
/// coordinator event; tests script platform behavior the same way.
#[derive(Debug)]
pub struct ManualProbe {
    enforced: Cell<bool>,
    granted: Cell<bool>,
    rationale: Cell<bool>,
}

impl ManualProbe {
    /// Creates a probe for an enforcing platform with the given readings.
    pub fn enforced(granted: bool, rationale: bool) -> Self {
        Self {
            enforced: Cell::new(true),
            granted: Cell::new(granted),
            rationale: Cell::new(rationale),
        }
    }

    /// Creates a probe for a platform that does not enforce the permission.
    pub fn not_enforced() -> Self {
        Self {
            enforced: Cell::new(false),
            granted: Cell::new(true),
            rationale: Cell::new(true),
        }
    }

    /// Replaces all readings at once with the host's current platform facts.
    pub fn set_readings(&self, enforced: bool, granted: bool, rationale: bool) {
        self.enforced.set(enforced);
        self.granted.set(granted);
        self.rationale.set(rationale);
    }

    pub fn set_granted(&self, granted: bool) {
        self.granted.set(granted);
    }

    pub fn set_rationale(&self, rationale: bool) {
        self.rationale.set(rationale);
    }
}

impl PermissionProbe for ManualProbe {
    fn permission_enforced(&self) -> bool {
        self.enforced.get()
    }

    fn is_granted(&self) -> Result<bool, ProbeError> {
        Ok(self.granted.get())
    }

    fn can_show_rationale(&self) -> Result<bool, ProbeError> {
        Ok(self.rationale.get())
    }
}

#[cfg(test)]
mod tests {
    use super::{ManualProbe, PermissionProbe, ProbeError};
    use crate::model::gate::PermissionState;

    struct UnavailableProbe {
        fail_grant: bool,
    }

    impl PermissionProbe for UnavailableProbe {
        fn permission_enforced(&self) -> bool {
            true
        }

        fn is_granted(&self) -> Result<bool, ProbeError> {
            if self.fail_grant {
                Err(ProbeError::Unavailable)
            } else {
                Ok(false)
            }
        }

        fn can_show_rationale(&self) -> Result<bool, ProbeError> {
            Err(ProbeError::Unavailable)
        }
    }

    #[test]
    fn non_enforced_platform_always_derives_granted() {
        let probe = ManualProbe::not_enforced();
        assert_eq!(probe.current_state(), PermissionState::Granted);

        // Readings are ignored while the permission is not enforced.
        probe.set_granted(false);
        probe.set_rationale(false);
        assert_eq!(probe.current_state(), PermissionState::Granted);
    }

    #[test]
    fn enforced_platform_derives_from_grant_and_rationale() {
        let probe = ManualProbe::enforced(true, true);
        assert_eq!(probe.current_state(), PermissionState::Granted);

        probe.set_granted(false);
        assert_eq!(probe.current_state(), PermissionState::Denied);

        probe.set_rationale(false);
        assert_eq!(probe.current_state(), PermissionState::DeniedPermanently);
    }

    #[test]
    fn failed_grant_query_derives_unknown_not_granted() {
        let probe = UnavailableProbe { fail_grant: true };
        assert_eq!(probe.current_state(), PermissionState::Unknown);
    }

    #[test]
    fn failed_rationale_query_derives_permanent_denial() {
        let probe = UnavailableProbe { fail_grant: false };
        assert_eq!(probe.current_state(), PermissionState::DeniedPermanently);
    }
}
