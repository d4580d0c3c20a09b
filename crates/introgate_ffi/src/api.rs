//! FFI use-case API for host-facing gating calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to the host UI via FRB.
//! - Map host lifecycle events onto one coordinator session per intro
//!   screen visibility.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - The host pushes its current platform facts with every dispatched
//!   event; the core never queries the platform itself.

use introgate_core::db::open_db;
use introgate_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, GateOutcome,
    ManualProbe, OnboardingController, PermissionCoordinator, SqliteStateStore,
};
use log::warn;
use std::sync::{Mutex, MutexGuard};

static INTRO_SESSION: Mutex<Option<IntroSession>> = Mutex::new(None);

struct IntroSession {
    coordinator: PermissionCoordinator<ManualProbe, SqliteStateStore>,
}

/// One coordinator event rendered for the host.
///
/// `state` and `signals` carry the stable string codes from the core model;
/// `error` is empty on success.
pub struct GateOutcomeDto {
    pub state: String,
    pub navigation_allowed: bool,
    pub signals: Vec<String>,
    pub persisted: bool,
    pub error: String,
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on
///   failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(&level, &log_dir) {
        Ok(()) => String::new(),
        Err(message) => message,
    }
}

/// Exposes the core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking, never throws.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Opens a fresh gating session; the host calls this when the intro screen
/// becomes visible.
///
/// # FFI contract
/// - Sync call; opens the durable store at `db_path` and migrates it.
/// - Replaces any previous session.
/// - Never panics; returns empty string on success and error message on
///   failure.
#[flutter_rust_bridge::frb(sync)]
pub fn intro_session_open(db_path: String) -> String {
    let conn = match open_db(&db_path) {
        Ok(conn) => conn,
        Err(err) => return err.to_string(),
    };
    let store = match SqliteStateStore::try_new(conn) {
        Ok(store) => store,
        Err(err) => return err.to_string(),
    };

    let coordinator = PermissionCoordinator::new(ManualProbe::enforced(false, true), store);
    *lock_session() = Some(IntroSession { coordinator });
    String::new()
}

/// Drops the active gating session; the host calls this when the intro
/// screen is destroyed.
///
/// # FFI contract
/// - Sync call, never throws; closing without an open session is a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn intro_session_close() {
    *lock_session() = None;
}

/// The gating screen resumed (including after returning from settings).
///
/// # FFI contract
/// - Sync call, never throws.
/// - `permission_enforced`, `is_granted`, `can_show_rationale` are the
///   host's current platform facts.
#[flutter_rust_bridge::frb(sync)]
pub fn intro_on_resumed(
    permission_enforced: bool,
    is_granted: bool,
    can_show_rationale: bool,
) -> GateOutcomeDto {
    with_session(|session| {
        session
            .coordinator
            .probe()
            .set_readings(permission_enforced, is_granted, can_show_rationale);
        session.coordinator.on_resumed()
    })
}

/// The user tapped the primary permission action button.
///
/// # FFI contract
/// - Sync call, never throws.
#[flutter_rust_bridge::frb(sync)]
pub fn intro_on_action_requested(
    permission_enforced: bool,
    is_granted: bool,
    can_show_rationale: bool,
) -> GateOutcomeDto {
    with_session(|session| {
        session
            .coordinator
            .probe()
            .set_readings(permission_enforced, is_granted, can_show_rationale);
        session.coordinator.on_action_requested()
    })
}

/// The OS permission prompt reported its outcome.
///
/// # FFI contract
/// - Sync call, never throws.
#[flutter_rust_bridge::frb(sync)]
pub fn intro_on_dialog_result(granted: bool) -> GateOutcomeDto {
    with_session(|session| session.coordinator.on_system_dialog_result(granted))
}

/// Whether the host should show the intro flow at all.
///
/// # FFI contract
/// - Sync call, never throws; an unreadable store answers `true` because
///   re-showing onboarding is the safe direction.
#[flutter_rust_bridge::frb(sync)]
pub fn should_show_onboarding(db_path: String) -> bool {
    match open_controller(&db_path) {
        Ok(controller) => controller.should_show_onboarding(),
        Err(message) => {
            warn!("event=onboarding_query module=ffi status=error error={message}");
            true
        }
    }
}

/// Whether the persisted gate currently allows leaving the intro step.
///
/// # FFI contract
/// - Sync call, never throws; an unreadable store answers `false` (gate
///   stays closed until the coordinator reopens it).
#[flutter_rust_bridge::frb(sync)]
pub fn navigation_allowed(db_path: String) -> bool {
    match open_controller(&db_path).and_then(|controller| {
        controller
            .navigation_allowed()
            .map_err(|err| err.to_string())
    }) {
        Ok(allowed) => allowed,
        Err(message) => {
            warn!("event=navigation_query module=ffi status=error error={message}");
            false
        }
    }
}

/// Records onboarding completion exactly once.
///
/// # FFI contract
/// - Sync call, never throws; calling twice is a no-op success.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn complete_onboarding(db_path: String) -> String {
    let result = open_controller(&db_path)
        .and_then(|controller| controller.complete_onboarding().map_err(|err| err.to_string()));
    match result {
        Ok(()) => String::new(),
        Err(message) => message,
    }
}

fn open_controller(db_path: &str) -> Result<OnboardingController<SqliteStateStore>, String> {
    let conn = open_db(db_path).map_err(|err| err.to_string())?;
    let store = SqliteStateStore::try_new(conn).map_err(|err| err.to_string())?;
    Ok(OnboardingController::new(store))
}

fn lock_session() -> MutexGuard<'static, Option<IntroSession>> {
    // A poisoned lock only means a previous host call panicked mid-event;
    // the session data is plain state, safe to keep serving.
    match INTRO_SESSION.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn with_session(event: impl FnOnce(&mut IntroSession) -> GateOutcome) -> GateOutcomeDto {
    let mut guard = lock_session();
    match guard.as_mut() {
        Some(session) => render_outcome(event(session)),
        None => {
            warn!("event=gate_dispatch module=ffi status=error error_code=no_session");
            GateOutcomeDto {
                state: "unknown".to_string(),
                navigation_allowed: false,
                signals: Vec::new(),
                persisted: false,
                error: "no active intro session; call intro_session_open first".to_string(),
            }
        }
    }
}

fn render_outcome(outcome: GateOutcome) -> GateOutcomeDto {
    GateOutcomeDto {
        state: outcome.state.as_str().to_string(),
        navigation_allowed: outcome.navigation_allowed,
        signals: outcome
            .signals
            .iter()
            .map(|signal| signal.code().to_string())
            .collect(),
        persisted: outcome.persistence.is_durable(),
        error: String::new(),
    }
}
