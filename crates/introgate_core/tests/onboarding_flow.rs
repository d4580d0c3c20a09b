use introgate_core::db::open_db;
use introgate_core::{
    ManualProbe, MemoryStateStore, OnboardingController, PermissionCoordinator,
    PermissionStateStore, PersistedGateState, SqliteStateStore, StoreError, StoreResult,
};

#[test]
fn fresh_install_shows_onboarding() {
    let controller = OnboardingController::new(MemoryStateStore::new());
    assert!(controller.should_show_onboarding());
}

#[test]
fn completion_is_persisted_and_idempotent() {
    let store = MemoryStateStore::new();
    let controller = OnboardingController::new(&store);

    controller.complete_onboarding().unwrap();
    assert!(!controller.should_show_onboarding());
    assert!(store.load().unwrap().onboarding_completed);

    // Second call must be a no-op success.
    controller.complete_onboarding().unwrap();
    assert!(store.load().unwrap().onboarding_completed);
}

#[test]
fn completion_preserves_the_navigation_gate() {
    let store = MemoryStateStore::new();
    store
        .save(PersistedGateState {
            navigation_allowed: true,
            onboarding_completed: false,
        })
        .unwrap();

    let controller = OnboardingController::new(&store);
    controller.complete_onboarding().unwrap();

    let persisted = store.load().unwrap();
    assert!(persisted.navigation_allowed);
    assert!(persisted.onboarding_completed);
}

#[test]
fn coordinator_transitions_preserve_a_recorded_completion() {
    let store = MemoryStateStore::new();
    let controller = OnboardingController::new(&store);
    controller.complete_onboarding().unwrap();

    let mut gate = PermissionCoordinator::new(ManualProbe::enforced(true, true), &store);
    gate.on_resumed();

    let persisted = store.load().unwrap();
    assert!(persisted.navigation_allowed);
    assert!(persisted.onboarding_completed);
}

#[test]
fn navigation_allowed_reads_the_persisted_gate() {
    let store = MemoryStateStore::new();
    let controller = OnboardingController::new(&store);
    assert!(!controller.navigation_allowed().unwrap());

    store
        .save(PersistedGateState {
            navigation_allowed: true,
            onboarding_completed: false,
        })
        .unwrap();
    assert!(controller.navigation_allowed().unwrap());
}

struct FailingStore;

impl PermissionStateStore for FailingStore {
    fn load(&self) -> StoreResult<PersistedGateState> {
        Err(StoreError::InvalidData("store offline".to_string()))
    }

    fn save(&self, _state: PersistedGateState) -> StoreResult<()> {
        Err(StoreError::InvalidData("store offline".to_string()))
    }
}

#[test]
fn unreadable_store_re_shows_onboarding() {
    let controller = OnboardingController::new(FailingStore);
    assert!(controller.should_show_onboarding());
}

#[test]
fn unwritable_store_surfaces_the_error_on_completion() {
    let controller = OnboardingController::new(FailingStore);
    assert!(controller.complete_onboarding().is_err());
}

#[test]
fn completion_survives_process_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("introgate.db");

    {
        let store = SqliteStateStore::try_new(open_db(&path).unwrap()).unwrap();
        let controller = OnboardingController::new(store);
        assert!(controller.should_show_onboarding());
        controller.complete_onboarding().unwrap();
    }

    let store = SqliteStateStore::try_new(open_db(&path).unwrap()).unwrap();
    let controller = OnboardingController::new(store);
    assert!(!controller.should_show_onboarding());
}
