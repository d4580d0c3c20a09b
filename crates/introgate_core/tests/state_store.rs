use introgate_core::db::migrations::latest_version;
use introgate_core::db::{open_db, open_db_in_memory};
use introgate_core::{PermissionStateStore, PersistedGateState, SqliteStateStore, StoreError};
use rusqlite::Connection;

#[test]
fn fresh_store_loads_defaults() {
    let store = SqliteStateStore::try_new(open_db_in_memory().unwrap()).unwrap();
    assert_eq!(store.load().unwrap(), PersistedGateState::default());
}

#[test]
fn save_then_load_roundtrip() {
    let store = SqliteStateStore::try_new(open_db_in_memory().unwrap()).unwrap();

    let state = PersistedGateState {
        navigation_allowed: true,
        onboarding_completed: false,
    };
    store.save(state).unwrap();
    assert_eq!(store.load().unwrap(), state);
}

#[test]
fn save_overwrites_the_single_row() {
    let store = SqliteStateStore::try_new(open_db_in_memory().unwrap()).unwrap();

    store
        .save(PersistedGateState {
            navigation_allowed: true,
            onboarding_completed: false,
        })
        .unwrap();
    store
        .save(PersistedGateState {
            navigation_allowed: false,
            onboarding_completed: true,
        })
        .unwrap();

    let loaded = store.load().unwrap();
    assert!(!loaded.navigation_allowed);
    assert!(loaded.onboarding_completed);
}

#[test]
fn state_survives_reopening_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("introgate.db");

    {
        let store = SqliteStateStore::try_new(open_db(&path).unwrap()).unwrap();
        store
            .save(PersistedGateState {
                navigation_allowed: true,
                onboarding_completed: true,
            })
            .unwrap();
    }

    let store = SqliteStateStore::try_new(open_db(&path).unwrap()).unwrap();
    let loaded = store.load().unwrap();
    assert!(loaded.navigation_allowed);
    assert!(loaded.onboarding_completed);
}

#[test]
fn store_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteStateStore::try_new(conn) {
        Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn store_rejects_connection_without_intro_state_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteStateStore::try_new(conn),
        Err(StoreError::MissingRequiredTable("intro_state"))
    ));
}

#[test]
fn store_rejects_invalid_persisted_boolean() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO intro_state (id, navigation_allowed, onboarding_completed)
         VALUES (0, 2, 0);",
        [],
    )
    .unwrap();

    let store = SqliteStateStore::try_new(conn).unwrap();
    let err = store.load().unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
    assert!(err.to_string().contains("navigation_allowed"));
}
