//! Gate state store contract plus SQLite and in-memory implementations.
//!
//! # Responsibility
//! - Persist the two durable gate booleans across process restarts.
//! - Reject invalid persisted state instead of masking it.
//!
//! # Invariants
//! - The store is single-writer in practice (UI thread only); `save` is
//!   synchronous and visible to the next `load`.
//! - A failed persist is surfaced as `StoreError`, never swallowed.

use crate::db::DbError;
use crate::model::gate::PersistedGateState;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::Cell;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence errors for the durable gate state.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} is not migrated to {expected_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table is missing: {table}")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted gate state: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Store contract for the durable gate state.
///
/// Implementations must guarantee write-then-visible-to-next-read; no
/// locking is mandated beyond that because inputs are serialized by the
/// hosting event dispatch.
pub trait PermissionStateStore {
    /// Loads the persisted state, defaulting both flags to `false` when
    /// nothing has been written yet.
    fn load(&self) -> StoreResult<PersistedGateState>;

    /// Replaces the persisted state.
    fn save(&self, state: PersistedGateState) -> StoreResult<()>;
}

impl<S: PermissionStateStore + ?Sized> PermissionStateStore for &S {
    fn load(&self) -> StoreResult<PersistedGateState> {
        (**self).load()
    }

    fn save(&self, state: PersistedGateState) -> StoreResult<()> {
        (**self).save(state)
    }
}

/// SQLite-backed store over the single-row `intro_state` table.
pub struct SqliteStateStore {
    conn: Connection,
}

impl SqliteStateStore {
    /// Wraps a migrated connection, validating the schema first.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were never applied or the
    ///   connection is behind the latest schema version.
    /// - `MissingRequiredTable` when `intro_state` is absent.
    pub fn try_new(conn: Connection) -> StoreResult<Self> {
        let expected_version = crate::db::migrations::latest_version();
        let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if actual_version != expected_version {
            return Err(StoreError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let table_exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'intro_state'
            );",
            [],
            |row| row.get(0),
        )?;
        if table_exists == 0 {
            return Err(StoreError::MissingRequiredTable("intro_state"));
        }

        Ok(Self { conn })
    }
}

impl PermissionStateStore for SqliteStateStore {
    fn load(&self) -> StoreResult<PersistedGateState> {
        let row = self
            .conn
            .query_row(
                "SELECT navigation_allowed, onboarding_completed FROM intro_state WHERE id = 0;",
                [],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
            )
            .optional()?;

        match row {
            None => Ok(PersistedGateState::default()),
            Some((navigation, completed)) => Ok(PersistedGateState {
                navigation_allowed: int_to_bool(navigation, "intro_state.navigation_allowed")?,
                onboarding_completed: int_to_bool(completed, "intro_state.onboarding_completed")?,
            }),
        }
    }

    fn save(&self, state: PersistedGateState) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO intro_state (id, navigation_allowed, onboarding_completed)
             VALUES (0, ?1, ?2)
             ON CONFLICT(id) DO UPDATE SET
                navigation_allowed = excluded.navigation_allowed,
                onboarding_completed = excluded.onboarding_completed,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![
                bool_to_int(state.navigation_allowed),
                bool_to_int(state.onboarding_completed),
            ],
        )?;

        Ok(())
    }
}

/// In-memory store for hosts without durable storage and for tests.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    state: Cell<PersistedGateState>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PermissionStateStore for MemoryStateStore {
    fn load(&self) -> StoreResult<PersistedGateState> {
        Ok(self.state.get())
    }

    fn save(&self, state: PersistedGateState) -> StoreResult<()> {
        self.state.set(state);
        Ok(())
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn int_to_bool(value: i64, column: &str) -> StoreResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(StoreError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}
