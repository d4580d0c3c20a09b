//! Schema bootstrap for the gate state database.
//!
//! # Responsibility
//! - Bring a connection to the current schema on first open.
//! - Refuse databases written by a newer binary.
//!
//! # Invariants
//! - The applied schema version is mirrored to `PRAGMA user_version`.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

const INTRO_STATE_SCHEMA: &str = include_str!("0001_intro_state.sql");
const SCHEMA_VERSION: u32 = 1;

/// Returns the schema version written by this binary.
pub fn latest_version() -> u32 {
    SCHEMA_VERSION
}

/// Creates the `intro_state` table on a fresh database; a no-op on a
/// current one.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;

    if current > SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: SCHEMA_VERSION,
        });
    }
    if current == SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    tx.execute_batch(INTRO_STATE_SCHEMA)?;
    tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    tx.commit()?;

    Ok(())
}
