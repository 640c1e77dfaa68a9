//! Table layout migrations for the key-value database.
//!
//! # Invariants
//! - Steps are listed in strictly increasing `version` order.
//! - The applied step is mirrored to `PRAGMA user_version` inside the same
//!   transaction as its DDL.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// One DDL step, identified by the `user_version` it brings the file to.
type Step = (u32, &'static str);

const STEPS: &[Step] = &[(1, include_str!("0001_kv_entries.sql"))];

/// Returns the table layout version this binary writes.
pub fn latest_version() -> u32 {
    STEPS.last().map_or(0, |(version, _)| *version)
}

/// Brings `conn` up to [`latest_version`].
///
/// # Errors
/// - `DbError::UnsupportedSchemaVersion` when the file was written by a newer
///   binary; nothing is modified in that case.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    let latest = latest_version();

    if found > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: found,
            latest_supported: latest,
        });
    }

    let pending = STEPS.iter().filter(|(version, _)| *version > found);
    let tx = conn.transaction()?;
    let mut applied = 0usize;
    for (version, sql) in pending {
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
        applied += 1;
    }
    tx.commit()?;

    if applied > 0 {
        info!("event=db_migrate module=db status=ok from={found} to={latest} steps={applied}");
    }
    Ok(())
}
