//! SQLite bootstrap for the local key-value table.
//!
//! # Responsibility
//! - Open and configure SQLite connections for tasklist core.
//! - Create the `kv_entries` table before any read or write happens.
//!
//! # Invariants
//! - Table layout version is tracked via `PRAGMA user_version`.
//! - Core code must not touch `kv_entries` before migrations succeed.
//! - The task blob itself is opaque to SQLite and carries no version.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or migrating the key-value database.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was migrated by a newer build than this one.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "kv_entries layout version {db_version} was written by a newer build; \
                 this build supports up to {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

#[cfg(test)]
mod tests {
    use super::DbError;

    #[test]
    fn newer_layout_message_names_table_and_versions() {
        let message = DbError::UnsupportedSchemaVersion {
            db_version: 7,
            latest_supported: 1,
        }
        .to_string();
        assert!(message.contains("kv_entries"));
        assert!(message.contains('7'));
        assert!(message.ends_with("up to 1"));
    }
}
