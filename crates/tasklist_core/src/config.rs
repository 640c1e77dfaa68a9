//! Runtime configuration resolved from the environment.
//!
//! # Invariants
//! - Blank variables count as unset.
//! - Resolution never fails; invalid values surface later, where they are
//!   used (`open_db`, `init_logging`).

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "TASKLIST_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "TASKLIST_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "TASKLIST_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "tasklist.sqlite3";

/// Settings needed to build the composition root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// SQLite file holding the key-value table.
    pub db_path: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling logs; logging stays off when `None`.
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Reads `TASKLIST_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: read(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(default_db_path),
            log_level: read(LOG_LEVEL_ENV).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: read(LOG_DIR_ENV).map(PathBuf::from),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Default database location inside the OS temp directory.
pub fn default_db_path() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::{default_db_path, AppConfig, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use crate::logging::default_log_level;
    use std::collections::HashMap;
    use std::path::PathBuf;

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = AppConfig::default();
        assert_eq!(config.db_path, default_db_path());
        assert_eq!(config.log_level, default_log_level());
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn variables_override_defaults_and_blank_is_unset() {
        let vars = HashMap::from([
            (DB_PATH_ENV, " /data/tasks.db ".to_string()),
            (LOG_LEVEL_ENV, "warn".to_string()),
            (LOG_DIR_ENV, "   ".to_string()),
        ]);
        let config = AppConfig::from_lookup(|name| vars.get(name).cloned());
        assert_eq!(config.db_path, PathBuf::from("/data/tasks.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, None);
    }
}
