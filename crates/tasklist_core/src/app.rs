//! Composition root: one store and one theme context per process.
//!
//! # Invariants
//! - Screens receive `&mut App` (or its parts); they never open storage on
//!   their own.

use crate::config::AppConfig;
use crate::db::{open_db, open_db_in_memory, DbError};
use crate::repo::kv_repo::SqliteKeyValueStore;
use crate::repo::storage_adapter::StorageAdapter;
use crate::service::task_store::TaskStore;
use crate::theme::{ColorScheme, ThemeContext};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Startup failure of the composition root.
#[derive(Debug)]
pub enum AppError {
    Db(DbError),
    Logging(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "database open failed: {err}"),
            Self::Logging(message) => write!(f, "logging init failed: {message}"),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Logging(_) => None,
        }
    }
}

impl From<DbError> for AppError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

/// Store type used by the shipped app.
pub type AppStore = TaskStore<SqliteKeyValueStore>;

/// Application state shared by the list and edit screens.
pub struct App {
    pub store: AppStore,
    pub theme: ThemeContext,
}

impl App {
    /// Opens the database at `config.db_path` and loads tasks.
    ///
    /// Logging is initialized first when `config.log_dir` is set.
    pub fn open(config: &AppConfig, system_scheme: Option<ColorScheme>) -> Result<Self, AppError> {
        if let Some(log_dir) = &config.log_dir {
            crate::logging::init_logging(&config.log_level, &log_dir.to_string_lossy())
                .map_err(AppError::Logging)?;
        }

        let conn = open_db(&config.db_path)?;
        let app = Self::with_store(
            TaskStore::open(StorageAdapter::new(SqliteKeyValueStore::new(conn))),
            system_scheme,
        );
        info!(
            "event=app_open module=app status=ok mode=file count={}",
            app.store.tasks().len()
        );
        Ok(app)
    }

    /// Opens a throwaway in-memory app.
    pub fn in_memory(system_scheme: Option<ColorScheme>) -> Result<Self, AppError> {
        let conn = open_db_in_memory()?;
        Ok(Self::with_store(
            TaskStore::open(StorageAdapter::new(SqliteKeyValueStore::new(conn))),
            system_scheme,
        ))
    }

    fn with_store(store: AppStore, system_scheme: Option<ColorScheme>) -> Self {
        Self {
            store,
            theme: ThemeContext::new(system_scheme),
        }
    }
}
