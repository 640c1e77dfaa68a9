//! Core domain logic for the tasklist app.
//! Single source of truth for task invariants and persistence.

pub mod app;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod nav;
pub mod repo;
pub mod service;
pub mod theme;

pub use app::{App, AppError, AppStore};
pub use config::AppConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{
    clamp_title_input, normalize_title, Task, TaskId, TaskValidationError, TITLE_INPUT_MAX_CHARS,
};
pub use nav::{parse_route_id, EditRoute};
pub use repo::kv_repo::{KeyValueStore, RepoError, RepoResult, SqliteKeyValueStore};
pub use repo::storage_adapter::{StorageAdapter, StorageError, TASKS_STORAGE_KEY};
pub use service::seed::default_seed;
pub use service::task_ops::InitSource;
pub use service::task_store::{SubscriptionId, TaskStore};
pub use theme::{ColorScheme, Palette, ThemeContext};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
