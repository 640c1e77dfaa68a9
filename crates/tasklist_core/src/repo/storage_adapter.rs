//! Storage Adapter for the task collection blob.
//!
//! # Responsibility
//! - Serialize the whole collection to one JSON array under
//!   [`TASKS_STORAGE_KEY`] and read it back.
//! - Classify failures into read, write and deserialization errors.
//!
//! # Invariants
//! - No partial writes: every `save` replaces the entire blob.
//! - `load` never reorders; sorting belongs to the Task Store.
//! - Log events carry counts and durations only, never titles.

use crate::model::task::{ensure_unique_ids, Task};
use crate::repo::kv_repo::{KeyValueStore, RepoError};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Fixed key holding the serialized task collection.
pub const TASKS_STORAGE_KEY: &str = "TaskManager";

/// Failure while moving the collection in or out of storage.
#[derive(Debug)]
pub enum StorageError {
    /// The key-value store could not be read.
    Read(RepoError),
    /// The key-value store rejected the write.
    Write(RepoError),
    /// The stored blob is not a JSON array of tasks.
    Deserialize(serde_json::Error),
    /// The collection could not be encoded.
    Serialize(serde_json::Error),
}

impl StorageError {
    /// Stable machine-readable code used in log lines and FFI messages.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Read(_) => "storage_read_failed",
            Self::Write(_) => "storage_write_failed",
            Self::Deserialize(_) => "storage_blob_malformed",
            Self::Serialize(_) => "storage_encode_failed",
        }
    }
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read(err) => write!(f, "failed to read tasks: {err}"),
            Self::Write(err) => write!(f, "failed to write tasks: {err}"),
            Self::Deserialize(err) => write!(f, "stored tasks are malformed: {err}"),
            Self::Serialize(err) => write!(f, "failed to encode tasks: {err}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read(err) | Self::Write(err) => Some(err),
            Self::Deserialize(err) | Self::Serialize(err) => Some(err),
        }
    }
}

/// Single-key, single-blob persistence for the task collection.
pub struct StorageAdapter<K: KeyValueStore> {
    kv: K,
    key: String,
}

impl<K: KeyValueStore> StorageAdapter<K> {
    /// Creates an adapter bound to [`TASKS_STORAGE_KEY`].
    pub fn new(kv: K) -> Self {
        Self::with_key(kv, TASKS_STORAGE_KEY)
    }

    /// Creates an adapter bound to a caller-chosen key.
    pub fn with_key(kv: K, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    /// Returns the key this adapter reads and writes.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Borrows the wrapped key-value store.
    pub fn kv(&self) -> &K {
        &self.kv
    }

    /// Loads the stored collection.
    ///
    /// Returns `Ok(None)` when nothing was ever stored.
    ///
    /// # Errors
    /// - `StorageError::Read` when the key-value store fails.
    /// - `StorageError::Deserialize` when the blob is not a task array.
    pub fn load(&self) -> Result<Option<Vec<Task>>, StorageError> {
        let started_at = Instant::now();
        let raw = match self.kv.get_item(&self.key) {
            Ok(raw) => raw,
            Err(err) => {
                let err = StorageError::Read(err);
                log_failure("tasks_load", started_at, &err);
                return Err(err);
            }
        };

        let Some(raw) = raw else {
            info!(
                "event=tasks_load module=repo status=ok found=false duration_ms={}",
                started_at.elapsed().as_millis()
            );
            return Ok(None);
        };

        let tasks: Vec<Task> = match serde_json::from_str(&raw) {
            Ok(tasks) => tasks,
            Err(err) => {
                let err = StorageError::Deserialize(err);
                log_failure("tasks_load", started_at, &err);
                return Err(err);
            }
        };

        if let Err(err) = ensure_unique_ids(&tasks) {
            // Kept as-is: dropping rows here would lose user data on the next save.
            warn!("event=tasks_load module=repo status=warn error_code=duplicate_id error={err}");
        }

        info!(
            "event=tasks_load module=repo status=ok found=true count={} bytes={} duration_ms={}",
            tasks.len(),
            raw.len(),
            started_at.elapsed().as_millis()
        );
        Ok(Some(tasks))
    }

    /// Serializes `tasks` and overwrites the stored blob.
    ///
    /// # Errors
    /// - `StorageError::Serialize` when encoding fails.
    /// - `StorageError::Write` when the key-value store rejects the write.
    pub fn save(&self, tasks: &[Task]) -> Result<(), StorageError> {
        let started_at = Instant::now();
        let encoded = serde_json::to_string(tasks).map_err(|err| {
            let err = StorageError::Serialize(err);
            log_failure("tasks_save", started_at, &err);
            err
        })?;

        if let Err(err) = self.kv.set_item(&self.key, &encoded) {
            let err = StorageError::Write(err);
            log_failure("tasks_save", started_at, &err);
            return Err(err);
        }

        info!(
            "event=tasks_save module=repo status=ok count={} bytes={} duration_ms={}",
            tasks.len(),
            encoded.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}

fn log_failure(event: &str, started_at: Instant, err: &StorageError) {
    error!(
        "event={event} module=repo status=error duration_ms={} error_code={} error={}",
        started_at.elapsed().as_millis(),
        err.code(),
        err
    );
}

#[cfg(test)]
mod tests {
    use super::{StorageAdapter, StorageError, TASKS_STORAGE_KEY};
    use crate::db::open_db_in_memory;
    use crate::model::task::Task;
    use crate::repo::kv_repo::{KeyValueStore, SqliteKeyValueStore};

    fn adapter() -> StorageAdapter<SqliteKeyValueStore> {
        StorageAdapter::new(SqliteKeyValueStore::new(open_db_in_memory().unwrap()))
    }

    #[test]
    fn load_returns_none_before_first_save() {
        assert!(adapter().load().unwrap().is_none());
    }

    #[test]
    fn save_then_load_preserves_order_and_fields() {
        let adapter = adapter();
        let mut done = Task::new(1, "Buy milk");
        done.completed = true;
        let tasks = vec![Task::new(2, "Walk dog"), done];

        adapter.save(&tasks).unwrap();
        assert_eq!(adapter.load().unwrap(), Some(tasks));
    }

    #[test]
    fn blob_is_written_under_fixed_key_as_json_array() {
        let adapter = adapter();
        adapter.save(&[Task::new(1, "Buy milk")]).unwrap();

        let raw = adapter.kv().get_item(TASKS_STORAGE_KEY).unwrap().unwrap();
        assert_eq!(raw, r#"[{"id":1,"title":"Buy milk","completed":false}]"#);
    }

    #[test]
    fn malformed_blob_is_a_deserialize_error() {
        let adapter = adapter();
        adapter
            .kv()
            .set_item(TASKS_STORAGE_KEY, "{not json")
            .unwrap();

        let err = adapter.load().unwrap_err();
        assert!(matches!(err, StorageError::Deserialize(_)));
        assert_eq!(err.code(), "storage_blob_malformed");
    }

    #[test]
    fn stored_empty_array_loads_as_empty_collection() {
        let adapter = adapter();
        adapter.save(&[]).unwrap();
        assert_eq!(adapter.load().unwrap(), Some(Vec::new()));
    }
}
