//! Shared task store: the one write path for every screen.
//!
//! # Responsibility
//! - Hold the in-memory collection shown by the list screen.
//! - Apply `task_ops` results, persist the whole collection, and notify
//!   subscribers after every mutation.
//!
//! # Invariants
//! - All mutations go through `&mut self`, so writes are serialized.
//! - Issued ids only grow during the store lifetime; a removed id is not
//!   reissued. The mark is not persisted, so a store opened later (e.g. the
//!   next CLI run) may reissue the id of a task removed earlier.
//! - A failed save keeps the new in-memory state, is logged, and is exposed
//!   through `last_persist_error` until the next successful save.

use crate::model::task::{normalize_title, Task, TaskId, TaskValidationError};
use crate::repo::kv_repo::KeyValueStore;
use crate::repo::storage_adapter::{StorageAdapter, StorageError};
use crate::service::task_ops::{self, InitSource};
use log::{info, warn};

/// Handle returned by [`TaskStore::subscribe`].
pub type SubscriptionId = u64;

type Listener = Box<dyn Fn(&[Task]) + Send>;

/// Single serialized access point over the stored task collection.
pub struct TaskStore<K: KeyValueStore> {
    adapter: StorageAdapter<K>,
    tasks: Vec<Task>,
    high_water: TaskId,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: SubscriptionId,
    last_persist_error: Option<StorageError>,
}

impl<K: KeyValueStore> TaskStore<K> {
    /// Opens the store and loads the startup collection.
    ///
    /// A first launch (nothing stored) writes the seed back so the blob
    /// exists afterwards. A failed read does not, to leave the unreadable
    /// blob in place until the user mutates something.
    pub fn open(adapter: StorageAdapter<K>) -> Self {
        let mut store = Self {
            adapter,
            tasks: Vec::new(),
            high_water: 0,
            listeners: Vec::new(),
            next_subscription: 1,
            last_persist_error: None,
        };
        store.load_startup();
        store
    }

    /// Current collection in display order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Looks up one task in the in-memory collection.
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        task_ops::find_task(&self.tasks, id)
    }

    /// Borrows the storage adapter.
    pub fn adapter(&self) -> &StorageAdapter<K> {
        &self.adapter
    }

    /// Error of the most recent save, if it failed.
    pub fn last_persist_error(&self) -> Option<&StorageError> {
        self.last_persist_error.as_ref()
    }

    /// Adds a task and returns its id, or `None` for a blank title.
    pub fn add(&mut self, title: &str) -> Option<TaskId> {
        normalize_title(title)?;
        let id = self
            .high_water
            .saturating_add(1)
            .max(task_ops::next_id(&self.tasks));
        let next = task_ops::add_with_id(&self.tasks, id, title);
        self.commit(next, "task_add", id);
        Some(id)
    }

    /// Flips completion of task `id`. Returns `false` when it does not exist.
    pub fn toggle(&mut self, id: TaskId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        let next = task_ops::toggle(&self.tasks, id);
        self.commit(next, "task_toggle", id);
        true
    }

    /// Removes task `id`. Returns `false` when it does not exist.
    pub fn remove(&mut self, id: TaskId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        let next = task_ops::remove(&self.tasks, id);
        self.commit(next, "task_remove", id);
        true
    }

    /// Renames task `id` against a fresh read of storage.
    ///
    /// When storage is empty, unreadable, or behind memory after a failed
    /// save, the in-memory collection is the merge base instead, so unsaved
    /// tasks are not dropped.
    ///
    /// # Errors
    /// - `TaskValidationError::EmptyTitle` for a blank title; nothing is
    ///   read or written in that case.
    pub fn edit_title(&mut self, id: TaskId, title: &str) -> Result<(), TaskValidationError> {
        normalize_title(title).ok_or(TaskValidationError::EmptyTitle)?;

        if self.last_persist_error.is_some() {
            // Memory is ahead of storage; the stored blob is stale.
            let next = task_ops::edit_title(&self.tasks, id, title)?;
            self.commit(next, "task_edit", id);
            return Ok(());
        }

        let next = match self.adapter.load() {
            Ok(Some(stored)) if !stored.is_empty() => task_ops::edit_title(&stored, id, title)?,
            Ok(_) => task_ops::edit_title(&self.tasks, id, title)?,
            Err(err) => {
                warn!(
                    "event=task_edit module=service status=fallback base=memory error_code={}",
                    err.code()
                );
                task_ops::edit_title(&self.tasks, id, title)?
            }
        };
        self.commit(next, "task_edit", id);
        Ok(())
    }

    /// Discards the in-memory collection and reloads it from storage.
    pub fn reload(&mut self) {
        self.load_startup();
        self.notify();
    }

    /// Registers `listener` to receive the collection after each change.
    pub fn subscribe(&mut self, listener: impl Fn(&[Task]) + Send + 'static) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        let listener: Listener = Box::new(listener);
        self.listeners.push((id, listener));
        id
    }

    /// Removes a listener. Returns `false` for an unknown handle.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    fn load_startup(&mut self) {
        let (tasks, source) = task_ops::initialize_with_source(&self.adapter);
        self.raise_high_water(&tasks);
        self.tasks = tasks;
        info!(
            "event=tasks_init module=service status=ok source={source:?} count={}",
            self.tasks.len()
        );
        if source == InitSource::Seeded {
            self.persist();
        }
    }

    fn commit(&mut self, next: Vec<Task>, event: &'static str, id: TaskId) {
        self.raise_high_water(&next);
        self.tasks = next;
        let persisted = self.persist();
        info!(
            "event={event} module=service status=ok task_id={id} count={} persisted={persisted}",
            self.tasks.len()
        );
        self.notify();
    }

    fn persist(&mut self) -> bool {
        match self.adapter.save(&self.tasks) {
            Ok(()) => {
                self.last_persist_error = None;
                true
            }
            Err(err) => {
                warn!(
                    "event=tasks_persist module=service status=dropped error_code={}",
                    err.code()
                );
                self.last_persist_error = Some(err);
                false
            }
        }
    }

    fn raise_high_water(&mut self, tasks: &[Task]) {
        if let Some(max) = tasks.iter().map(|task| task.id).max() {
            self.high_water = self.high_water.max(max);
        }
    }

    fn notify(&self) {
        for (_, listener) in &self.listeners {
            listener(&self.tasks);
        }
    }
}
