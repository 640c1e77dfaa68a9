//! Pure collection operations behind the list and edit screens.
//!
//! # Responsibility
//! - Compute the next collection for add/toggle/remove/edit.
//! - Pick the startup collection (stored list or bundled seed).
//!
//! # Invariants
//! - Apart from [`initialize`], nothing here performs I/O; callers persist
//!   the returned collection.
//! - Inputs are never mutated; every operation returns a new `Vec`.
//! - New ids are derived from the maximum over the whole collection, so an
//!   unsorted input cannot yield a duplicate id.

use crate::model::task::{normalize_title, Task, TaskId, TaskValidationError};
use crate::repo::kv_repo::KeyValueStore;
use crate::repo::storage_adapter::StorageAdapter;
use crate::service::seed::default_seed;
use log::warn;

/// Where the startup collection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitSource {
    /// Storage held a non-empty collection.
    Stored,
    /// Storage was empty or never written; the bundled seed is used.
    Seeded,
    /// Storage could not be read or decoded; the bundled seed is used.
    SeedFallback,
}

/// Loads the startup collection, newest first.
///
/// Read and decode failures are logged and fall back to the seed.
pub fn initialize<K: KeyValueStore>(adapter: &StorageAdapter<K>) -> Vec<Task> {
    initialize_with_source(adapter).0
}

/// Same as [`initialize`], also reporting which path was taken.
pub fn initialize_with_source<K: KeyValueStore>(
    adapter: &StorageAdapter<K>,
) -> (Vec<Task>, InitSource) {
    match adapter.load() {
        Ok(Some(mut tasks)) if !tasks.is_empty() => {
            sort_newest_first(&mut tasks);
            (tasks, InitSource::Stored)
        }
        Ok(_) => (default_seed(), InitSource::Seeded),
        Err(err) => {
            warn!(
                "event=tasks_init module=service status=fallback source=seed error_code={}",
                err.code()
            );
            (default_seed(), InitSource::SeedFallback)
        }
    }
}

/// Returns `max(id) + 1`, or 1 for an empty collection.
pub fn next_id(tasks: &[Task]) -> TaskId {
    tasks
        .iter()
        .map(|task| task.id)
        .max()
        .map_or(1, |max| max.saturating_add(1))
}

/// Sorts by descending id (newest first).
pub fn sort_newest_first(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| b.id.cmp(&a.id));
}

/// Finds the task with `id`.
pub fn find_task(tasks: &[Task], id: TaskId) -> Option<&Task> {
    tasks.iter().find(|task| task.id == id)
}

/// Prepends a new open task titled `title.trim()`.
///
/// Returns an unchanged copy when the trimmed title is empty.
pub fn add(tasks: &[Task], title: &str) -> Vec<Task> {
    add_with_id(tasks, next_id(tasks), title)
}

/// [`add`] with a caller-chosen id, for callers that track their own
/// monotonic counter.
///
/// The caller guarantees `id` is not already present.
pub fn add_with_id(tasks: &[Task], id: TaskId, title: &str) -> Vec<Task> {
    let Some(title) = normalize_title(title) else {
        return tasks.to_vec();
    };

    let mut next = Vec::with_capacity(tasks.len() + 1);
    next.push(Task::new(id, title));
    next.extend_from_slice(tasks);
    next
}

/// Flips `completed` on the task with `id`; other tasks are untouched.
pub fn toggle(tasks: &[Task], id: TaskId) -> Vec<Task> {
    tasks
        .iter()
        .map(|task| {
            if task.id == id {
                Task {
                    completed: !task.completed,
                    ..task.clone()
                }
            } else {
                task.clone()
            }
        })
        .collect()
}

/// Drops the task with `id`.
pub fn remove(tasks: &[Task], id: TaskId) -> Vec<Task> {
    tasks.iter().filter(|task| task.id != id).cloned().collect()
}

/// Replaces the title of task `id` inside a freshly read `stored` collection.
///
/// The edited task keeps its position and `completed` flag. When `stored`
/// has no such task, it is appended as a new open task.
///
/// # Errors
/// - `TaskValidationError::EmptyTitle` when `new_title` is blank.
pub fn edit_title(
    stored: &[Task],
    id: TaskId,
    new_title: &str,
) -> Result<Vec<Task>, TaskValidationError> {
    let title = normalize_title(new_title).ok_or(TaskValidationError::EmptyTitle)?;

    let mut next = stored.to_vec();
    match next.iter_mut().find(|task| task.id == id) {
        Some(task) => task.title = title,
        None => next.push(Task::new(id, title)),
    }
    Ok(next)
}
