//! Task record and title rules.
//!
//! # Responsibility
//! - Define the serialized shape `{id, title, completed}` of one to-do entry.
//! - Normalize and validate title input.
//!
//! # Invariants
//! - `id` doubles as creation order: larger means newer.
//! - `title` is trimmed and non-empty whenever core writes it.
//! - The 30-character bound applies at input time only; stored titles that
//!   exceed it are still accepted on read.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Identifier of one task inside a collection.
pub type TaskId = i64;

/// Maximum title length accepted by the input fields of both screens.
pub const TITLE_INPUT_MAX_CHARS: usize = 30;

/// One to-do entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    /// Older blobs may omit the flag; it then reads as `false`.
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Creates an open (not completed) task.
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            completed: false,
        }
    }

    /// Validates invariants that must hold before a task is written.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        Ok(())
    }
}

/// Validation failures for task writes and collection reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty after trimming.
    EmptyTitle,
    /// Two tasks in one collection share an id.
    DuplicateId(TaskId),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title cannot be empty"),
            Self::DuplicateId(id) => write!(f, "duplicate task id {id} in collection"),
        }
    }
}

impl Error for TaskValidationError {}

/// Returns the trimmed title, or `None` when nothing is left.
pub fn normalize_title(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Caps raw input at [`TITLE_INPUT_MAX_CHARS`] characters.
///
/// Mirrors a text field `maxLength`; counts chars, not bytes.
pub fn clamp_title_input(raw: &str) -> String {
    raw.chars().take(TITLE_INPUT_MAX_CHARS).collect()
}

/// Checks that no two tasks share an id.
pub fn ensure_unique_ids(tasks: &[Task]) -> Result<(), TaskValidationError> {
    let mut seen = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if !seen.insert(task.id) {
            return Err(TaskValidationError::DuplicateId(task.id));
        }
    }
    Ok(())
}
