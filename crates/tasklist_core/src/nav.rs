//! Route contract between the list screen and the edit screen.
//!
//! The id travels as text in the path and is matched against the numeric
//! id by its decimal rendering, so `"01"` or `" 1"` never resolve to id 1.

use crate::model::task::TaskId;

const EDIT_ROUTE_PREFIX: &str = "/todos/";

/// Navigation request to edit one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditRoute {
    pub id: TaskId,
}

impl EditRoute {
    pub fn new(id: TaskId) -> Self {
        Self { id }
    }

    /// Path pushed by the list screen, e.g. `/todos/3`.
    pub fn path(&self) -> String {
        format!("{EDIT_ROUTE_PREFIX}{}", self.id)
    }

    /// Parses a full edit path.
    pub fn parse(path: &str) -> Option<Self> {
        path.strip_prefix(EDIT_ROUTE_PREFIX)
            .and_then(parse_route_id)
            .map(Self::new)
    }
}

/// Resolves the textual `id` route parameter.
pub fn parse_route_id(text: &str) -> Option<TaskId> {
    let id = text.parse::<TaskId>().ok()?;
    (id.to_string() == text).then_some(id)
}
