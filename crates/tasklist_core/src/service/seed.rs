//! Bundled default task list used on first launch.
//!
//! # Invariants
//! - The seed is only used when storage holds no tasks; it is never merged
//!   with stored data.
//! - Returned seeds are sorted newest first.

use crate::model::task::{ensure_unique_ids, Task};
use crate::service::task_ops::sort_newest_first;
use log::error;
use once_cell::sync::Lazy;

const SEED_JSON: &str = include_str!("seed_tasks.json");

static SEED_TASKS: Lazy<Vec<Task>> = Lazy::new(|| match parse_seed(SEED_JSON) {
    Ok(tasks) => tasks,
    Err(err) => {
        error!("event=seed_parse module=service status=error error={err}");
        Vec::new()
    }
});

/// Returns a fresh copy of the bundled seed collection, newest first.
pub fn default_seed() -> Vec<Task> {
    SEED_TASKS.clone()
}

fn parse_seed(raw: &str) -> Result<Vec<Task>, String> {
    let mut tasks: Vec<Task> = serde_json::from_str(raw).map_err(|err| err.to_string())?;
    ensure_unique_ids(&tasks).map_err(|err| err.to_string())?;
    for task in &tasks {
        task.validate().map_err(|err| format!("seed task {}: {err}", task.id))?;
    }
    sort_newest_first(&mut tasks);
    Ok(tasks)
}
