//! FFI use-case API for the list screen, edit screen and theme toggle.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Own the process composition root (`App`) behind one mutex, so every
//!   screen mutates the same store.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Task ids cross the boundary as `i64`; edit-screen ids arrive as route
//!   text and are resolved with `parse_route_id`.
//! - Titles are clamped to the input bound before reaching core.

use log::warn;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tasklist_core::{
    clamp_title_input, core_version as core_version_inner, init_logging as init_logging_inner,
    parse_route_id, ping as ping_inner, App, AppConfig, ColorScheme, EditRoute, Task, TaskId,
    ThemeContext,
};

static APP: Mutex<Option<App>> = Mutex::new(None);
static REVISION: AtomicU64 = AtomicU64::new(0);

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One row of the task list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: i64,
    pub title: String,
    pub completed: bool,
}

/// Full collection in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListResponse {
    pub ok: bool,
    pub items: Vec<TaskItem>,
    /// Store revision the items belong to.
    pub revision: u64,
    pub message: String,
}

/// Result of one list/edit action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskActionResponse {
    /// Whether the action was applied in memory.
    pub ok: bool,
    /// Affected task id, when there is one.
    pub task_id: Option<i64>,
    /// Whether the follow-up save reached storage.
    pub persisted: bool,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl TaskActionResponse {
    fn applied(app: &App, message: impl Into<String>, task_id: TaskId) -> Self {
        let persisted = app.store.last_persist_error().is_none();
        let mut message = message.into();
        if let Some(err) = app.store.last_persist_error() {
            message = format!("{message} Not saved: {}.", err.code());
        }
        Self {
            ok: true,
            task_id: Some(task_id),
            persisted,
            message,
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            task_id: None,
            persisted: false,
            message: message.into(),
        }
    }
}

/// Single task loaded by the edit screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDetailResponse {
    pub ok: bool,
    pub item: Option<TaskItem>,
    pub message: String,
}

/// Active color scheme and palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeResponse {
    /// `light|dark`.
    pub color_scheme: String,
    pub text: String,
    pub background: String,
    pub icon: String,
    pub button: String,
}

/// Returns the current collection for the list screen.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_list() -> TaskListResponse {
    match with_app(|app| app.store.tasks().iter().map(to_task_item).collect::<Vec<_>>()) {
        Ok(items) => TaskListResponse {
            ok: true,
            message: format!("{} task(s).", items.len()),
            items,
            revision: tasks_revision(),
        },
        Err(err) => TaskListResponse {
            ok: false,
            items: Vec::new(),
            revision: tasks_revision(),
            message: format!("tasks_list failed: {err}"),
        },
    }
}

/// Monotonic counter bumped after every store change.
///
/// Lets the UI skip re-fetching when nothing changed.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_revision() -> u64 {
    REVISION.load(Ordering::SeqCst)
}

/// Adds a task from the list screen input.
///
/// Blank input is reported as `ok=false` and changes nothing.
#[flutter_rust_bridge::frb(sync)]
pub fn task_add(title: String) -> TaskActionResponse {
    let title = clamp_title_input(&title);
    with_app(|app| match app.store.add(&title) {
        Some(id) => TaskActionResponse::applied(app, "Task added.", id),
        None => TaskActionResponse::failure("Task title is empty."),
    })
    .unwrap_or_else(|err| TaskActionResponse::failure(format!("task_add failed: {err}")))
}

/// Toggles completion (long press on a row).
#[flutter_rust_bridge::frb(sync)]
pub fn task_toggle(id: i64) -> TaskActionResponse {
    with_app(|app| {
        if app.store.toggle(id) {
            TaskActionResponse::applied(app, "Task toggled.", id)
        } else {
            TaskActionResponse::failure(format!("task not found: {id}"))
        }
    })
    .unwrap_or_else(|err| TaskActionResponse::failure(format!("task_toggle failed: {err}")))
}

/// Deletes a task.
#[flutter_rust_bridge::frb(sync)]
pub fn task_remove(id: i64) -> TaskActionResponse {
    with_app(|app| {
        if app.store.remove(id) {
            TaskActionResponse::applied(app, "Task deleted.", id)
        } else {
            TaskActionResponse::failure(format!("task not found: {id}"))
        }
    })
    .unwrap_or_else(|err| TaskActionResponse::failure(format!("task_remove failed: {err}")))
}

/// Route the list screen pushes to open the edit screen.
#[flutter_rust_bridge::frb(sync)]
pub fn task_edit_route(id: i64) -> String {
    EditRoute::new(id).path()
}

/// Loads one task for the edit screen by its route parameter.
#[flutter_rust_bridge::frb(sync)]
pub fn task_get(route_id: String) -> TaskDetailResponse {
    let Some(id) = parse_route_id(&route_id) else {
        return TaskDetailResponse {
            ok: false,
            item: None,
            message: format!("invalid task route id `{route_id}`"),
        };
    };

    match with_app(|app| app.store.get(id).map(to_task_item)) {
        Ok(Some(item)) => TaskDetailResponse {
            ok: true,
            item: Some(item),
            message: String::new(),
        },
        Ok(None) => TaskDetailResponse {
            ok: false,
            item: None,
            message: format!("task not found: {id}"),
        },
        Err(err) => TaskDetailResponse {
            ok: false,
            item: None,
            message: format!("task_get failed: {err}"),
        },
    }
}

/// Saves the edited title from the edit screen.
#[flutter_rust_bridge::frb(sync)]
pub fn task_save_title(route_id: String, title: String) -> TaskActionResponse {
    let Some(id) = parse_route_id(&route_id) else {
        return TaskActionResponse::failure(format!("invalid task route id `{route_id}`"));
    };
    let title = clamp_title_input(&title);

    with_app(|app| match app.store.edit_title(id, &title) {
        Ok(()) => TaskActionResponse::applied(app, "Task saved.", id),
        Err(err) => TaskActionResponse::failure(err.to_string()),
    })
    .unwrap_or_else(|err| TaskActionResponse::failure(format!("task_save_title failed: {err}")))
}

/// Returns the active theme.
#[flutter_rust_bridge::frb(sync)]
pub fn theme_get() -> ThemeResponse {
    with_theme(|_| ())
}

/// Sets `light|dark`; unknown values leave the theme unchanged.
#[flutter_rust_bridge::frb(sync)]
pub fn theme_set(color_scheme: String) -> ThemeResponse {
    with_theme(|theme| match color_scheme.parse::<ColorScheme>() {
        Ok(scheme) => theme.set_color_scheme(scheme),
        Err(err) => warn!("event=theme_set module=ffi status=ignored error={err}"),
    })
}

/// Flips light <-> dark.
#[flutter_rust_bridge::frb(sync)]
pub fn theme_toggle() -> ThemeResponse {
    with_theme(|theme| {
        theme.toggle();
    })
}

fn with_theme(f: impl FnOnce(&mut ThemeContext)) -> ThemeResponse {
    match with_app(|app| {
        f(&mut app.theme);
        to_theme_response(&app.theme)
    }) {
        Ok(response) => response,
        Err(err) => {
            warn!("event=theme_access module=ffi status=error error={err}");
            to_theme_response(&ThemeContext::default())
        }
    }
}

fn with_app<T>(f: impl FnOnce(&mut App) -> T) -> Result<T, String> {
    let mut guard = APP
        .lock()
        .map_err(|_| "app state lock poisoned".to_string())?;

    if guard.is_none() {
        // Logging is configured by the host through `init_logging`.
        let config = AppConfig {
            log_dir: None,
            ..AppConfig::from_env()
        };
        let mut app = App::open(&config, None).map_err(|err| err.to_string())?;
        app.store.subscribe(|_| {
            REVISION.fetch_add(1, Ordering::SeqCst);
        });
        *guard = Some(app);
    }

    match guard.as_mut() {
        Some(app) => Ok(f(app)),
        None => Err("app state unavailable".to_string()),
    }
}

fn to_task_item(task: &Task) -> TaskItem {
    TaskItem {
        id: task.id,
        title: task.title.clone(),
        completed: task.completed,
    }
}

fn to_theme_response(theme: &ThemeContext) -> ThemeResponse {
    let palette = theme.theme();
    ThemeResponse {
        color_scheme: theme.color_scheme().as_str().to_string(),
        text: palette.text.to_string(),
        background: palette.background.to_string(),
        icon: palette.icon.to_string(),
        button: palette.button.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, ping, task_add, task_edit_route, task_get, task_remove,
        task_save_title, task_toggle, tasks_list, tasks_revision, theme_get, theme_set,
        theme_toggle,
    };
    use std::sync::OnceLock;
    use std::time::{SystemTime, UNIX_EPOCH};
    use tasklist_core::config::DB_PATH_ENV;
    use tasklist_core::TITLE_INPUT_MAX_CHARS;

    static TEST_DB_DIR: OnceLock<tempfile::TempDir> = OnceLock::new();

    /// Points the shared app at a per-run database before first use.
    fn isolated() {
        TEST_DB_DIR.get_or_init(|| {
            let dir = tempfile::tempdir().expect("create temp dir");
            std::env::set_var(DB_PATH_ENV, dir.path().join("ffi_tests.sqlite3"));
            dir
        });
    }

    fn unique_title(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}{}", nanos % 1_000_000)
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        assert!(!init_logging("verbose".to_string(), "tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn task_add_then_list_shows_trimmed_task() {
        isolated();
        let title = unique_title("add ");
        let added = task_add(format!("  {title}  "));
        assert!(added.ok, "{}", added.message);
        assert!(added.persisted);
        let id = added.task_id.expect("add returns id");

        let listed = tasks_list();
        assert!(listed.ok, "{}", listed.message);
        let item = listed
            .items
            .iter()
            .find(|item| item.id == id)
            .expect("new task is listed");
        assert_eq!(item.title, title);
        assert!(!item.completed);
    }

    #[test]
    fn task_add_rejects_blank_and_clamps_long_input() {
        isolated();
        let blank = task_add("   ".to_string());
        assert!(!blank.ok);
        assert_eq!(blank.task_id, None);

        let long = task_add("x".repeat(TITLE_INPUT_MAX_CHARS * 2));
        assert!(long.ok, "{}", long.message);
        let id = long.task_id.expect("add returns id");
        let detail = task_get(id.to_string());
        let item = detail.item.expect("task is found");
        assert_eq!(item.title.chars().count(), TITLE_INPUT_MAX_CHARS);
    }

    #[test]
    fn toggle_and_remove_report_missing_ids() {
        isolated();
        let id = task_add(unique_title("toggle ")).task_id.expect("add returns id");

        let toggled = task_toggle(id);
        assert!(toggled.ok, "{}", toggled.message);
        assert!(task_get(id.to_string()).item.expect("exists").completed);

        let removed = task_remove(id);
        assert!(removed.ok, "{}", removed.message);
        assert!(!task_remove(id).ok);
        assert!(!task_toggle(id).ok);
        assert!(!task_get(id.to_string()).ok);
    }

    #[test]
    fn edit_flow_uses_route_text_ids() {
        isolated();
        let id = task_add(unique_title("edit ")).task_id.expect("add returns id");
        let route = task_edit_route(id);
        let route_id = route
            .strip_prefix("/todos/")
            .expect("edit route prefix")
            .to_string();

        let saved = task_save_title(route_id.clone(), "Renamed task".to_string());
        assert!(saved.ok, "{}", saved.message);
        assert_eq!(saved.task_id, Some(id));
        assert_eq!(
            task_get(route_id).item.map(|item| item.title),
            Some("Renamed task".to_string())
        );

        assert!(!task_get(format!("0{id}")).ok);
        assert!(!task_save_title("abc".to_string(), "x".to_string()).ok);
        assert!(!task_save_title(id.to_string(), "  ".to_string()).ok);
    }

    #[test]
    fn revision_advances_on_mutation() {
        isolated();
        let _ = tasks_list();
        let before = tasks_revision();
        assert!(task_add(unique_title("rev ")).ok);
        assert!(tasks_revision() > before);
    }

    #[test]
    fn theme_set_and_toggle() {
        isolated();
        let dark = theme_set("dark".to_string());
        assert_eq!(dark.color_scheme, "dark");
        assert_eq!(dark.background, "black");

        let ignored = theme_set("sepia".to_string());
        assert_eq!(ignored, dark);

        let light = theme_toggle();
        assert_eq!(light.color_scheme, "light");
        assert_eq!(light.text, "black");
        assert_eq!(theme_get(), light);
    }
}
