//! Command-line shell over tasklist core.
//!
//! # Responsibility
//! - Drive the same list/edit use-cases as the mobile UI from a terminal.
//! - Keep output deterministic for quick local sanity checks.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tasklist_core::{
    clamp_title_input, parse_route_id, App, AppConfig, EditRoute, Task, TaskId,
};

#[derive(Debug, Parser)]
#[command(name = "tasklist", version, about = "Local to-do list")]
struct Cli {
    /// SQLite file holding the task list [default: $TASKLIST_DB_PATH].
    #[arg(long)]
    db: Option<PathBuf>,
    /// trace|debug|info|warn|error [default: $TASKLIST_LOG_LEVEL].
    #[arg(long)]
    log_level: Option<String>,
    /// Absolute directory for rolling logs [default: $TASKLIST_LOG_DIR].
    #[arg(long)]
    log_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print all tasks, newest first.
    List,
    /// Add a task.
    Add { title: String },
    /// Flip a task between open and done.
    Toggle { id: TaskId },
    /// Delete a task.
    Remove { id: TaskId },
    /// Show one task, addressed like the edit screen route.
    Show { id: String },
    /// Rename one task.
    Edit { id: String, title: String },
    /// Print core version info.
    Ping,
}

impl Cli {
    /// Applies explicit flags on top of environment-derived `defaults`.
    fn config_over(&self, defaults: AppConfig) -> AppConfig {
        AppConfig {
            db_path: self.db.clone().unwrap_or(defaults.db_path),
            log_level: self.log_level.clone().unwrap_or(defaults.log_level),
            log_dir: self.log_dir.clone().or(defaults.log_dir),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    if let Command::Ping = cli.command {
        println!("tasklist_core ping={}", tasklist_core::ping());
        println!("tasklist_core version={}", tasklist_core::core_version());
        return Ok(());
    }

    let config = cli.config_over(AppConfig::from_env());
    let mut app = App::open(&config, None).map_err(|err| err.to_string())?;

    match cli.command {
        Command::List => {
            if app.store.tasks().is_empty() {
                println!("No tasks.");
            }
            for task in app.store.tasks() {
                println!("{}", render_task(task));
            }
        }
        Command::Add { title } => {
            let id = app
                .store
                .add(&clamp_title_input(&title))
                .ok_or("task title is empty")?;
            println!("added {id}");
        }
        Command::Toggle { id } => {
            if !app.store.toggle(id) {
                return Err(format!("task not found: {id}"));
            }
            if let Some(task) = app.store.get(id) {
                println!("{}", render_task(task));
            }
        }
        Command::Remove { id } => {
            if !app.store.remove(id) {
                return Err(format!("task not found: {id}"));
            }
            println!("removed {id}");
        }
        Command::Show { id } => {
            let id = resolve_id(&id)?;
            let task = app
                .store
                .get(id)
                .ok_or_else(|| format!("task not found: {id}"))?;
            println!("{}", render_task(task));
            println!("route {}", EditRoute::new(id).path());
        }
        Command::Edit { id, title } => {
            let id = resolve_id(&id)?;
            app.store
                .edit_title(id, &clamp_title_input(&title))
                .map_err(|err| err.to_string())?;
            println!("saved {id}");
        }
        Command::Ping => {}
    }

    if let Some(err) = app.store.last_persist_error() {
        return Err(format!("change kept in memory but not saved: {err}"));
    }
    Ok(())
}

fn resolve_id(raw: &str) -> Result<TaskId, String> {
    parse_route_id(raw)
        .or_else(|| EditRoute::parse(raw).map(|route| route.id))
        .ok_or_else(|| format!("invalid task id `{raw}`"))
}

fn render_task(task: &Task) -> String {
    let mark = if task.completed { 'x' } else { ' ' };
    format!("[{mark}] {:>4}  {}", task.id, task.title)
}

#[cfg(test)]
mod tests {
    use super::{render_task, resolve_id, Cli};
    use clap::{CommandFactory, Parser};
    use std::path::PathBuf;
    use tasklist_core::{AppConfig, Task};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_env_config_and_absent_flags_keep_it() {
        let env = AppConfig::from_lookup(|name| match name {
            "TASKLIST_DB_PATH" => Some(" /env/tasks.db ".to_string()),
            "TASKLIST_LOG_LEVEL" => Some("warn".to_string()),
            _ => None,
        });

        let cli = Cli::parse_from(["tasklist", "--db", "/flag/tasks.db", "list"]);
        let config = cli.config_over(env.clone());
        assert_eq!(config.db_path, PathBuf::from("/flag/tasks.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, None);

        let cli = Cli::parse_from(["tasklist", "list"]);
        assert_eq!(cli.config_over(env.clone()), env);
        assert_eq!(env.db_path, PathBuf::from("/env/tasks.db"));
    }

    #[test]
    fn resolve_id_accepts_plain_ids_and_routes() {
        assert_eq!(resolve_id("12"), Ok(12));
        assert_eq!(resolve_id("/todos/12"), Ok(12));
        assert!(resolve_id("012").is_err());
    }

    #[test]
    fn render_task_marks_completed() {
        let mut task = Task::new(3, "Call mom");
        assert_eq!(render_task(&task), "[ ]    3  Call mom");
        task.completed = true;
        assert!(render_task(&task).starts_with("[x]"));
    }
}
