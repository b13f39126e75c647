mod api;
mod cli;
mod dispatch;
mod form;
mod model;
mod output;
mod tui;
mod validate;

use std::fs::OpenOptions;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use log::info;
use tokio::runtime::Runtime;

use api::TaskClient;
use cli::{Cli, Command};
use form::TaskForm;
use model::{CreateTaskInput, Task};

fn default_log_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".taskboard").join("taskboard.log"))
}

fn resolve_log_path(cli_log: Option<String>) -> Result<PathBuf> {
    match cli_log {
        Some(p) => Ok(PathBuf::from(p)),
        None => default_log_path(),
    }
}

fn ensure_parent_dir(path: &std::path::Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
    }
    Ok(())
}

/// Logs go to a file; the terminal belongs to the TUI.
fn setup_logging(path: &std::path::Path) -> Result<()> {
    ensure_parent_dir(path)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    env_logger::Builder::new()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .filter_level(log::LevelFilter::Info)
        .parse_env(env_logger::Env::new().filter("TASKBOARD_LOG_LEVEL"))
        .format_timestamp_secs()
        .init();

    Ok(())
}

fn build_runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .context("failed to start async runtime")
}

/// Validate what was entered and hand the result to `create`. When any
/// rule fails, the error lists every failing field and `create` is never
/// called.
fn add_task<F>(entered: &TaskForm, today: NaiveDate, create: F) -> Result<Task>
where
    F: FnOnce(&CreateTaskInput) -> Result<Task>,
{
    match entered.to_input(today) {
        Ok(input) => create(&input),
        Err(errors) => bail!("task not created:\n  {}", errors.messages().join("\n  ")),
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&resolve_log_path(cli.log_file)?)?;

    let client = TaskClient::new(&cli.api_url)?;
    let rt = build_runtime()?;
    info!("using API at {}", client.base_url());

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => {
            tui::run(rt.handle().clone(), client, cli.poll_interval)?;
        }

        Command::List { json } => {
            let tasks = rt.block_on(client.list())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else {
                print!("{}", output::format_task_list(&tasks));
            }
        }

        Command::Show { id, json } => match rt.block_on(client.get(&id))? {
            Some(task) if json => println!("{}", serde_json::to_string_pretty(&task)?),
            Some(task) => print!("{}", output::format_task_detail(&task)),
            None => bail!("task '{id}' not found"),
        },

        Command::Add {
            title,
            desc,
            status,
            priority,
            deadline,
            json,
        } => {
            let entered = TaskForm {
                title,
                description: desc,
                status,
                priority,
                deadline,
            };
            let task = add_task(&entered, form::local_today(), |input| {
                Ok(rt.block_on(client.create(input))?)
            })?;
            if json {
                println!("{}", serde_json::to_string_pretty(&task)?);
            } else {
                eprintln!("Created task '{}' ({})", task.title, task.id);
            }
        }
    }

    Ok(())
}
