use clap::{Parser, Subcommand};

use crate::api::DEFAULT_API_URL;

#[derive(Parser)]
#[command(name = "taskboard", about = "Terminal client for a task-management REST API")]
pub struct Cli {
    /// Base URL of the task API
    #[arg(long, env = "TASKBOARD_API_URL", global = true, default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Path to the log file [default: ~/.taskboard/taskboard.log]
    #[arg(long, env = "TASKBOARD_LOG", global = true)]
    pub log_file: Option<String>,

    /// Terminal event poll interval in milliseconds
    #[arg(long, env = "TASKBOARD_POLL_INTERVAL", global = true, default_value = "250")]
    pub poll_interval: u64,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Launch the interactive TUI (the default)
    Tui,

    /// List all tasks
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show task details
    Show {
        /// Task id
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a task
    Add {
        /// Task title (at least 3 characters)
        #[arg(short, long)]
        title: String,
        /// Task description
        #[arg(short, long, default_value = "")]
        desc: String,
        /// Task status (pending, in-progress, completed)
        #[arg(short, long, default_value = "pending")]
        status: String,
        /// Task priority (low, medium, high)
        #[arg(short, long, default_value = "low")]
        priority: String,
        /// Deadline as YYYY-MM-DD, today or later
        #[arg(long, default_value = "")]
        deadline: String,
        /// Output the created task as JSON
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_tui() {
        let cli = Cli::try_parse_from(["taskboard"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.poll_interval, 250);
    }

    #[test]
    fn poll_interval_is_global() {
        let cli = Cli::try_parse_from(["taskboard", "--poll-interval", "100"]).unwrap();
        assert_eq!(cli.poll_interval, 100);
        let cli = Cli::try_parse_from(["taskboard", "tui", "--poll-interval", "50"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Tui)));
        assert_eq!(cli.poll_interval, 50);
    }

    #[test]
    fn add_defaults_match_the_form() {
        let cli = Cli::try_parse_from(["taskboard", "add", "--title", "Write docs"]).unwrap();
        match cli.command {
            Some(Command::Add {
                title,
                desc,
                status,
                priority,
                deadline,
                json,
            }) => {
                assert_eq!(title, "Write docs");
                assert!(desc.is_empty());
                assert_eq!(status, "pending");
                assert_eq!(priority, "low");
                assert!(deadline.is_empty());
                assert!(!json);
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn api_url_flag_is_global() {
        let cli =
            Cli::try_parse_from(["taskboard", "list", "--api-url", "http://example.com"]).unwrap();
        assert_eq!(cli.api_url, "http://example.com");
    }
}
