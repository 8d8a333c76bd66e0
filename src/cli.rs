use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// taskdesk — command-line client for the task management admin panel.
#[derive(Parser, Debug)]
#[command(name = "taskdesk", version)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// API base URL (overrides TASKDESK_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Where the session is stored (overrides TASKDESK_SESSION_FILE)
    #[arg(long, global = true)]
    pub session_file: Option<PathBuf>,

    /// Print list pages as JSON instead of TSV
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and store the session
    Login(LoginArgs),

    /// Forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// List the menu entries available to the signed-in role
    Nav,

    /// List users
    Users(ListArgs),

    /// List projects
    Projects(ListArgs),

    /// List tasks
    Tasks(TaskListArgs),

    /// Interactive list: type to search, `:n`/`:p` to page, `:q` to quit
    Browse(BrowseArgs),

    /// Mark a task as done
    CompleteTask(CompleteTaskArgs),
}

#[derive(Parser, Debug)]
pub struct LoginArgs {
    pub email: String,

    /// Password (falls back to TASKDESK_PASSWORD)
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Parser, Debug, Default)]
pub struct ListArgs {
    /// Free-text search
    #[arg(long)]
    pub search: Option<String>,

    /// 1-based page number
    #[arg(long)]
    pub page: Option<u32>,
}

#[derive(Parser, Debug)]
pub struct TaskListArgs {
    #[command(flatten)]
    pub list: ListArgs,

    /// Status code to filter by (T, I or D)
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Parser, Debug)]
pub struct BrowseArgs {
    pub screen: Screen,
}

#[derive(Parser, Debug)]
pub struct CompleteTaskArgs {
    pub id: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Users,
    Projects,
    Tasks,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_task_listing() {
        let cli = Cli::parse_from([
            "taskdesk", "tasks", "--search", "deploy", "--status", "I", "--page", "2",
        ]);
        let Command::Tasks(args) = cli.command else {
            panic!("expected tasks");
        };
        assert_eq!(args.list.search.as_deref(), Some("deploy"));
        assert_eq!(args.list.page, Some(2));
        assert_eq!(args.status.as_deref(), Some("I"));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["taskdesk", "browse", "projects", "--api-url", "http://x:1"]);
        assert_eq!(cli.api_url.as_deref(), Some("http://x:1"));
        assert!(matches!(
            cli.command,
            Command::Browse(BrowseArgs {
                screen: Screen::Projects
            })
        ));
    }
}
