mod browse;
mod cli;
mod error;
mod render;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use cli::{Cli, Command, ListArgs, Screen};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use taskdesk::{
    FileSession, ListController, LoginForm, NavigationLog, Role, Route, SessionStore, TaskStatus,
    Taskdesk, TaskdeskConfig,
};

use crate::error::CliError;
use crate::render::{write_page, TableRow};

const DEFAULT_SESSION_FILE: &str = ".taskdesk/session.json";

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = cli
        .log_level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .unwrap_or(tracing_subscriber::filter::LevelFilter::INFO);

    tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let _ = dotenvy::dotenv(); // load .env if present

    // Shared cancellation token + signal handlers.
    let cancel = setup_signal_handlers();

    if let Err(e) = run(cli, cancel).await {
        error!(error = %e, "command failed");
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, cancel: CancellationToken) -> Result<(), CliError> {
    let mut config = TaskdeskConfig::from_env()?;
    if let Some(url) = &cli.api_url {
        config = config.with_api_url(url)?;
    }
    let session_path = cli
        .session_file
        .clone()
        .or_else(|| std::env::var_os("TASKDESK_SESSION_FILE").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE));
    let session = Arc::new(FileSession::new(session_path));
    let nav = Arc::new(NavigationLog::new());
    let app = Taskdesk::new(config, session, nav.clone());
    let json_mode = cli.json;

    match cli.command {
        Command::Login(args) => {
            let password = args
                .password
                .or_else(|| std::env::var("TASKDESK_PASSWORD").ok())
                .ok_or(CliError::MissingPassword)?;
            let user = app
                .login(&LoginForm {
                    email: args.email,
                    password,
                })
                .await?;
            println!("signed in as {} <{}>", user.full_name, user.email);
        }

        Command::Logout => {
            app.logout();
            println!("signed out");
        }

        Command::Whoami => {
            if app.session().token().is_none() {
                return Err(CliError::NotSignedIn);
            }
            let user = app.refresh_profile().await?;
            let role = Role::from_id(user.role_id);
            println!("{}\t{}\t{}\t{}", user.user_code, user.full_name, user.email, role);
        }

        Command::Nav => {
            if app.role().is_none() {
                return Err(CliError::NotSignedIn);
            }
            for item in app.navigation() {
                println!("{}\t{}", item.label, item.route());
            }
        }

        Command::Users(args) => {
            show_list(app.users(), &args, &nav, json_mode).await?;
        }

        Command::Projects(args) => {
            show_list(app.projects(), &args, &nav, json_mode).await?;
        }

        Command::Tasks(args) => {
            let status = parse_status(args.status.as_deref())?;
            show_list(app.tasks(status), &args.list, &nav, json_mode).await?;
        }

        Command::Browse(args) => {
            require_session(&app)?;
            info!(screen = ?args.screen, "browse starting");
            match args.screen {
                Screen::Users => {
                    browse::run_browse(app.users(), nav, false, json_mode, cancel).await?
                }
                Screen::Projects => {
                    browse::run_browse(app.projects(), nav, false, json_mode, cancel).await?
                }
                Screen::Tasks => {
                    browse::run_browse(app.tasks(None), nav, true, json_mode, cancel).await?
                }
            }
        }

        Command::CompleteTask(args) => {
            require_session(&app)?;
            let tasks = app.tasks(None);
            tasks.settled().await;
            let task = app.complete_task(&tasks, &args.id).await?;
            println!("{} is now {}", task.task_code, task.status_name());
            let state = tasks.settled().await;
            write_page(&mut std::io::stdout(), &state, json_mode)?;
        }
    }

    Ok(())
}

fn require_session(app: &Taskdesk) -> Result<(), CliError> {
    match app.session().token() {
        Some(_) => Ok(()),
        None => Err(CliError::NotSignedIn),
    }
}

fn parse_status(code: Option<&str>) -> Result<Option<TaskStatus>, CliError> {
    code.map(|c| {
        TaskStatus::from_code(&c.to_uppercase()).ok_or_else(|| CliError::InvalidStatus(c.into()))
    })
    .transpose()
}

/// Mount a list, apply the search and page, and print the settled page.
async fn show_list<T>(
    controller: ListController<T>,
    args: &ListArgs,
    nav: &NavigationLog,
    json_mode: bool,
) -> Result<(), CliError>
where
    T: TableRow + Clone + Send + Sync + 'static,
{
    let mut state = controller.settled().await;
    if let Some(search) = &args.search {
        controller.set_search_input(search.clone());
        state = controller.settled().await;
    }
    if let Some(page) = args.page {
        controller.set_page(page);
        state = controller.settled().await;
    }
    if nav.last() == Some(Route::Login) {
        return Err(CliError::NotSignedIn);
    }
    write_page(&mut std::io::stdout(), &state, json_mode)
}

/// Register SIGINT and SIGTERM handlers that trigger the returned token.
fn setup_signal_handlers() -> CancellationToken {
    let cancel = CancellationToken::new();

    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        info!("received SIGINT, shutting down");
        cancel_clone.cancel();
    });

    #[cfg(unix)]
    {
        let cancel_clone = cancel.clone();
        tokio::spawn(async move {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut sig) => {
                    sig.recv().await;
                    info!("received SIGTERM, shutting down");
                    cancel_clone.cancel();
                }
                Err(e) => error!(error = %e, "failed to register SIGTERM handler"),
            }
        });
    }

    cancel
}
