use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use taskdesk::{ListController, NavigationLog, Route, TaskStatus};

use crate::error::CliError;
use crate::render::{write_page, TableRow};

/// One line typed at the browse prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Plain text replaces the search box contents.
    Search(String),
    Next,
    Prev,
    Page(u32),
    /// `None` clears the filter.
    Status(Option<TaskStatus>),
    Retry,
    Quit,
    Invalid(String),
}

pub fn parse_input(line: &str) -> Input {
    let Some(cmd) = line.strip_prefix(':') else {
        return Input::Search(line.trim_end_matches(['\r', '\n']).to_string());
    };
    let mut parts = cmd.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("n"), None) => Input::Next,
        (Some("p"), None) => Input::Prev,
        (Some("r"), None) => Input::Retry,
        (Some("q"), None) => Input::Quit,
        (Some("page"), Some(n)) => n
            .parse()
            .map(Input::Page)
            .unwrap_or_else(|_| Input::Invalid(format!("not a page number: {n}"))),
        (Some("status"), None) => Input::Status(None),
        (Some("status"), Some(code)) => match TaskStatus::from_code(&code.to_uppercase()) {
            Some(s) => Input::Status(Some(s)),
            None => Input::Invalid(format!("unknown status: {code}")),
        },
        _ => Input::Invalid(format!("unknown command: :{cmd}")),
    }
}

/// Drive a mounted list from stdin until `:q`, EOF, cancellation or a
/// redirect to the login view.
pub async fn run_browse<T>(
    controller: ListController<T>,
    nav: Arc<NavigationLog>,
    filterable: bool,
    json_mode: bool,
    cancel: CancellationToken,
) -> Result<(), CliError>
where
    T: TableRow + Clone + Send + Sync + 'static,
{
    let mut states = controller.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = std::io::stdout();

    eprintln!("type to search, :n :p :page N :r :q{}", if filterable { " :status C" } else { "" });
    write_page(&mut stdout, &states.borrow_and_update().clone(), json_mode)?;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("browse cancelled");
                break;
            }
            changed = states.changed() => {
                if changed.is_err() {
                    // Controller stopped: the session was rejected.
                    break;
                }
                let state = states.borrow_and_update().clone();
                write_page(&mut stdout, &state, json_mode)?;
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_input(&line) {
                    Input::Search(text) => controller.set_search_input(text),
                    Input::Next => controller.next_page(),
                    Input::Prev => controller.prev_page(),
                    Input::Page(n) => controller.set_page(n),
                    Input::Retry => controller.refetch(),
                    Input::Status(status) if filterable => {
                        controller.set_extra_filter(status.map(|s| s.code().to_string()));
                    }
                    Input::Status(_) => eprintln!("this list has no status filter"),
                    Input::Quit => break,
                    Input::Invalid(msg) => eprintln!("{msg}"),
                }
                debug!(line = %line, "browse input");
            }
        }
    }

    std::io::stdout().flush()?;
    if nav.last() == Some(Route::Login) {
        return Err(CliError::NotSignedIn);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_search() {
        assert_eq!(parse_input("alice"), Input::Search("alice".into()));
        assert_eq!(parse_input(""), Input::Search(String::new()));
    }

    #[test]
    fn test_commands() {
        assert_eq!(parse_input(":n"), Input::Next);
        assert_eq!(parse_input(":p"), Input::Prev);
        assert_eq!(parse_input(":page 4"), Input::Page(4));
        assert_eq!(parse_input(":r"), Input::Retry);
        assert_eq!(parse_input(":q"), Input::Quit);
        assert_eq!(parse_input(":status d"), Input::Status(Some(TaskStatus::Done)));
        assert_eq!(parse_input(":status"), Input::Status(None));
    }

    #[test]
    fn test_bad_commands() {
        assert!(matches!(parse_input(":page x"), Input::Invalid(_)));
        assert!(matches!(parse_input(":status Z"), Input::Invalid(_)));
        assert!(matches!(parse_input(":zap"), Input::Invalid(_)));
    }
}
