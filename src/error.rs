use thiserror::Error;

use taskdesk::TaskdeskError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Taskdesk(#[from] TaskdeskError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("password required: pass --password or set TASKDESK_PASSWORD")]
    MissingPassword,

    #[error("unknown task status {0:?} (expected T, I or D)")]
    InvalidStatus(String),

    #[error("not signed in: run `taskdesk login <email>`")]
    NotSignedIn,
}

impl CliError {
    /// Line printed to the terminal before exiting.
    pub fn user_message(&self) -> String {
        match self {
            CliError::Taskdesk(e) if e.is_auth_failure() => CliError::NotSignedIn.to_string(),
            CliError::Taskdesk(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}
