use thiserror::Error;

use crate::forms::FormErrors;

/// Message shown when the API cannot be reached at all.
pub const SERVER_UNAVAILABLE: &str = "Server unavailable";

#[derive(Error, Debug)]
pub enum TaskdeskError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("no active session")]
    NoSession,

    #[error("{0}")]
    ServerUnavailable(String),

    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("validation error: {0}")]
    Validation(FormErrors),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl TaskdeskError {
    /// Whether the failure means the stored credential is missing or was
    /// rejected, in which case the session must be dropped.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, TaskdeskError::Unauthorized | TaskdeskError::NoSession)
    }

    /// Text suitable for an inline error banner.
    ///
    /// Server-provided messages pass through verbatim.
    pub fn user_message(&self) -> String {
        match self {
            TaskdeskError::Http { message, .. } => message.clone(),
            TaskdeskError::ServerUnavailable(msg) => msg.clone(),
            TaskdeskError::Request(e) if e.is_connect() || e.is_timeout() => {
                SERVER_UNAVAILABLE.to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TaskdeskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_failures() {
        assert!(TaskdeskError::Unauthorized.is_auth_failure());
        assert!(TaskdeskError::NoSession.is_auth_failure());
        assert!(!TaskdeskError::ServerUnavailable("x".into()).is_auth_failure());
        assert!(!TaskdeskError::Http {
            status: 401,
            message: "nope".into()
        }
        .is_auth_failure());
    }

    #[test]
    fn test_user_message_passes_server_text_through() {
        let err = TaskdeskError::Http {
            status: 500,
            message: "Failed to fetch tasks".into(),
        };
        assert_eq!(err.user_message(), "Failed to fetch tasks");
        assert_eq!(
            TaskdeskError::ServerUnavailable(SERVER_UNAVAILABLE.into()).user_message(),
            "Server unavailable"
        );
    }
}
