use std::time::Duration;

use url::Url;

use crate::error::{Result, TaskdeskError};

/// API base URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Rows per page on every list screen.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Quiet period before a search box value is acted upon.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Configuration for the taskdesk client.
#[derive(Debug, Clone)]
pub struct TaskdeskConfig {
    /// Base URL of the REST API (e.g. `http://localhost:8000`).
    pub api_url: String,
    /// Page size requested by list screens.
    pub page_size: u32,
    /// Debounce delay applied to search input.
    pub debounce: Duration,
}

impl Default for TaskdeskConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

impl TaskdeskConfig {
    /// Build a config from `TASKDESK_API_URL`, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("TASKDESK_API_URL") {
            config = config.with_api_url(&url)?;
        }
        Ok(config)
    }

    /// Replace the API URL after checking that it parses as http(s).
    pub fn with_api_url(mut self, api_url: &str) -> Result<Self> {
        let parsed = Url::parse(api_url)
            .map_err(|e| TaskdeskError::InvalidConfig(format!("api url {api_url:?}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(TaskdeskError::InvalidConfig(format!(
                "api url must be http or https, got {}",
                parsed.scheme()
            )));
        }
        self.api_url = api_url.trim_end_matches('/').to_string();
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = TaskdeskConfig::default();
        assert_eq!(c.api_url, "http://localhost:8000");
        assert_eq!(c.page_size, 10);
        assert_eq!(c.debounce, Duration::from_millis(300));
    }

    #[test]
    fn test_with_api_url_trims_and_validates() {
        let c = TaskdeskConfig::default()
            .with_api_url("https://api.example.com/")
            .unwrap();
        assert_eq!(c.api_url, "https://api.example.com");

        assert!(TaskdeskConfig::default().with_api_url("not a url").is_err());
        assert!(TaskdeskConfig::default()
            .with_api_url("ftp://example.com")
            .is_err());
    }
}
