use serde::{Deserialize, Serialize};

use super::enums::TaskStatus;
use super::flex::{opt_string_or_number, string_or_number};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub task_code: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub project_id: Option<String>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub assignee_id: Option<String>,
    #[serde(default)]
    pub assignee_name: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Task {
    /// Parsed status, `None` when absent or not a known code.
    pub fn status(&self) -> Option<TaskStatus> {
        self.status.as_deref().and_then(TaskStatus::from_code)
    }

    /// Display name of the status: known codes map to their name, unknown
    /// codes are shown verbatim, absent shows `N/A`.
    pub fn status_name(&self) -> &str {
        match (self.status(), self.status.as_deref()) {
            (Some(s), _) => s.name(),
            (None, Some(code)) => code,
            (None, None) => "N/A",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateTaskData {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub project_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
}
