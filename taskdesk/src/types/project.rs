use serde::{Deserialize, Serialize};

use super::flex::{opt_string_or_number, string_or_number};
use super::user::User;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub project_code: String,
    pub name: String,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub task_count: Option<u32>,
}

impl Project {
    /// Projects that still own tasks cannot be deleted.
    pub fn can_delete(&self) -> bool {
        self.task_count.unwrap_or(0) == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub members: Vec<User>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateProjectData {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub member_ids: Vec<String>,
}
