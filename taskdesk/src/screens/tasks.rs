use tracing::info;

use crate::client::Taskdesk;
use crate::controller::ListController;
use crate::error::{Result, TaskdeskError};
use crate::forms::TaskForm;
use crate::navigation::guard;
use crate::roles::{Capability, Role};
use crate::types::{Task, TaskStatus};

pub const SEARCH_HINT: &str = "Search by task ID or task title";

/// Controls offered on the task list for a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowActions {
    pub add: bool,
    pub edit: bool,
    pub complete: bool,
}

pub fn row_actions(role: Role) -> RowActions {
    RowActions {
        add: role.can(Capability::AddTask),
        edit: role.can(Capability::EditTask),
        complete: role.can(Capability::ViewTasks),
    }
}

/// Status a new task starts in: in progress once someone is assigned.
pub fn new_task_status(assignee_id: Option<&str>) -> TaskStatus {
    match assignee_id.map(str::trim) {
        Some(id) if !id.is_empty() => TaskStatus::InProgress,
        _ => TaskStatus::Todo,
    }
}

impl Taskdesk {
    /// Mount the task list, optionally narrowed to one status.
    pub fn tasks(&self, status: Option<TaskStatus>) -> ListController<Task> {
        let filter = status.map(|s| s.code().to_string());
        self.mount_list(filter, |client, token, req| async move {
            client.get_tasks(&token, &req).await
        })
    }

    pub async fn task(&self, id: &str) -> Result<Task> {
        self.authorized(|client, token| async move { client.get_task(&token, id).await })
            .await
    }

    pub async fn create_task(&self, form: &TaskForm) -> Result<Task> {
        guard(self.session().as_ref(), self.navigator().as_ref(), Capability::AddTask)?;
        let data = form
            .validate()
            .map_err(|errors| TaskdeskError::Validation(errors.into()))?;
        self.authorized(|client, token| async move { client.add_task(&token, &data).await })
            .await
    }

    /// Save an edited task and reload the list it was opened from.
    pub async fn edit_task(
        &self,
        tasks: &ListController<Task>,
        id: &str,
        form: &TaskForm,
    ) -> Result<Task> {
        guard(self.session().as_ref(), self.navigator().as_ref(), Capability::EditTask)?;
        let data = form
            .validate_update()
            .map_err(|errors| TaskdeskError::Validation(errors.into()))?;
        let task = self
            .authorized(|client, token| async move { client.edit_task(&token, id, &data).await })
            .await?;
        info!(task_id = %id, "task edited");
        tasks.refetch();
        Ok(task)
    }

    /// Mark a task done and reload the list it was shown in.
    pub async fn complete_task(&self, tasks: &ListController<Task>, id: &str) -> Result<Task> {
        let task = self
            .authorized(|client, token| async move {
                client.update_task_status(&token, id, TaskStatus::Done).await
            })
            .await?;
        info!(task_id = %id, "task completed");
        tasks.refetch();
        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_cannot_add_or_edit() {
        let actions = row_actions(Role::Member);
        assert!(!actions.add);
        assert!(!actions.edit);
        assert!(actions.complete);
        assert_eq!(
            row_actions(Role::Admin),
            RowActions {
                add: true,
                edit: true,
                complete: true
            }
        );
    }

    #[test]
    fn test_new_task_status() {
        assert_eq!(new_task_status(None), TaskStatus::Todo);
        assert_eq!(new_task_status(Some("  ")), TaskStatus::Todo);
        assert_eq!(new_task_status(Some("7")), TaskStatus::InProgress);
    }
}
