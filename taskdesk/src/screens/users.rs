use crate::client::Taskdesk;
use crate::controller::ListController;
use crate::error::{Result, TaskdeskError};
use crate::forms::UserForm;
use crate::navigation::guard;
use crate::roles::Capability;
use crate::types::{RoleInfo, User};

/// Placeholder shown in the user search box.
pub const SEARCH_HINT: &str = "Search by employee ID or employee name";

impl Taskdesk {
    /// Mount the user list.
    pub fn users(&self) -> ListController<User> {
        self.mount_list(None, |client, token, req| async move {
            client.get_users(&token, &req).await
        })
    }

    /// Roles offered by the add-user form.
    pub async fn roles(&self) -> Result<Vec<RoleInfo>> {
        self.authorized(|client, token| async move { client.get_roles(&token).await })
            .await
    }

    /// Every member, for assignee and project-member pickers.
    pub async fn members(&self) -> Result<Vec<User>> {
        self.authorized(|client, token| async move { client.get_members(&token).await })
            .await
    }

    pub async fn create_user(&self, form: &UserForm) -> Result<User> {
        guard(self.session().as_ref(), self.navigator().as_ref(), Capability::AddUser)?;
        let data = form
            .validate()
            .map_err(|errors| TaskdeskError::Validation(errors.into()))?;
        self.authorized(|client, token| async move { client.create_user(&token, &data).await })
            .await
    }
}
