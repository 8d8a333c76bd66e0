use crate::client::Taskdesk;
use crate::controller::ListController;
use crate::error::{Result, TaskdeskError};
use crate::forms::ProjectForm;
use crate::navigation::guard;
use crate::roles::Capability;
use crate::types::{Project, ProjectDetail, User};

pub const SEARCH_HINT: &str = "Search by project ID or project name";

impl Taskdesk {
    /// Mount the project list.
    pub fn projects(&self) -> ListController<Project> {
        self.mount_list(None, |client, token, req| async move {
            client.get_projects(&token, &req).await
        })
    }

    pub async fn project(&self, id: &str) -> Result<ProjectDetail> {
        self.authorized(|client, token| async move { client.get_project(&token, id).await })
            .await
    }

    pub async fn project_members(&self, id: &str) -> Result<Vec<User>> {
        self.authorized(|client, token| async move {
            client.get_project_members(&token, id).await
        })
        .await
    }

    pub async fn create_project(&self, form: &ProjectForm) -> Result<Project> {
        guard(self.session().as_ref(), self.navigator().as_ref(), Capability::AddProject)?;
        let data = validate(form)?;
        self.authorized(|client, token| async move { client.create_project(&token, &data).await })
            .await
    }

    pub async fn edit_project(&self, id: &str, form: &ProjectForm) -> Result<Project> {
        guard(self.session().as_ref(), self.navigator().as_ref(), Capability::EditProject)?;
        let data = validate(form)?;
        self.authorized(|client, token| async move {
            client.edit_project(&token, id, &data).await
        })
        .await
    }
}

/// Prefill an edit form from a loaded project.
impl From<&ProjectDetail> for ProjectForm {
    fn from(detail: &ProjectDetail) -> Self {
        Self {
            name: detail.project.name.clone(),
            description: detail.description.clone().unwrap_or_default(),
            member_ids: detail.members.iter().map(|m| m.id.clone()).collect(),
        }
    }
}

fn validate(form: &ProjectForm) -> Result<crate::types::CreateProjectData> {
    form.validate()
        .map_err(|errors| TaskdeskError::Validation(errors.into()))
}
