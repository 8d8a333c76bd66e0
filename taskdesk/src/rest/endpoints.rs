use reqwest::Method;
use serde_json::{json, Value};

use crate::error::Result;
use crate::rest::{unwrap_entity, TaskdeskHttpClient};
use crate::types::*;

impl TaskdeskHttpClient {
    // --- Auth ---

    /// POST /api/auth/login - Exchange credentials for a token and profile.
    pub async fn login(&self, data: &LoginData) -> Result<AuthResponse> {
        self.send(Method::POST, "/api/auth/login", None, data, "Login failed")
            .await
    }

    /// POST /api/auth/register - Create an account and sign in.
    pub async fn register(&self, data: &RegisterData) -> Result<AuthResponse> {
        self.send(
            Method::POST,
            "/api/auth/register",
            None,
            data,
            "Registration failed",
        )
        .await
    }

    /// GET /api/auth/me - Profile of the token's owner.
    pub async fn current_user(&self, token: &str) -> Result<User> {
        let v: Value = self
            .get("/api/auth/me", Some(token), &[], "Failed to get user")
            .await?;
        unwrap_entity(v, &["user"])
    }

    // --- Users ---

    /// GET /api/users - Paginated user list.
    pub async fn get_users(&self, token: &str, req: &PageRequest) -> Result<PageResult<User>> {
        let env: PageEnvelope<User> = self
            .get(
                "/api/users",
                Some(token),
                &req.query("status"),
                "Failed to fetch users",
            )
            .await?;
        Ok(PageResult::from_envelope(env, req))
    }

    /// GET /api/users/members - Every member, unpaginated, for pickers.
    pub async fn get_members(&self, token: &str) -> Result<Vec<User>> {
        let v: Value = self
            .get(
                "/api/users/members",
                Some(token),
                &[],
                "Failed to fetch members",
            )
            .await?;
        unwrap_entity(v, &["members"])
    }

    /// GET /api/roles - Assignable roles.
    pub async fn get_roles(&self, token: &str) -> Result<Vec<RoleInfo>> {
        let v: Value = self
            .get("/api/roles", Some(token), &[], "Failed to fetch roles")
            .await?;
        unwrap_entity(v, &["roles"])
    }

    /// POST /api/users - Create a user.
    pub async fn create_user(&self, token: &str, data: &CreateUserData) -> Result<User> {
        let v: Value = self
            .send(
                Method::POST,
                "/api/users",
                Some(token),
                data,
                "Failed to create user",
            )
            .await?;
        unwrap_entity(v, &["user"])
    }

    // --- Projects ---

    /// GET /api/projects - Paginated project list.
    pub async fn get_projects(
        &self,
        token: &str,
        req: &PageRequest,
    ) -> Result<PageResult<Project>> {
        let env: PageEnvelope<Project> = self
            .get(
                "/api/projects",
                Some(token),
                &req.query("status"),
                "Failed to fetch projects",
            )
            .await?;
        Ok(PageResult::from_envelope(env, req))
    }

    /// GET /api/projects/{id} - One project with its members.
    pub async fn get_project(&self, token: &str, id: &str) -> Result<ProjectDetail> {
        let v: Value = self
            .get(
                &format!("/api/projects/{id}"),
                Some(token),
                &[],
                "Failed to fetch project",
            )
            .await?;
        unwrap_entity(v, &["project"])
    }

    /// POST /api/projects - Create a project.
    pub async fn create_project(&self, token: &str, data: &CreateProjectData) -> Result<Project> {
        let v: Value = self
            .send(
                Method::POST,
                "/api/projects",
                Some(token),
                data,
                "Failed to create project",
            )
            .await?;
        unwrap_entity(v, &["project"])
    }

    /// PUT /api/projects/{id} - Replace a project's name, description and
    /// members.
    pub async fn edit_project(
        &self,
        token: &str,
        id: &str,
        data: &CreateProjectData,
    ) -> Result<Project> {
        let v: Value = self
            .send(
                Method::PUT,
                &format!("/api/projects/{id}"),
                Some(token),
                data,
                "Failed to edit project",
            )
            .await?;
        unwrap_entity(v, &["project"])
    }

    /// GET /api/projects/{id}/members - Users assigned to a project.
    pub async fn get_project_members(&self, token: &str, project_id: &str) -> Result<Vec<User>> {
        let v: Value = self
            .get(
                &format!("/api/projects/{project_id}/members"),
                Some(token),
                &[],
                "Failed to fetch project members",
            )
            .await?;
        unwrap_entity(v, &["members"])
    }

    // --- Tasks ---

    /// GET /api/tasks - Paginated task list, optionally filtered by status.
    pub async fn get_tasks(&self, token: &str, req: &PageRequest) -> Result<PageResult<Task>> {
        let env: PageEnvelope<Task> = self
            .get(
                "/api/tasks",
                Some(token),
                &req.query("status"),
                "Failed to fetch tasks",
            )
            .await?;
        Ok(PageResult::from_envelope(env, req))
    }

    /// POST /api/tasks - Create a task.
    pub async fn add_task(&self, token: &str, data: &CreateTaskData) -> Result<Task> {
        let v: Value = self
            .send(
                Method::POST,
                "/api/tasks",
                Some(token),
                data,
                "Failed to create task",
            )
            .await?;
        unwrap_entity(v, &["task"])
    }

    /// PUT /api/tasks/{id} - Replace a task's fields.
    pub async fn edit_task(&self, token: &str, id: &str, data: &CreateTaskData) -> Result<Task> {
        let v: Value = self
            .send(
                Method::PUT,
                &format!("/api/tasks/{id}"),
                Some(token),
                data,
                "Failed to edit task",
            )
            .await?;
        unwrap_entity(v, &["task"])
    }

    /// GET /api/tasks/{id} - One task.
    pub async fn get_task(&self, token: &str, id: &str) -> Result<Task> {
        let v: Value = self
            .get(
                &format!("/api/tasks/{id}"),
                Some(token),
                &[],
                "Failed to fetch task",
            )
            .await?;
        unwrap_entity(v, &["task"])
    }

    /// PATCH /api/tasks/{id}/status - Move a task to another status.
    pub async fn update_task_status(
        &self,
        token: &str,
        id: &str,
        status: TaskStatus,
    ) -> Result<Task> {
        let v: Value = self
            .send(
                Method::PATCH,
                &format!("/api/tasks/{id}/status"),
                Some(token),
                &json!({ "status": status.code() }),
                "Failed to update task status",
            )
            .await?;
        unwrap_entity(v, &["task"])
    }
}
