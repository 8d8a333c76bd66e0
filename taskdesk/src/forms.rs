//! Client-side form validation.
//!
//! Each form has a closed enum of its fields; validation produces either
//! the API payload or a [`FieldErrors`] keyed by that enum.

use std::collections::BTreeMap;
use std::fmt;

use validator::ValidateEmail;

use crate::screens::tasks::new_task_status;
use crate::types::{
    CreateProjectData, CreateTaskData, CreateUserData, LoginData, Task, TaskStatus,
};

/// Field identifier of a form.
pub trait FormField: Copy + Ord + fmt::Debug {
    /// Wire/display name of the field.
    fn name(self) -> &'static str;
}

/// Per-field error messages. At most one message per field; the first
/// failing rule wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrors<F: FormField> {
    errors: BTreeMap<F, String>,
}

impl<F: FormField> Default for FieldErrors<F> {
    fn default() -> Self {
        Self {
            errors: BTreeMap::new(),
        }
    }
}

impl<F: FormField> FieldErrors<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` for `field` unless it already has one.
    pub fn set(&mut self, field: F, message: impl Into<String>) {
        self.errors.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: F) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Drop the message for `field`, e.g. once the user edits it.
    pub fn clear(&mut self, field: F) {
        self.errors.remove(&field);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (F, &str)> {
        self.errors.iter().map(|(f, m)| (*f, m.as_str()))
    }

    fn require(&mut self, field: F, value: &str, message: &str) -> bool {
        if value.trim().is_empty() {
            self.set(field, message);
            false
        } else {
            true
        }
    }

    fn into_result<T>(self, ok: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(ok())
        } else {
            Err(self)
        }
    }
}

impl<F: FormField> fmt::Display for FieldErrors<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, msg)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {msg}", field.name())?;
        }
        Ok(())
    }
}

/// Field errors of whichever form failed, still keyed by its field enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormErrors {
    Login(FieldErrors<LoginField>),
    User(FieldErrors<UserField>),
    Project(FieldErrors<ProjectField>),
    Task(FieldErrors<TaskField>),
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormErrors::Login(e) => fmt::Display::fmt(e, f),
            FormErrors::User(e) => fmt::Display::fmt(e, f),
            FormErrors::Project(e) => fmt::Display::fmt(e, f),
            FormErrors::Task(e) => fmt::Display::fmt(e, f),
        }
    }
}

macro_rules! form_errors_from {
    ($field:ty, $variant:ident) => {
        impl From<FieldErrors<$field>> for FormErrors {
            fn from(errors: FieldErrors<$field>) -> Self {
                FormErrors::$variant(errors)
            }
        }
    };
}

form_errors_from!(LoginField, Login);
form_errors_from!(UserField, User);
form_errors_from!(ProjectField, Project);
form_errors_from!(TaskField, Task);

fn is_email(value: &str) -> bool {
    value.validate_email()
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoginField {
    Email,
    Password,
}

impl FormField for LoginField {
    fn name(self) -> &'static str {
        match self {
            LoginField::Email => "email",
            LoginField::Password => "password",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginData, FieldErrors<LoginField>> {
        let mut errors = FieldErrors::new();
        if errors.require(LoginField::Email, &self.email, "Email is required")
            && !is_email(self.email.trim())
        {
            errors.set(LoginField::Email, "Please enter a valid email address");
        }
        errors.require(LoginField::Password, &self.password, "Password is required");
        errors.into_result(|| LoginData {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Add user
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum UserField {
    FullName,
    Email,
    PhoneNumber,
    Role,
    Position,
    Level,
}

impl FormField for UserField {
    fn name(self) -> &'static str {
        match self {
            UserField::FullName => "full_name",
            UserField::Email => "email",
            UserField::PhoneNumber => "phone_number",
            UserField::Role => "role",
            UserField::Position => "position_code",
            UserField::Level => "level_code",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserForm {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub role: String,
    pub position_code: String,
    pub level_code: String,
}

impl UserForm {
    pub fn validate(&self) -> Result<CreateUserData, FieldErrors<UserField>> {
        let mut errors = FieldErrors::new();
        errors.require(UserField::FullName, &self.full_name, "Full name is required");
        if errors.require(UserField::Email, &self.email, "Email is required")
            && !is_email(self.email.trim())
        {
            errors.set(UserField::Email, "Invalid email address");
        }
        errors.require(
            UserField::PhoneNumber,
            &self.phone_number,
            "Phone number is required",
        );
        errors.require(UserField::Role, &self.role, "Role is required");
        errors.require(UserField::Position, &self.position_code, "Position is required");
        errors.require(UserField::Level, &self.level_code, "Level is required");
        errors.into_result(|| CreateUserData {
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone_number: self.phone_number.trim().to_string(),
            role: self.role.clone(),
            position_code: self.position_code.clone(),
            level_code: self.level_code.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Add / edit project
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ProjectField {
    Name,
}

impl FormField for ProjectField {
    fn name(self) -> &'static str {
        "name"
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProjectForm {
    pub name: String,
    pub description: String,
    pub member_ids: Vec<String>,
}

impl ProjectForm {
    pub fn validate(&self) -> Result<CreateProjectData, FieldErrors<ProjectField>> {
        let mut errors = FieldErrors::new();
        errors.require(ProjectField::Name, &self.name, "Project name is required");
        errors.into_result(|| CreateProjectData {
            name: self.name.trim().to_string(),
            description: non_empty(&self.description),
            member_ids: self.member_ids.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Add task
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TaskField {
    Title,
    Status,
    Priority,
    Project,
}

impl FormField for TaskField {
    fn name(self) -> &'static str {
        match self {
            TaskField::Title => "title",
            TaskField::Status => "status",
            TaskField::Priority => "priority",
            TaskField::Project => "project_id",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub project_id: String,
    pub assignee_id: String,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            status: "T".into(),
            priority: String::new(),
            project_id: String::new(),
            assignee_id: String::new(),
        }
    }
}

impl TaskForm {
    /// Validate and build the create payload. The submitted status is
    /// derived from whether an assignee was picked.
    pub fn validate(&self) -> Result<CreateTaskData, FieldErrors<TaskField>> {
        let mut data = self.validate_update()?;
        data.status = new_task_status(data.assignee_id.as_deref())
            .code()
            .to_string();
        Ok(data)
    }

    /// Validate and build the edit payload, keeping the chosen status. An
    /// empty assignee is left out of the payload.
    pub fn validate_update(&self) -> Result<CreateTaskData, FieldErrors<TaskField>> {
        let mut errors = FieldErrors::new();
        errors.require(TaskField::Title, &self.title, "Title is required");
        if errors.require(TaskField::Status, &self.status, "Status is required")
            && TaskStatus::from_code(self.status.trim()).is_none()
        {
            errors.set(TaskField::Status, "Invalid status");
        }
        errors.require(TaskField::Priority, &self.priority, "Priority is required");
        errors.require(TaskField::Project, &self.project_id, "Project is required");
        errors.into_result(|| CreateTaskData {
            title: self.title.trim().to_string(),
            description: non_empty(&self.description),
            status: self.status.trim().to_string(),
            priority: self.priority.clone(),
            project_id: self.project_id.clone(),
            assignee_id: non_empty(&self.assignee_id),
        })
    }
}

/// Prefill the edit form from a loaded task.
impl From<&Task> for TaskForm {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            status: task.status.clone().unwrap_or_else(|| "T".into()),
            priority: task.priority.clone().unwrap_or_default(),
            project_id: task.project_id.clone().unwrap_or_default(),
            assignee_id: task.assignee_id.clone().unwrap_or_default(),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let v = value.trim();
    (!v.is_empty()).then(|| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_required_fields() {
        let errors = LoginForm::default().validate().unwrap_err();
        assert_eq!(errors.get(LoginField::Email), Some("Email is required"));
        assert_eq!(errors.get(LoginField::Password), Some("Password is required"));
    }

    #[test]
    fn test_login_invalid_email_reports_first_rule_only() {
        let form = LoginForm {
            email: "not-an-email".into(),
            password: "pw".into(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get(LoginField::Email),
            Some("Please enter a valid email address")
        );
    }

    #[test]
    fn test_login_valid() {
        let form = LoginForm {
            email: " ann@example.com ".into(),
            password: "secret".into(),
        };
        let data = form.validate().unwrap();
        assert_eq!(data.email, "ann@example.com");
    }

    #[test]
    fn test_clear_field_after_edit() {
        let mut errors = UserForm::default().validate().unwrap_err();
        assert_eq!(errors.len(), 6);
        errors.clear(UserField::FullName);
        assert!(errors.get(UserField::FullName).is_none());
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn test_user_form_bad_email() {
        let form = UserForm {
            full_name: "Ann".into(),
            email: "ann@".into(),
            phone_number: "0800000000".into(),
            role: "admin".into(),
            position_code: "DEV".into(),
            level_code: "L1".into(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get(UserField::Email), Some("Invalid email address"));
        assert_eq!(errors.to_string(), "email: Invalid email address");
    }

    #[test]
    fn test_project_form() {
        assert!(ProjectForm::default().validate().is_err());
        let data = ProjectForm {
            name: "Apollo".into(),
            description: "  ".into(),
            member_ids: vec!["3".into()],
        }
        .validate()
        .unwrap();
        assert_eq!(data.description, None);
        assert_eq!(data.member_ids, vec!["3"]);
    }

    #[test]
    fn test_task_status_follows_assignee() {
        let mut form = TaskForm {
            title: "Write docs".into(),
            priority: "H".into(),
            project_id: "1".into(),
            ..TaskForm::default()
        };
        assert_eq!(form.validate().unwrap().status, "T");

        form.assignee_id = "42".into();
        let data = form.validate().unwrap();
        assert_eq!(data.status, "I");
        assert_eq!(data.assignee_id.as_deref(), Some("42"));
    }

    #[test]
    fn test_task_edit_keeps_status_and_drops_empty_assignee() {
        let task: Task = serde_json::from_value(serde_json::json!({
            "id": 9,
            "title": "Review PR",
            "status": "D",
            "priority": "M",
            "project_id": 3
        }))
        .unwrap();
        let form = TaskForm::from(&task);
        assert_eq!(form.project_id, "3");

        let data = form.validate_update().unwrap();
        assert_eq!(data.status, "D");
        assert_eq!(data.assignee_id, None);
        // Creating from the same form would restart it as todo.
        assert_eq!(form.validate().unwrap().status, "T");
    }

    #[test]
    fn test_task_edit_rejects_unknown_status() {
        let form = TaskForm {
            title: "x".into(),
            status: "Z".into(),
            priority: "L".into(),
            project_id: "1".into(),
            ..TaskForm::default()
        };
        let errors = form.validate_update().unwrap_err();
        assert_eq!(errors.get(TaskField::Status), Some("Invalid status"));
    }

    #[test]
    fn test_task_form_missing_project() {
        let form = TaskForm {
            title: "x".into(),
            priority: "L".into(),
            ..TaskForm::default()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get(TaskField::Project), Some("Project is required"));
        assert!(errors.get(TaskField::Status).is_none());
    }
}
