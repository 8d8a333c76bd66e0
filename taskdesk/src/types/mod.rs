pub mod enums;
mod flex;
pub mod page;
pub mod project;
pub mod task;
pub mod user;

pub use enums::TaskStatus;
pub use page::{page_count, PageEnvelope, PageRequest, PageResult, Pagination};
pub use project::{CreateProjectData, Project, ProjectDetail};
pub use task::{CreateTaskData, Task};
pub use user::{AuthResponse, CreateUserData, LoginData, RegisterData, RoleInfo, User};
