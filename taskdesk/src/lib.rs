pub mod auth;
pub mod client;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod format;
pub mod forms;
pub mod navigation;
pub mod rest;
pub mod roles;
pub mod screens;
pub mod session;
pub mod types;

// ---- Top-level re-exports for ergonomic usage ----

// Client
pub use client::Taskdesk;
pub use config::TaskdeskConfig;
pub use error::{Result, TaskdeskError};

// REST client
pub use rest::TaskdeskHttpClient;

// List controller
pub use controller::{FetchFn, FetchFuture, ListController, ListOptions, ListState};

// Session + navigation
pub use navigation::{guard, navigation_items, NavItem, NavigationLog, Navigator, Route};
pub use roles::{Capability, Role};
pub use session::{FileSession, MemorySession, SessionStore};

// Forms
pub use forms::{FieldErrors, FormErrors, LoginForm, ProjectForm, TaskForm, UserForm};

// Entities
pub use types::{
    AuthResponse, CreateProjectData, CreateTaskData, CreateUserData, PageRequest, PageResult,
    Project, ProjectDetail, RoleInfo, Task, TaskStatus, User,
};

pub use format::format_date;
