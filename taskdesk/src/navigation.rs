//! Routes, the navigation seam, and role-filtered menus.

use std::fmt;
use std::sync::Mutex;

use tracing::debug;

use crate::error::{Result, TaskdeskError};
use crate::roles::{Capability, Role};
use crate::session::SessionStore;
use crate::types::User;

/// Every view of the panel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Home,
    ManageUsers,
    AddUser,
    ManageProjects,
    AddProject,
    EditProject(String),
    ManageTasks,
    AddTask,
    EditTask(String),
    CompleteTask(String),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".into(),
            Route::Home => "/".into(),
            Route::ManageUsers => "/manage-users".into(),
            Route::AddUser => "/manage-users/add".into(),
            Route::ManageProjects => "/manage-projects".into(),
            Route::AddProject => "/manage-projects/add".into(),
            Route::EditProject(id) => format!("/manage-projects/edit/{id}"),
            Route::ManageTasks => "/manage-tasks".into(),
            Route::AddTask => "/manage-tasks/add".into(),
            Route::EditTask(id) => format!("/manage-tasks/edit/{id}"),
            Route::CompleteTask(id) => format!("/manage-tasks/complete/{id}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Moves the user to another view.
pub trait Navigator: Send + Sync {
    fn go_to(&self, route: Route);
}

/// Navigator that remembers where it was sent. The CLI uses it to notice a
/// redirect to the login view.
#[derive(Debug, Default)]
pub struct NavigationLog {
    routes: Mutex<Vec<Route>>,
}

impl NavigationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn last(&self) -> Option<Route> {
        self.routes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .cloned()
    }
}

impl Navigator for NavigationLog {
    fn go_to(&self, route: Route) {
        debug!(route = %route, "navigate");
        self.routes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(route);
    }
}

/// A sidebar/menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub id: &'static str,
    pub label: &'static str,
    pub capability: Capability,
}

impl NavItem {
    pub fn route(&self) -> Route {
        match self.capability {
            Capability::ViewUsers => Route::ManageUsers,
            Capability::ViewProjects => Route::ManageProjects,
            _ => Route::ManageTasks,
        }
    }
}

const NAV_ITEMS: [NavItem; 3] = [
    NavItem {
        id: "users",
        label: "Manage Users",
        capability: Capability::ViewUsers,
    },
    NavItem {
        id: "projects",
        label: "Manage Projects",
        capability: Capability::ViewProjects,
    },
    NavItem {
        id: "manage-tasks",
        label: "Manage Tasks",
        capability: Capability::ViewTasks,
    },
];

/// Menu entries visible to `role`, in display order.
pub fn navigation_items(role: Role) -> Vec<NavItem> {
    NAV_ITEMS
        .iter()
        .copied()
        .filter(|item| role.can(item.capability))
        .collect()
}

/// Entry check for pages that need `cap`.
///
/// Without a session the session is cleared and the user sent to the login
/// view; with a session lacking `cap` the user is sent home.
pub fn guard(
    session: &dyn SessionStore,
    navigator: &dyn Navigator,
    cap: Capability,
) -> Result<User> {
    let (Some(_), Some(user)) = (session.token(), session.user()) else {
        session.clear();
        navigator.go_to(Route::Login);
        return Err(TaskdeskError::NoSession);
    };
    let role = Role::from_id(user.role_id);
    if !role.can(cap) {
        navigator.go_to(Route::Home);
        return Err(TaskdeskError::Forbidden(format!("{role} may not {cap:?}")));
    }
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySession;
    use crate::types::AuthResponse;

    fn session(role_id: u32) -> MemorySession {
        MemorySession::signed_in(AuthResponse {
            token: "t".into(),
            user: User {
                id: "1".into(),
                user_code: "EMP-1".into(),
                email: "a@b.co".into(),
                full_name: "A".into(),
                role_id,
                position_code: None,
                level_code: None,
                created_at: None,
            },
        })
    }

    #[test]
    fn test_paths() {
        assert_eq!(Route::Login.path(), "/login");
        assert_eq!(Route::EditTask("42".into()).path(), "/manage-tasks/edit/42");
        assert_eq!(
            Route::CompleteTask("9".into()).to_string(),
            "/manage-tasks/complete/9"
        );
    }

    #[test]
    fn test_member_menu_only_has_tasks() {
        let items = navigation_items(Role::Member);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "manage-tasks");
        assert_eq!(items[0].route(), Route::ManageTasks);
        assert_eq!(navigation_items(Role::Admin).len(), 3);
    }

    #[test]
    fn test_guard_without_session_redirects_to_login() {
        let s = MemorySession::new();
        let nav = NavigationLog::new();
        let err = guard(&s, &nav, Capability::AddTask).unwrap_err();
        assert!(err.is_auth_failure());
        assert_eq!(nav.routes(), vec![Route::Login]);
    }

    #[test]
    fn test_guard_member_sent_home_from_add_task() {
        let s = session(2);
        let nav = NavigationLog::new();
        assert!(matches!(
            guard(&s, &nav, Capability::AddTask),
            Err(TaskdeskError::Forbidden(_))
        ));
        assert_eq!(nav.last(), Some(Route::Home));
        // The session itself is untouched.
        assert!(s.token().is_some());
    }

    #[test]
    fn test_guard_admin_passes() {
        let s = session(1);
        let nav = NavigationLog::new();
        let user = guard(&s, &nav, Capability::EditProject).unwrap();
        assert_eq!(user.user_code, "EMP-1");
        assert!(nav.routes().is_empty());
    }
}
