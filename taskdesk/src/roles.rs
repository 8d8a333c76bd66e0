//! Named roles and the capabilities each one holds.

use std::fmt;

/// Something a signed-in user may be allowed to see or do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    ViewUsers,
    AddUser,
    ViewProjects,
    AddProject,
    EditProject,
    ViewTasks,
    AddTask,
    EditTask,
}

impl Capability {
    fn is_view(self) -> bool {
        matches!(
            self,
            Capability::ViewUsers | Capability::ViewProjects | Capability::ViewTasks
        )
    }
}

/// Role attached to a user profile. The API identifies roles by number;
/// that mapping lives only in [`Role::from_id`] / [`Role::id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Member,
    /// A role this client has no special rules for.
    Other(u32),
}

impl Role {
    pub fn from_id(id: u32) -> Self {
        match id {
            1 => Role::Admin,
            2 => Role::Member,
            other => Role::Other(other),
        }
    }

    pub fn id(self) -> u32 {
        match self {
            Role::Admin => 1,
            Role::Member => 2,
            Role::Other(id) => id,
        }
    }

    /// Whether this role holds `cap`.
    ///
    /// Members only work their tasks; admins manage everything; unknown
    /// roles may browse every list but change nothing.
    pub fn can(self, cap: Capability) -> bool {
        match self {
            Role::Admin => true,
            Role::Member => cap == Capability::ViewTasks,
            Role::Other(_) => cap.is_view(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Member => write!(f, "member"),
            Role::Other(id) => write!(f, "role#{id}"),
        }
    }
}
