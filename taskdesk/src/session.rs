//! Session context: the bearer token and cached profile of the signed-in
//! user.
//!
//! Screens and controllers receive a `SessionStore` explicitly; nothing in
//! the crate reads session state from a global.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::{debug, warn};

use crate::error::Result;
use crate::roles::Role;
use crate::types::{AuthResponse, User};

/// Storage for the authenticated session.
pub trait SessionStore: Send + Sync {
    /// Bearer token, if signed in.
    fn token(&self) -> Option<String>;

    /// Cached profile of the signed-in user.
    fn user(&self) -> Option<User>;

    /// Persist a fresh login.
    fn save(&self, auth: &AuthResponse) -> Result<()>;

    /// Forget token and profile.
    fn clear(&self);

    /// Role of the cached profile.
    fn role(&self) -> Option<Role> {
        self.user().map(|u| Role::from_id(u.role_id))
    }
}

/// In-process session, lost when the process exits.
#[derive(Debug, Default)]
pub struct MemorySession {
    inner: RwLock<Option<AuthResponse>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(auth: AuthResponse) -> Self {
        Self {
            inner: RwLock::new(Some(auth)),
        }
    }

    fn read(&self) -> Option<AuthResponse> {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl SessionStore for MemorySession {
    fn token(&self) -> Option<String> {
        self.read().map(|a| a.token)
    }

    fn user(&self) -> Option<User> {
        self.read().map(|a| a.user)
    }

    fn save(&self, auth: &AuthResponse) -> Result<()> {
        *self.inner.write().unwrap_or_else(|e| e.into_inner()) = Some(auth.clone());
        Ok(())
    }

    fn clear(&self) {
        *self.inner.write().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

/// Session persisted as JSON on disk so it survives between CLI runs.
///
/// A missing, unreadable or corrupt file reads as "signed out".
#[derive(Debug, Clone)]
pub struct FileSession {
    path: PathBuf,
}

impl FileSession {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Option<AuthResponse> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "session file unreadable");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(auth) => Some(auth),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "session file corrupt");
                None
            }
        }
    }
}

impl SessionStore for FileSession {
    fn token(&self) -> Option<String> {
        self.load().map(|a| a.token)
    }

    fn user(&self) -> Option<User> {
        self.load().map(|a| a.user)
    }

    fn save(&self, auth: &AuthResponse) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(auth)?)?;
        debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "session cleared"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "failed to clear session"),
        }
    }
}
