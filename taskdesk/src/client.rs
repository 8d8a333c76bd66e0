use std::future::Future;
use std::sync::Arc;

use tracing::warn;

use crate::config::TaskdeskConfig;
use crate::controller::{FetchFn, FetchFuture, ListController, ListOptions};
use crate::error::{Result, TaskdeskError};
use crate::navigation::{navigation_items, NavItem, Navigator, Route};
use crate::rest::TaskdeskHttpClient;
use crate::roles::Role;
use crate::session::SessionStore;
use crate::types::{PageRequest, PageResult, User};

/// Main client for the admin panel.
///
/// Bundles the REST client with the session store and navigator every
/// screen needs. Cheap to clone.
#[derive(Clone)]
pub struct Taskdesk {
    /// Tunables shared by all screens.
    pub config: TaskdeskConfig,
    /// HTTP client.
    pub http_client: TaskdeskHttpClient,
    session: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl Taskdesk {
    pub fn new(
        config: TaskdeskConfig,
        session: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let http_client = TaskdeskHttpClient::new(&config.api_url);
        Self {
            config,
            http_client,
            session,
            navigator,
        }
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    /// Signed-in user, if any.
    pub fn current_user(&self) -> Option<User> {
        self.session.user()
    }

    pub fn role(&self) -> Option<Role> {
        self.session.role()
    }

    /// Menu entries for the signed-in user; empty when signed out.
    pub fn navigation(&self) -> Vec<NavItem> {
        self.role().map(navigation_items).unwrap_or_default()
    }

    /// Drop the session and return to the login view.
    pub(crate) fn expire_session(&self) {
        self.session.clear();
        self.navigator.go_to(Route::Login);
    }

    /// Run an authenticated call. A missing or rejected token expires the
    /// session.
    pub(crate) async fn authorized<R, F, Fut>(&self, call: F) -> Result<R>
    where
        F: FnOnce(TaskdeskHttpClient, String) -> Fut,
        Fut: Future<Output = Result<R>>,
    {
        let Some(token) = self.session.token() else {
            self.expire_session();
            return Err(TaskdeskError::NoSession);
        };
        let out = call(self.http_client.clone(), token).await;
        if let Err(e) = &out {
            if e.is_auth_failure() {
                warn!("token rejected, signing out");
                self.expire_session();
            }
        }
        out
    }

    pub(crate) fn list_options(&self, extra_filter: Option<String>) -> ListOptions {
        ListOptions {
            page_size: self.config.page_size,
            debounce: self.config.debounce,
            extra_filter,
        }
    }

    /// Mount a list view whose pages come from `call`. The token is read
    /// from the session at fetch time.
    pub(crate) fn mount_list<T, F, Fut>(
        &self,
        extra_filter: Option<String>,
        call: F,
    ) -> ListController<T>
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(TaskdeskHttpClient, String, PageRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<PageResult<T>>> + Send + 'static,
    {
        let client = self.http_client.clone();
        let session = Arc::clone(&self.session);
        let fetch: Arc<FetchFn<T>> = Arc::new(move |req: PageRequest| -> FetchFuture<T> {
            match session.token() {
                Some(token) => Box::pin(call(client.clone(), token, req)),
                None => Box::pin(async { Err(TaskdeskError::NoSession) }),
            }
        });
        ListController::mount(
            fetch,
            Arc::clone(&self.session),
            Arc::clone(&self.navigator),
            self.list_options(extra_filter),
        )
    }
}

impl std::fmt::Debug for Taskdesk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Taskdesk")
            .field("config", &self.config)
            .field("signed_in", &self.session.token().is_some())
            .finish()
    }
}
