//! Sign-in, registration and sign-out.

use tracing::info;

use crate::client::Taskdesk;
use crate::error::{Result, TaskdeskError};
use crate::forms::LoginForm;
use crate::navigation::Route;
use crate::types::{AuthResponse, RegisterData, User};

impl Taskdesk {
    /// Validate the form, exchange the credentials for a token, store the
    /// session and go home.
    pub async fn login(&self, form: &LoginForm) -> Result<User> {
        let data = form
            .validate()
            .map_err(|errors| TaskdeskError::Validation(errors.into()))?;
        let auth = self.http_client.login(&data).await?;
        self.start_session(auth)
    }

    pub async fn register(&self, data: &RegisterData) -> Result<User> {
        let auth = self.http_client.register(data).await?;
        self.start_session(auth)
    }

    /// Clear the session and return to the login view.
    pub fn logout(&self) {
        if let Some(user) = self.current_user() {
            info!(email = %user.email, "signed out");
        }
        self.expire_session();
    }

    /// Re-read the signed-in profile from the server and store it.
    pub async fn refresh_profile(&self) -> Result<User> {
        let user = self
            .authorized(|client, token| async move { client.current_user(&token).await })
            .await?;
        if let Some(token) = self.session().token() {
            self.session().save(&AuthResponse {
                user: user.clone(),
                token,
            })?;
        }
        Ok(user)
    }

    fn start_session(&self, auth: AuthResponse) -> Result<User> {
        self.session().save(&auth)?;
        info!(email = %auth.user.email, role_id = auth.user.role_id, "signed in");
        self.navigator().go_to(Route::Home);
        Ok(auth.user)
    }
}
