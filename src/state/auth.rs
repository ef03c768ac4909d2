//! Auth store: register, login, session check, account update, logout.
//!
//! SYSTEM CONTEXT
//! ==============
//! Drives the transitions of the shared [`Session`]. The router guard and the
//! API client read the same session, so a successful login here is visible to
//! the next navigation immediately.
//!
//! ERROR HANDLING
//! ==============
//! Register, login and update record a display message in the session's
//! `error` and return the failure. A failed session check is different: it
//! means the token is no good, so the session is dropped and `Ok(None)` is
//! returned without recording anything.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use tracing::{info, warn};

use crate::net::types::{LoginRequest, RegisterRequest, User, UserUpdate};
use crate::net::{ApiClient, ApiError};

use super::session::Session;

#[derive(Clone)]
pub struct AuthStore {
    api: ApiClient,
    session: Session,
}

impl AuthStore {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        let session = api.session().clone();
        Self { api, session }
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.session.user()
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.session.token()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.session.is_loading()
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.session.error()
    }

    /// Create an account and start a session for it.
    ///
    /// # Errors
    ///
    /// Returns the API error after recording it in `error`.
    pub async fn register(&self, username: &str, password: &str, email: &str) -> Result<User, ApiError> {
        let _scope = self.session.begin(true);
        let request = RegisterRequest {
            username: username.to_owned(),
            password: password.to_owned(),
            email: email.to_owned(),
        };
        match self.api.auth().register(&request).await {
            Ok(auth) => {
                self.session.establish(auth.user.clone(), auth.token);
                info!(user_id = auth.user.id, "registered");
                Ok(auth.user)
            }
            Err(e) => Err(self.fail(e, "Registration failed")),
        }
    }

    /// # Errors
    ///
    /// Returns the API error after recording it in `error`.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, ApiError> {
        let _scope = self.session.begin(true);
        let request = LoginRequest { username: username.to_owned(), password: password.to_owned() };
        match self.api.auth().login(&request).await {
            Ok(auth) => {
                self.session.establish(auth.user.clone(), auth.token);
                info!(user_id = auth.user.id, "logged in");
                Ok(auth.user)
            }
            Err(e) => Err(self.fail(e, "Login failed")),
        }
    }

    /// Confirm the held token still works and refresh the user.
    ///
    /// Returns `None` straight away when no token is held. Any failure ends
    /// the session.
    pub async fn check_auth(&self) -> Option<User> {
        if !self.session.is_authenticated() {
            return None;
        }

        let _scope = self.session.begin(false);
        match self.api.auth().get_current_user().await {
            Ok(user) => {
                if self.session.replace_user(user) {
                    self.session.user()
                } else {
                    None
                }
            }
            Err(e) => {
                warn!(error = %e, "session check failed; logging out");
                self.session.invalidate();
                None
            }
        }
    }

    /// Replace the user wholesale with the server's updated record.
    ///
    /// # Errors
    ///
    /// Returns the API error after recording it in `error`.
    pub async fn update_user(&self, data: &UserUpdate) -> Result<User, ApiError> {
        let _scope = self.session.begin(true);
        match self.api.auth().update_user(data).await {
            Ok(user) => {
                self.session.replace_user(user.clone());
                Ok(user)
            }
            Err(e) => Err(self.fail(e, "Failed to update user")),
        }
    }

    /// End the session. Never fails.
    pub fn logout(&self) {
        self.session.invalidate();
        info!("logged out");
    }

    fn fail(&self, err: ApiError, fallback: &str) -> ApiError {
        self.session.record_error(err.display_message(fallback));
        err
    }
}
