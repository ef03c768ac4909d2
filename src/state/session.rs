//! Session context: the client-held proof of identity.
//!
//! DESIGN
//! ======
//! One `Session` is constructed at startup by [`Session::restore`] and cloned
//! into everything that needs it (API client, auth store, router). It lives
//! for the whole process.
//!
//! The lifecycle is an explicit state machine:
//!
//! ```text
//! Anonymous ──login/register──▶ Authenticating(None) ──ok──▶ Authenticated
//!     ▲                                 │ err                    │
//!     │                                 ▼                        │ check/update
//!     └──────── logout / 401 ─── (back to prior) ◀── Authenticating(Some(prior))
//! ```
//!
//! `Authenticating` keeps the prior identity so a session check in flight
//! does not flip `is_authenticated`. Every transition happens under one lock.
//!
//! Token and user are persisted under separate storage keys. Hydration treats
//! a missing or unparsable user as absent; a token alone still counts as
//! authenticated.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::net::types::User;
use crate::storage::{Storage, TOKEN_KEY, USER_KEY};

/// A held bearer token and, when known, the user it belongs to.
#[derive(Clone, Debug, PartialEq)]
pub struct Identity {
    pub user: Option<User>,
    pub token: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum SessionState {
    #[default]
    Anonymous,
    /// An auth action is in flight; carries the identity held before it began.
    Authenticating(Option<Identity>),
    Authenticated(Identity),
}

impl SessionState {
    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Anonymous | Self::Authenticating(None) => None,
            Self::Authenticating(Some(identity)) | Self::Authenticated(identity) => Some(identity),
        }
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.identity().map(|i| i.token.as_str())
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.identity().and_then(|i| i.user.as_ref())
    }

    /// True exactly when a token is held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Authenticating(_))
    }
}

#[derive(Debug, Default)]
struct SessionSlot {
    state: SessionState,
    error: Option<String>,
}

struct SessionInner {
    slot: Mutex<SessionSlot>,
    storage: Arc<dyn Storage>,
}

/// Shared session context.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").field("state", &self.snapshot()).finish_non_exhaustive()
    }
}

impl Session {
    /// Build the session, re-hydrating token and user from `storage`.
    #[must_use]
    pub fn restore(storage: Arc<dyn Storage>) -> Self {
        let state = hydrate(storage.as_ref());
        debug!(authenticated = state.is_authenticated(), "session restored");
        Self { inner: Arc::new(SessionInner { slot: Mutex::new(SessionSlot { state, error: None }), storage }) }
    }

    /// Durable storage backing this session.
    #[must_use]
    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.inner.storage
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.lock().state.clone()
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.lock().state.token().map(str::to_owned)
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.lock().state.user().cloned()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.lock().state.is_authenticated()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.lock().state.is_loading()
    }

    /// Last recorded auth-action failure.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    /// Drop both persisted entries and return to `Anonymous`. Never fails;
    /// storage errors are logged.
    pub fn invalidate(&self) {
        let mut slot = self.lock();
        slot.state = SessionState::Anonymous;
        remove_logged(self.inner.storage.as_ref(), USER_KEY);
        remove_logged(self.inner.storage.as_ref(), TOKEN_KEY);
    }

    // =========================================================================
    // TRANSITIONS (driven by the auth store)
    // =========================================================================

    /// Enter `Authenticating`, keeping the current identity as the fallback.
    /// The returned scope restores that identity on drop unless the action
    /// settled the session first.
    pub(crate) fn begin(&self, clear_error: bool) -> AuthScope {
        let mut slot = self.lock();
        let prior = slot.state.identity().cloned();
        slot.state = SessionState::Authenticating(prior);
        if clear_error {
            slot.error = None;
        }
        AuthScope { session: self.clone() }
    }

    /// Set and persist a fresh identity.
    pub(crate) fn establish(&self, user: User, token: String) {
        let mut slot = self.lock();
        persist_user(self.inner.storage.as_ref(), &user);
        if let Err(e) = self.inner.storage.set(TOKEN_KEY, &token) {
            warn!(error = %e, "failed to persist session token");
        }
        slot.state = SessionState::Authenticated(Identity { user: Some(user), token });
    }

    /// Replace the user of the held identity. Returns `false` when no token
    /// is held anymore (e.g. a 401 invalidated the session meanwhile).
    pub(crate) fn replace_user(&self, user: User) -> bool {
        let mut slot = self.lock();
        let Some(token) = slot.state.token().map(str::to_owned) else {
            warn!("user refresh arrived after the session was cleared; ignoring");
            return false;
        };
        persist_user(self.inner.storage.as_ref(), &user);
        slot.state = SessionState::Authenticated(Identity { user: Some(user), token });
        true
    }

    pub(crate) fn record_error(&self, message: String) {
        self.lock().error = Some(message);
    }

    fn settle(&self) {
        let mut slot = self.lock();
        if slot.state.is_loading() {
            slot.state = match std::mem::take(&mut slot.state) {
                SessionState::Authenticating(Some(prior)) => SessionState::Authenticated(prior),
                _ => SessionState::Anonymous,
            };
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionSlot> {
        self.inner
            .slot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Guard for one in-flight auth action. Leaves `Authenticating` on drop.
pub(crate) struct AuthScope {
    session: Session,
}

impl Drop for AuthScope {
    fn drop(&mut self) {
        self.session.settle();
    }
}

fn hydrate(storage: &dyn Storage) -> SessionState {
    let token = storage.get(TOKEN_KEY).filter(|t| !t.is_empty());
    let user = storage.get(USER_KEY).and_then(|raw| match serde_json::from_str::<Option<User>>(&raw) {
        Ok(user) => user,
        Err(e) => {
            warn!(error = %e, "stored user unreadable; ignoring");
            None
        }
    });

    match token {
        Some(token) => SessionState::Authenticated(Identity { user, token }),
        None => SessionState::Anonymous,
    }
}

fn persist_user(storage: &dyn Storage, user: &User) {
    match serde_json::to_string(user) {
        Ok(json) => {
            if let Err(e) = storage.set(USER_KEY, &json) {
                warn!(error = %e, "failed to persist session user");
            }
        }
        Err(e) => warn!(error = %e, "failed to serialize session user"),
    }
}

fn remove_logged(storage: &dyn Storage, key: &str) {
    if let Err(e) = storage.remove(key) {
        warn!(error = %e, key, "failed to clear session entry");
    }
}
