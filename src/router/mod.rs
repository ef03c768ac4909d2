//! Client router: route table, guard, and the navigation loop.
//!
//! SYSTEM CONTEXT
//! ==============
//! `Router::push` is the only soft navigation path. It resolves the target
//! against the static table, sets the page title, asks the guard, and follows
//! redirects until a route is allowed. The API client's 401 handler does not
//! come through here; it hard-navigates the shared [`Location`] directly.
//!
//! DESIGN
//! ======
//! The guard reads authentication from the shared [`Session`] at the moment
//! of each hop, so a login that completes between two pushes is seen by the
//! second one. Redirect chains are capped at [`MAX_REDIRECTS`] hops.

pub mod guard;
pub mod table;


use std::sync::Mutex;

use tracing::{debug, info};

use crate::navigation::Location;
use crate::state::Session;

pub use guard::{APP_NAME, GuardDecision, evaluate, page_title};
pub use table::{ROUTES, ResolvedRoute, RouteMeta, RouteName, resolve};

/// Redirect hops allowed before a push is abandoned.
pub const MAX_REDIRECTS: usize = 8;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RouterError {
    #[error("redirect loop navigating to {from} (last hop {last})")]
    RedirectLoop { from: String, last: String },
}

/// Result of a completed push.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Navigation {
    pub route: ResolvedRoute,
    /// The originally requested href when the guard redirected.
    pub redirected_from: Option<String>,
    pub title: String,
}

#[derive(Debug, Default)]
struct RouterState {
    current: Option<ResolvedRoute>,
    title: String,
    scroll_top: u32,
}

pub struct Router {
    session: Session,
    location: Location,
    state: Mutex<RouterState>,
}

impl Router {
    #[must_use]
    pub fn new(session: Session, location: Location) -> Self {
        Self { session, location, state: Mutex::new(RouterState::default()) }
    }

    #[must_use]
    pub fn location(&self) -> &Location {
        &self.location
    }

    #[must_use]
    pub fn current(&self) -> Option<ResolvedRoute> {
        self.lock().current.clone()
    }

    #[must_use]
    pub fn title(&self) -> String {
        self.lock().title.clone()
    }

    #[must_use]
    pub fn scroll_top(&self) -> u32 {
        self.lock().scroll_top
    }

    pub fn scroll_to(&self, offset: u32) {
        self.lock().scroll_top = offset;
    }

    /// Navigate to `href`, following guard redirects.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::RedirectLoop`] when the guard keeps redirecting
    /// past [`MAX_REDIRECTS`] hops. Nothing is committed in that case.
    pub fn push(&self, href: &str) -> Result<Navigation, RouterError> {
        let mut target = href.to_owned();
        let mut redirected_from = None;

        for _ in 0..=MAX_REDIRECTS {
            let route = resolve(&target);
            let title = page_title(&route);
            self.lock().title.clone_from(&title);

            match evaluate(&route, self.session.is_authenticated()) {
                GuardDecision::Allow => {
                    self.commit(&route, &title);
                    info!(route = route.name.as_str(), path = %route.full_path, "navigated");
                    return Ok(Navigation { route, redirected_from, title });
                }
                GuardDecision::Redirect(next) => {
                    debug!(from = %route.full_path, to = %next, "guard redirect");
                    redirected_from.get_or_insert_with(|| href.to_owned());
                    target = next;
                }
            }
        }

        Err(RouterError::RedirectLoop { from: href.to_owned(), last: target })
    }

    /// Re-run the guard on wherever the location currently points, e.g. after
    /// a hard navigation moved it underneath the router.
    ///
    /// # Errors
    ///
    /// See [`Router::push`].
    pub fn sync_with_location(&self) -> Result<Navigation, RouterError> {
        self.push(&self.location.href())
    }

    fn commit(&self, route: &ResolvedRoute, title: &str) {
        {
            let mut state = self.lock();
            state.current = Some(route.clone());
            title.clone_into(&mut state.title);
            state.scroll_top = 0;
        }
        self.location.push(&route.full_path);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RouterState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
