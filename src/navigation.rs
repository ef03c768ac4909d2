//! Current-location tracking and hard navigation.
//!
//! SYSTEM CONTEXT
//! ==============
//! The router moves the location through its guard. The API client's 401
//! handler instead performs a hard navigation: the location jumps straight to
//! `/login`, no guard runs, and the process treats it as a full reload.

#[cfg(test)]
#[path = "navigation_test.rs"]
mod navigation_test;

use std::sync::{Arc, Mutex};

use tracing::info;

/// Anything that can force a full navigation.
pub trait Navigator: Send + Sync {
    /// Replace the current location with `href`, bypassing routing guards.
    fn hard_navigate(&self, href: &str);
}

#[derive(Debug)]
struct LocationInner {
    href: String,
    hard_navigations: u64,
}

/// Shared, cloneable current location.
#[derive(Clone, Debug)]
pub struct Location {
    inner: Arc<Mutex<LocationInner>>,
}

impl Location {
    #[must_use]
    pub fn new(href: &str) -> Self {
        Self { inner: Arc::new(Mutex::new(LocationInner { href: href.to_owned(), hard_navigations: 0 })) }
    }

    #[must_use]
    pub fn href(&self) -> String {
        self.lock().href.clone()
    }

    /// Number of hard navigations performed so far.
    #[must_use]
    pub fn hard_navigations(&self) -> u64 {
        self.lock().hard_navigations
    }

    /// Record a guarded, in-app navigation.
    pub(crate) fn push(&self, href: &str) {
        self.lock().href = href.to_owned();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LocationInner> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for Location {
    fn hard_navigate(&self, href: &str) {
        let mut inner = self.lock();
        inner.href = href.to_owned();
        inner.hard_navigations += 1;
        info!(%href, "hard navigation");
    }
}
