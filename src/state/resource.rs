//! Shared bookkeeping for resource stores (sites, domains).
//!
//! DESIGN
//! ======
//! Each store owns a [`ResourceState`]: an ordered list, an optional current
//! selection, a loading flag and the last error. Every action follows the
//! same contract:
//!
//! 1. [`ResourceCell::begin`] clears `error` and sets `loading`.
//! 2. Exactly one API call runs; the lock is never held across it.
//! 3. On success the list is reconciled; on failure the display message is
//!    written to `error` *and* the error is returned.
//! 4. Dropping the [`ActionScope`] clears `loading`, whatever happened.
//!
//! TRADE-OFFS
//! ==========
//! `loading` is a single flag. Two overlapping actions on one store race on
//! it: whichever finishes first clears it while the other is still in
//! flight. Requests are not deduplicated either; results reconcile in
//! completion order.

#[cfg(test)]
#[path = "resource_test.rs"]
mod resource_test;

use std::sync::{Arc, Mutex, MutexGuard};

use crate::net::ApiError;

/// Records addressable by a server-assigned numeric id.
pub trait Keyed {
    fn key(&self) -> i64;
}

impl Keyed for crate::net::types::Site {
    fn key(&self) -> i64 {
        self.id
    }
}

impl Keyed for crate::net::types::Domain {
    fn key(&self) -> i64 {
        self.id
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResourceState<T> {
    /// Creation/fetch order. Duplicate ids are not prevented.
    pub items: Vec<T>,
    pub current: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self { items: Vec::new(), current: None, loading: false, error: None }
    }
}

impl<T: Keyed + Clone> ResourceState<T> {
    /// Overwrite the whole list with a fresh fetch.
    pub fn replace_all(&mut self, items: Vec<T>) {
        self.items = items;
    }

    pub fn append(&mut self, item: T) {
        self.items.push(item);
    }

    /// Replace the first element with `id` wholesale, and `current` if it
    /// has that id. An id missing from the list is left alone: no insert,
    /// no error. Returns whether a list element was replaced.
    pub fn replace_by_id(&mut self, id: i64, item: T) -> bool {
        if self.current.as_ref().is_some_and(|c| c.key() == id) {
            self.current = Some(item.clone());
        }
        match self.items.iter_mut().find(|existing| existing.key() == id) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    /// Apply `patch` to the first element with `id`. No-op if absent.
    pub fn merge_by_id(&mut self, id: i64, patch: impl FnOnce(&mut T)) -> bool {
        match self.items.iter_mut().find(|existing| existing.key() == id) {
            Some(slot) => {
                patch(slot);
                true
            }
            None => false,
        }
    }

    /// Drop every element with `id` and clear `current` iff it matches.
    /// Returns how many list elements were removed.
    pub fn remove_by_id(&mut self, id: i64) -> usize {
        let before = self.items.len();
        self.items.retain(|existing| existing.key() != id);
        if self.current.as_ref().is_some_and(|c| c.key() == id) {
            self.current = None;
        }
        before - self.items.len()
    }
}

/// Shared, lock-protected store state.
pub(crate) struct ResourceCell<T> {
    inner: Arc<Mutex<ResourceState<T>>>,
}

impl<T> Clone for ResourceCell<T> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<T> Default for ResourceCell<T> {
    fn default() -> Self {
        Self { inner: Arc::new(Mutex::new(ResourceState::default())) }
    }
}

impl<T> ResourceCell<T> {
    /// Start an action: reset `error`, raise `loading`.
    pub(crate) fn begin(&self) -> ActionScope<T> {
        {
            let mut state = self.lock();
            state.error = None;
            state.loading = true;
        }
        ActionScope { cell: self.clone() }
    }

    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut ResourceState<T>) -> R) -> R {
        f(&mut self.lock())
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&ResourceState<T>) -> R) -> R {
        f(&self.lock())
    }

    /// Record `err` for passive display and hand it back for propagation.
    pub(crate) fn fail(&self, err: ApiError, fallback: &str) -> ApiError {
        let message = err.display_message(fallback);
        tracing::debug!(error = %err, %message, "store action failed");
        self.lock().error = Some(message);
        err
    }

    fn lock(&self) -> MutexGuard<'_, ResourceState<T>> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl<T: Clone> ResourceCell<T> {
    pub(crate) fn snapshot(&self) -> ResourceState<T> {
        self.lock().clone()
    }
}

/// Clears `loading` when dropped.
pub(crate) struct ActionScope<T> {
    cell: ResourceCell<T>,
}

impl<T> Drop for ActionScope<T> {
    fn drop(&mut self) {
        self.cell.lock().loading = false;
    }
}
