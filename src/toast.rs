//! Notification dispatcher.
//!
//! SYSTEM CONTEXT
//! ==============
//! Stores and the CLI raise short-lived notifications through one process-wide
//! [`ToastDispatcher`]. Whatever renders them (the terminal container in the
//! binary, a [`ToastQueue`] in tests) registers itself as the single
//! [`ToastContainer`]; the last registration wins.
//!
//! DESIGN
//! ======
//! Dispatches that arrive before any container is registered are not lost.
//! They are logged, parked in a bounded pending queue, and handed to the
//! container when it registers. The caller still gets `None` for those, since
//! no id exists yet.
//!
//! TRADE-OFFS
//! ==========
//! The pending queue drops its oldest entry once full. A long run with no
//! container only keeps the most recent notifications.

#[cfg(test)]
#[path = "toast_test.rs"]
mod toast_test;

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

pub const DEFAULT_DURATION: Duration = Duration::from_millis(5000);

/// Notifications parked before registration.
pub const MAX_PENDING: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToastOptions {
    pub title: String,
    pub message: String,
    pub kind: ToastKind,
    /// Time on screen. Zero keeps the toast until it is removed.
    pub duration: Duration,
}

impl ToastOptions {
    #[must_use]
    pub fn new(kind: ToastKind, title: impl Into<String>) -> Self {
        Self { title: title.into(), message: String::new(), kind, duration: DEFAULT_DURATION }
    }

    #[must_use]
    pub fn success(title: impl Into<String>) -> Self {
        Self::new(ToastKind::Success, title)
    }

    #[must_use]
    pub fn error(title: impl Into<String>) -> Self {
        Self::new(ToastKind::Error, title)
    }

    #[must_use]
    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(ToastKind::Warning, title)
    }

    #[must_use]
    pub fn info(title: impl Into<String>) -> Self {
        Self::new(ToastKind::Info, title)
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ToastId(Uuid);

impl ToastId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ToastId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Anything that can display toasts.
pub trait ToastContainer: Send + Sync {
    fn add_toast(&self, options: ToastOptions) -> ToastId;
    fn remove_toast(&self, id: ToastId);
}

// =============================================================================
// STOCK CONTAINER
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub options: ToastOptions,
    pub shown_at: Instant,
}

impl Toast {
    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        !self.options.duration.is_zero() && now.saturating_duration_since(self.shown_at) >= self.options.duration
    }
}

/// In-memory container holding visible toasts in arrival order.
#[derive(Debug, Default)]
pub struct ToastQueue {
    toasts: Mutex<Vec<Toast>>,
}

impl ToastQueue {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    #[must_use]
    pub fn active(&self) -> Vec<Toast> {
        self.lock().clone()
    }

    /// Drop every toast whose duration has elapsed at `now`. Returns how many
    /// were dropped.
    pub fn prune(&self, now: Instant) -> usize {
        let mut toasts = self.lock();
        let before = toasts.len();
        toasts.retain(|t| !t.is_expired(now));
        before - toasts.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Toast>> {
        self.toasts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl ToastContainer for ToastQueue {
    fn add_toast(&self, options: ToastOptions) -> ToastId {
        let id = ToastId::new();
        self.lock().push(Toast { id, options, shown_at: Instant::now() });
        id
    }

    fn remove_toast(&self, id: ToastId) {
        self.lock().retain(|t| t.id != id);
    }
}

// =============================================================================
// DISPATCHER
// =============================================================================

#[derive(Default)]
struct Slot {
    container: Option<Arc<dyn ToastContainer>>,
    pending: VecDeque<ToastOptions>,
}

#[derive(Default)]
pub struct ToastDispatcher {
    slot: Mutex<Slot>,
}

impl ToastDispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `container` the display target and flush anything queued before
    /// it arrived. Replaces any previous container.
    ///
    /// The flush runs under the slot lock, so queued toasts reach the
    /// container ahead of any concurrent [`ToastDispatcher::show`]. A
    /// container must not call back into the dispatcher from `add_toast`.
    pub fn register(&self, container: Arc<dyn ToastContainer>) {
        let mut slot = self.lock();
        let pending = std::mem::take(&mut slot.pending);
        if !pending.is_empty() {
            debug!(count = pending.len(), "flushing queued toasts");
        }
        for options in pending {
            container.add_toast(options);
        }
        slot.container = Some(container);
    }

    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.lock().container.is_some()
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.lock().pending.len()
    }

    /// Show a toast. `None` means no container was registered yet and the
    /// toast was queued.
    pub fn show(&self, options: ToastOptions) -> Option<ToastId> {
        let container = {
            let mut slot = self.lock();
            let Some(container) = slot.container.clone() else {
                warn!(title = %options.title, "toast container not registered; queueing");
                if slot.pending.len() == MAX_PENDING {
                    slot.pending.pop_front();
                }
                slot.pending.push_back(options);
                return None;
            };
            container
        };
        Some(container.add_toast(options))
    }

    /// Success toast with an empty message and the default duration. Use
    /// [`ToastDispatcher::show`] with [`ToastOptions`] to set either.
    pub fn success(&self, title: &str) -> Option<ToastId> {
        self.show(ToastOptions::success(title))
    }

    pub fn error(&self, title: &str) -> Option<ToastId> {
        self.show(ToastOptions::error(title))
    }

    pub fn warning(&self, title: &str) -> Option<ToastId> {
        self.show(ToastOptions::warning(title))
    }

    pub fn info(&self, title: &str) -> Option<ToastId> {
        self.show(ToastOptions::info(title))
    }

    pub fn remove(&self, id: ToastId) {
        let container = self.lock().container.clone();
        match container {
            Some(container) => container.remove_toast(id),
            None => warn!(%id, "toast container not registered; nothing to remove"),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Slot> {
        self.slot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
