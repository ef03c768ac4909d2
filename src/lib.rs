//! Is It Live client.
//!
//! SYSTEM CONTEXT
//! ==============
//! Client-side half of the "Is It Live" uptime monitor: session lifecycle,
//! authenticated request interception, site/domain caches, the navigation
//! guard, and the notification dispatcher. The `isitlive` binary drives all of
//! it from the terminal.
//!
//! Wiring order at startup:
//!
//! 1. `AppConfig::from_env` resolves the API base URL and storage path.
//! 2. `Session::restore` re-hydrates the session from durable storage.
//! 3. `ApiClient` is built over a `Transport`, the session and a `Navigator`.
//! 4. Stores and the `Router` are handed clones of the session/client.

pub mod config;
pub mod navigation;
pub mod net;
pub mod router;
pub mod state;
pub mod storage;
pub mod toast;
