//! Client configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const API_URL_VAR: &str = "ISITLIVE_API_URL";
pub const STORAGE_PATH_VAR: &str = "ISITLIVE_STORAGE_PATH";

const STORAGE_DIR: &str = ".isitlive";
const STORAGE_FILE: &str = "storage.json";

/// API base URL baked in at build time, if `ISITLIVE_API_URL` was set then.
const BUILD_API_URL: Option<&str> = option_env!("ISITLIVE_API_URL");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// API base address without a trailing slash.
    pub api_url: String,
    /// File backing durable storage (session token and user).
    pub storage_path: PathBuf,
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `ISITLIVE_API_URL`: overrides the build-time base URL
    /// - `ISITLIVE_STORAGE_PATH`: default `$HOME/.isitlive/storage.json`
    #[must_use]
    pub fn from_env() -> Self {
        let api_url = resolve_api_url(std::env::var(API_URL_VAR).ok().as_deref(), BUILD_API_URL);
        let storage_path = std::env::var(STORAGE_PATH_VAR)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| default_storage_path(std::env::var("HOME").ok().as_deref()), PathBuf::from);

        Self { api_url, storage_path }
    }

    /// Replace the base URL (e.g. from a `--api-url` flag).
    #[must_use]
    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = normalize_base_url(api_url);
        self
    }

    #[must_use]
    pub fn with_storage_path(mut self, path: PathBuf) -> Self {
        self.storage_path = path;
        self
    }
}

fn resolve_api_url(runtime: Option<&str>, build_time: Option<&str>) -> String {
    let raw = runtime
        .filter(|v| !v.trim().is_empty())
        .or(build_time.filter(|v| !v.trim().is_empty()))
        .unwrap_or(DEFAULT_API_URL);
    normalize_base_url(raw)
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

fn default_storage_path(home: Option<&str>) -> PathBuf {
    let base = home
        .filter(|h| !h.is_empty())
        .map_or_else(|| PathBuf::from("."), PathBuf::from);
    base.join(STORAGE_DIR).join(STORAGE_FILE)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
