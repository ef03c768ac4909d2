//! Error taxonomy for API calls.
//!
//! Four kinds reach callers:
//! - transport failures (no response at all)
//! - server-reported failures, carrying the body's `error` field when present
//! - unauthorized responses, which the client has already acted on globally
//! - bodies that did not decode into the expected record (or payloads that
//!   did not encode)
//!
//! Stores render these through [`ApiError::display_message`], which prefers
//! the server's own wording over a per-action fallback.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server answered with a non-success status other than 401.
    #[error("server returned {status}{}", suffix(.message))]
    Server { status: u16, message: Option<String> },

    /// The server answered 401. Session state has already been cleared.
    #[error("unauthorized{}", suffix(.message))]
    Unauthorized { message: Option<String> },

    /// The response body did not match the expected shape.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// The request payload could not be serialized.
    #[error("request encode failed: {0}")]
    Encode(String),
}

impl ApiError {
    /// Build the error for a non-success response, extracting the server's
    /// `{"error": "..."}` message when the body carries one.
    #[must_use]
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = server_message(body);
        if status == 401 {
            Self::Unauthorized { message }
        } else {
            Self::Server { status, message }
        }
    }

    /// Message supplied by the server, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Server { message, .. } | Self::Unauthorized { message } => message.as_deref(),
            Self::Transport(_) | Self::Decode(_) | Self::Encode(_) => None,
        }
    }

    /// Display-ready text: the server's message, else `fallback`.
    #[must_use]
    pub fn display_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_owned()
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            Self::Unauthorized { .. } => Some(401),
            Self::Transport(_) | Self::Decode(_) | Self::Encode(_) => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

fn suffix(message: &Option<String>) -> String {
    message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

fn server_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty())
}
