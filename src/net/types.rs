//! Wire records exchanged with the Is It Live API.
//!
//! DESIGN
//! ======
//! The server owns these shapes. Fields the client reads are typed; anything
//! else rides along in `extra` so a wholesale replace never drops data the
//! server sent.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub type UserId = i64;
pub type SiteId = i64;
pub type DomainId = i64;

// =============================================================================
// RECORDS
// =============================================================================

/// Authenticated or public user. Opaque beyond `id` and `username`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A monitored website.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: SiteId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A custom dashboard domain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub id: DomainId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    pub domain: String,
    #[serde(default)]
    pub verified: bool,
    #[serde(rename = "verificationStatus", default, skip_serializing_if = "Option::is_none")]
    pub verification_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Outcome of `GET /domains/{id}/verify`. Only the verification fields are
/// merged into the cached domain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DomainVerification {
    #[serde(default)]
    pub verified: bool,
    #[serde(rename = "verificationStatus", default, skip_serializing_if = "Option::is_none")]
    pub verification_status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// =============================================================================
// STATS & DASHBOARDS
// =============================================================================

/// A single uptime check.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Check {
    pub id: i64,
    pub site_id: SiteId,
    pub status_code: u16,
    /// Response time in milliseconds.
    pub response_time: u64,
    pub is_up: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub checked_at: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UptimeStats {
    pub total_checks: u64,
    pub successful_checks: u64,
    pub uptime_percentage: f64,
    /// Average response time in milliseconds.
    pub average_response_time: u64,
}

/// Response of `GET /site/{id}/stats`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SiteStats {
    pub site: Site,
    #[serde(default)]
    pub current_status: Option<Check>,
    #[serde(default)]
    pub lifetime_stats: UptimeStats,
    #[serde(default)]
    pub last_7_days_stats: UptimeStats,
    #[serde(default)]
    pub last_30_days_stats: UptimeStats,
    #[serde(default)]
    pub last_90_days_stats: UptimeStats,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DashboardOwner {
    pub id: UserId,
    pub username: String,
}

/// Response of `GET /domain/{domain}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DomainDashboard {
    pub domain: String,
    pub user: DashboardOwner,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sites: Vec<Site>,
}

/// Response of `GET /user/{username}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user: User,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sites: Vec<Site>,
}

/// Read a list the server may send as `null` when it is empty.
///
/// # Errors
///
/// Fails when the value is neither `null` nor a list of `T`.
pub fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// REQUEST PAYLOADS
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Partial account update; absent fields are left alone by the server.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteInput {
    pub name: String,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainInput {
    pub domain: String,
}

/// Response of `POST /auth/register` and `POST /auth/login`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

/// Generic acknowledgement body (`{"message": "..."}`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
}
