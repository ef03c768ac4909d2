//! REST API client for the Is It Live server.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every call made by the stores goes through [`ApiClient::execute`], which
//! applies two interception rules:
//!
//! - outgoing: when durable storage holds a token, add
//!   `Authorization: Bearer <token>`; nothing else about the request changes
//! - incoming: a 401 from any endpoint clears the persisted session, resets
//!   the in-memory session, and hard-navigates to `/login` before the caller
//!   sees the error
//!
//! Endpoint helpers are grouped (`auth`, `sites`, `domains`, `public`) and map
//! 1:1 onto one verb + path each. No retries, batching or caching.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::sync::Arc;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use super::error::ApiError;
use super::transport::{ApiRequest, ApiResponse, Method, Transport};
use super::types::{
    Ack, AuthResponse, Domain, DomainDashboard, DomainId, DomainInput, DomainVerification, LoginRequest,
    RegisterRequest, Site, SiteId, SiteInput, SiteStats, User, UserProfile, UserUpdate,
};
use crate::navigation::Navigator;
use crate::state::session::Session;
use crate::storage::TOKEN_KEY;

/// Where a 401 sends the user.
pub const LOGIN_PATH: &str = "/login";

struct ApiInner {
    transport: Arc<dyn Transport>,
    session: Session,
    navigator: Arc<dyn Navigator>,
}

/// Cloneable handle to the configured API client.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiInner>,
}

impl ApiClient {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, session: Session, navigator: Arc<dyn Navigator>) -> Self {
        Self { inner: Arc::new(ApiInner { transport, session, navigator }) }
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    #[must_use]
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi { client: self }
    }

    #[must_use]
    pub fn sites(&self) -> SitesApi<'_> {
        SitesApi { client: self }
    }

    #[must_use]
    pub fn domains(&self) -> DomainsApi<'_> {
        DomainsApi { client: self }
    }

    #[must_use]
    pub fn public(&self) -> PublicApi<'_> {
        PublicApi { client: self }
    }

    /// Send `request` through the interceptors.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] when no response arrives,
    /// [`ApiError::Unauthorized`] on 401 (after clearing the session), and
    /// [`ApiError::Server`] for any other non-success status.
    pub async fn execute(&self, mut request: ApiRequest) -> Result<ApiResponse, ApiError> {
        if let Some(token) = self.inner.session.storage().get(TOKEN_KEY) {
            request.set_header("Authorization", format!("Bearer {token}"));
        }

        let method = request.method;
        let path = request.path.clone();
        let response = self
            .inner
            .transport
            .send(request)
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if response.is_success() {
            return Ok(response);
        }

        let error = ApiError::from_status(response.status, &response.body);
        if error.is_unauthorized() {
            warn!(method = method.as_str(), %path, "unauthorized response; clearing session");
            self.inner.session.invalidate();
            self.inner.navigator.hard_navigate(LOGIN_PATH);
        }
        Err(error)
    }

    async fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let response = self.execute(request).await?;
        decode(&response.body)
    }

    async fn call_with<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        method: Method,
        path: String,
        body: &B,
    ) -> Result<T, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        self.call(ApiRequest::new(method, path).with_body(value)).await
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// RFC 3986 unreserved characters pass; everything else is escaped.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

fn encode_segment(raw: &str) -> String {
    utf8_percent_encode(raw, SEGMENT).to_string()
}

// =============================================================================
// AUTH
// =============================================================================

pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl AuthApi<'_> {
    /// `POST /auth/register`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`]; also fails if the body does not decode.
    pub async fn register(&self, data: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.client.call_with(Method::Post, "/auth/register".to_owned(), data).await
    }

    /// `POST /auth/login`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`]; also fails if the body does not decode.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.client.call_with(Method::Post, "/auth/login".to_owned(), credentials).await
    }

    /// `GET /user`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`]; also fails if the body does not decode.
    pub async fn get_current_user(&self) -> Result<User, ApiError> {
        self.client.call(ApiRequest::new(Method::Get, "/user")).await
    }

    /// `PUT /user`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`]; also fails if the body does not decode.
    pub async fn update_user(&self, data: &UserUpdate) -> Result<User, ApiError> {
        self.client.call_with(Method::Put, "/user".to_owned(), data).await
    }
}

// =============================================================================
// SITES
// =============================================================================

pub struct SitesApi<'a> {
    client: &'a ApiClient,
}

impl SitesApi<'_> {
    /// `POST /sites`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`]; also fails if the body does not decode.
    pub async fn create_site(&self, data: &SiteInput) -> Result<Site, ApiError> {
        self.client.call_with(Method::Post, "/sites".to_owned(), data).await
    }

    /// `GET /sites`. An empty list may arrive as `null`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`]; also fails if the body does not decode.
    pub async fn get_user_sites(&self) -> Result<Vec<Site>, ApiError> {
        let sites: Option<Vec<Site>> = self.client.call(ApiRequest::new(Method::Get, "/sites")).await?;
        Ok(sites.unwrap_or_default())
    }

    /// `GET /sites/{id}`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`]; also fails if the body does not decode.
    pub async fn get_site(&self, id: SiteId) -> Result<Site, ApiError> {
        self.client.call(ApiRequest::new(Method::Get, format!("/sites/{id}"))).await
    }

    /// `PUT /sites/{id}`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`]; also fails if the body does not decode.
    pub async fn update_site(&self, id: SiteId, data: &SiteInput) -> Result<Site, ApiError> {
        self.client.call_with(Method::Put, format!("/sites/{id}"), data).await
    }

    /// `DELETE /sites/{id}`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn delete_site(&self, id: SiteId) -> Result<Ack, ApiError> {
        self.client.call(ApiRequest::new(Method::Delete, format!("/sites/{id}"))).await
    }

    /// `GET /site/{id}/stats`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`]; also fails if the body does not decode.
    pub async fn get_site_stats(&self, id: SiteId) -> Result<SiteStats, ApiError> {
        self.client.call(ApiRequest::new(Method::Get, format!("/site/{id}/stats"))).await
    }
}

// =============================================================================
// DOMAINS
// =============================================================================

pub struct DomainsApi<'a> {
    client: &'a ApiClient,
}

impl DomainsApi<'_> {
    /// `POST /domains`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`]; also fails if the body does not decode.
    pub async fn create_custom_domain(&self, data: &DomainInput) -> Result<Domain, ApiError> {
        self.client.call_with(Method::Post, "/domains".to_owned(), data).await
    }

    /// `GET /domains`. An empty list may arrive as `null`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`]; also fails if the body does not decode.
    pub async fn get_user_domains(&self) -> Result<Vec<Domain>, ApiError> {
        let domains: Option<Vec<Domain>> = self.client.call(ApiRequest::new(Method::Get, "/domains")).await?;
        Ok(domains.unwrap_or_default())
    }

    /// `DELETE /domains/{id}`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn delete_custom_domain(&self, id: DomainId) -> Result<Ack, ApiError> {
        self.client.call(ApiRequest::new(Method::Delete, format!("/domains/{id}"))).await
    }

    /// `GET /domains/{id}/verify`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`]; also fails if the body does not decode.
    pub async fn verify_custom_domain(&self, id: DomainId) -> Result<DomainVerification, ApiError> {
        self.client.call(ApiRequest::new(Method::Get, format!("/domains/{id}/verify"))).await
    }

    /// `GET /domain/{domain}`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`]; also fails if the body does not decode.
    pub async fn get_domain_dashboard(&self, domain: &str) -> Result<DomainDashboard, ApiError> {
        let path = format!("/domain/{}", encode_segment(domain));
        self.client.call(ApiRequest::new(Method::Get, path)).await
    }
}

// =============================================================================
// PUBLIC
// =============================================================================

pub struct PublicApi<'a> {
    client: &'a ApiClient,
}

impl PublicApi<'_> {
    /// `GET /user/{username}`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`]; also fails if the body does not decode.
    pub async fn get_user_profile(&self, username: &str) -> Result<UserProfile, ApiError> {
        let path = format!("/user/{}", encode_segment(username));
        self.client.call(ApiRequest::new(Method::Get, path)).await
    }
}
