//! Domains store: the user's custom dashboard domains.
//!
//! Same action contract as the sites store. Verification is the one partial
//! update in the system: only `verified` and `verificationStatus` are merged
//! into the cached record.

#[cfg(test)]
#[path = "domains_test.rs"]
mod domains_test;

use crate::net::types::{Domain, DomainId, DomainInput, DomainVerification};
use crate::net::{ApiClient, ApiError};

use super::resource::{ResourceCell, ResourceState};

pub type DomainsState = ResourceState<Domain>;

#[derive(Clone)]
pub struct DomainsStore {
    api: ApiClient,
    cell: ResourceCell<Domain>,
}

impl DomainsStore {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api, cell: ResourceCell::default() }
    }

    #[must_use]
    pub fn snapshot(&self) -> DomainsState {
        self.cell.snapshot()
    }

    #[must_use]
    pub fn domains(&self) -> Vec<Domain> {
        self.cell.read(|s| s.items.clone())
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.cell.read(|s| s.loading)
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.cell.read(|s| s.error.clone())
    }

    /// # Errors
    ///
    /// Returns the API error after recording it in `error`.
    pub async fn fetch_domains(&self) -> Result<Vec<Domain>, ApiError> {
        let _scope = self.cell.begin();
        match self.api.domains().get_user_domains().await {
            Ok(domains) => {
                self.cell.update(|s| s.replace_all(domains.clone()));
                Ok(domains)
            }
            Err(e) => Err(self.cell.fail(e, "Failed to fetch domains")),
        }
    }

    /// # Errors
    ///
    /// Returns the API error after recording it in `error`.
    pub async fn create_domain(&self, data: &DomainInput) -> Result<Domain, ApiError> {
        let _scope = self.cell.begin();
        match self.api.domains().create_custom_domain(data).await {
            Ok(domain) => {
                self.cell.update(|s| s.append(domain.clone()));
                Ok(domain)
            }
            Err(e) => Err(self.cell.fail(e, "Failed to create domain")),
        }
    }

    /// Ask the server to re-check DNS, then merge the verification fields
    /// into the cached domain. Other fields are left as they were.
    ///
    /// # Errors
    ///
    /// Returns the API error after recording it in `error`.
    pub async fn verify_domain(&self, id: DomainId) -> Result<DomainVerification, ApiError> {
        let _scope = self.cell.begin();
        match self.api.domains().verify_custom_domain(id).await {
            Ok(verification) => {
                self.cell.update(|s| {
                    s.merge_by_id(id, |domain| {
                        domain.verified = verification.verified;
                        domain.verification_status.clone_from(&verification.verification_status);
                    })
                });
                Ok(verification)
            }
            Err(e) => Err(self.cell.fail(e, "Failed to verify domain")),
        }
    }

    /// # Errors
    ///
    /// Returns the API error after recording it in `error`.
    pub async fn delete_domain(&self, id: DomainId) -> Result<(), ApiError> {
        let _scope = self.cell.begin();
        match self.api.domains().delete_custom_domain(id).await {
            Ok(_) => {
                self.cell.update(|s| s.remove_by_id(id));
                Ok(())
            }
            Err(e) => Err(self.cell.fail(e, "Failed to delete domain")),
        }
    }
}
