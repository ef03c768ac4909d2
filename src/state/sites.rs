//! Sites store: cached list of the user's monitored sites.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by the dashboard (list) and site detail (current site, stats). Each
//! action follows the contract in [`super::resource`].

#[cfg(test)]
#[path = "sites_test.rs"]
mod sites_test;

use crate::net::types::{Site, SiteId, SiteInput, SiteStats};
use crate::net::{ApiClient, ApiError};

use super::resource::{ResourceCell, ResourceState};

pub type SitesState = ResourceState<Site>;

#[derive(Clone)]
pub struct SitesStore {
    api: ApiClient,
    cell: ResourceCell<Site>,
}

impl SitesStore {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api, cell: ResourceCell::default() }
    }

    #[must_use]
    pub fn snapshot(&self) -> SitesState {
        self.cell.snapshot()
    }

    #[must_use]
    pub fn sites(&self) -> Vec<Site> {
        self.cell.read(|s| s.items.clone())
    }

    #[must_use]
    pub fn current_site(&self) -> Option<Site> {
        self.cell.read(|s| s.current.clone())
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.cell.read(|s| s.loading)
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.cell.read(|s| s.error.clone())
    }

    /// Replace the cached list with the server's.
    ///
    /// # Errors
    ///
    /// Returns the API error after recording it in `error`.
    pub async fn fetch_sites(&self) -> Result<Vec<Site>, ApiError> {
        let _scope = self.cell.begin();
        match self.api.sites().get_user_sites().await {
            Ok(sites) => {
                self.cell.update(|s| s.replace_all(sites.clone()));
                Ok(sites)
            }
            Err(e) => Err(self.cell.fail(e, "Failed to fetch sites")),
        }
    }

    /// Load one site into `current`.
    ///
    /// # Errors
    ///
    /// Returns the API error after recording it in `error`.
    pub async fn fetch_site(&self, id: SiteId) -> Result<Site, ApiError> {
        let _scope = self.cell.begin();
        match self.api.sites().get_site(id).await {
            Ok(site) => {
                self.cell.update(|s| s.current = Some(site.clone()));
                Ok(site)
            }
            Err(e) => Err(self.cell.fail(e, "Failed to fetch site")),
        }
    }

    /// Fetch uptime stats. The cached list is not touched.
    ///
    /// # Errors
    ///
    /// Returns the API error after recording it in `error`.
    pub async fn fetch_site_stats(&self, id: SiteId) -> Result<SiteStats, ApiError> {
        let _scope = self.cell.begin();
        self.api
            .sites()
            .get_site_stats(id)
            .await
            .map_err(|e| self.cell.fail(e, "Failed to fetch site stats"))
    }

    /// Create a site and append the server's record.
    ///
    /// # Errors
    ///
    /// Returns the API error after recording it in `error`.
    pub async fn create_site(&self, data: &SiteInput) -> Result<Site, ApiError> {
        let _scope = self.cell.begin();
        match self.api.sites().create_site(data).await {
            Ok(site) => {
                self.cell.update(|s| s.append(site.clone()));
                Ok(site)
            }
            Err(e) => Err(self.cell.fail(e, "Failed to create site")),
        }
    }

    /// Update a site and replace the cached copy wholesale. A site missing
    /// from the cache stays missing.
    ///
    /// # Errors
    ///
    /// Returns the API error after recording it in `error`.
    pub async fn update_site(&self, id: SiteId, data: &SiteInput) -> Result<Site, ApiError> {
        let _scope = self.cell.begin();
        match self.api.sites().update_site(id, data).await {
            Ok(site) => {
                self.cell.update(|s| s.replace_by_id(id, site.clone()));
                Ok(site)
            }
            Err(e) => Err(self.cell.fail(e, "Failed to update site")),
        }
    }

    /// Delete a site and drop every cached copy of it.
    ///
    /// # Errors
    ///
    /// Returns the API error after recording it in `error`.
    pub async fn delete_site(&self, id: SiteId) -> Result<(), ApiError> {
        let _scope = self.cell.begin();
        match self.api.sites().delete_site(id).await {
            Ok(_) => {
                self.cell.update(|s| s.remove_by_id(id));
                Ok(())
            }
            Err(e) => Err(self.cell.fail(e, "Failed to delete site")),
        }
    }
}
