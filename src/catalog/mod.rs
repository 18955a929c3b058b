use std::sync::Arc;

use crate::app::Result;
use crate::domain::zone::find_zone;
use crate::domain::{Region, Zone};
use crate::fetcher::{FetchOutcome, Fetcher};
use crate::normalizer::parse_catalog;
use crate::store::Store;

/// Zone catalog backed by the local cache, fetched remotely when the cache is empty.
pub struct ZoneCatalog<S: Store> {
    store: Arc<S>,
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    catalog_url: String,
}

impl<S: Store> ZoneCatalog<S> {
    pub fn new(
        store: Arc<S>,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        catalog_url: impl Into<String>,
    ) -> Self {
        Self {
            store,
            fetcher,
            catalog_url: catalog_url.into(),
        }
    }

    /// Look a zone up by id.
    ///
    /// Only an empty cache triggers a refresh, and then the zone is looked
    /// up in the freshly fetched catalog rather than read back from the store.
    pub async fn resolve_zone(&self, zone_id: &str) -> Result<Option<Zone>> {
        if let Some(zone) = self.store.get_zone(zone_id)? {
            return Ok(Some(zone));
        }

        if self.store.count_zones()? > 0 {
            tracing::debug!("Zone {} is not in the cached catalog", zone_id);
            return Ok(None);
        }

        tracing::info!("Zone catalog is empty, fetching it");
        let regions = self.refresh_catalog().await?.unwrap_or_default();
        Ok(find_zone(&regions, zone_id).cloned())
    }

    /// Fetch the catalog and replace the cached copy.
    ///
    /// Network and parse failures come back as [`FetchOutcome::Unavailable`];
    /// only a failed cache write is an error.
    pub async fn refresh_catalog(&self) -> Result<FetchOutcome<Vec<Region>>> {
        let body = match self.fetcher.fetch(&self.catalog_url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Failed to fetch zone catalog: {}", e);
                return Ok(FetchOutcome::unavailable(e));
            }
        };

        let html = String::from_utf8_lossy(&body);
        let regions = match parse_catalog(&html) {
            Ok(regions) => regions,
            Err(e) => {
                tracing::warn!("Failed to parse zone catalog: {}", e);
                return Ok(FetchOutcome::unavailable(e));
            }
        };

        let zones = self.store.upsert_regions(&regions)?;
        tracing::info!("Cached {} regions with {} zones", regions.len(), zones);

        Ok(FetchOutcome::Fetched(regions))
    }

    /// All regions with their zones, fetching the catalog if nothing is cached.
    pub async fn regions(&self) -> Result<Vec<Region>> {
        let regions = self.store.get_regions()?;
        if !regions.is_empty() {
            return Ok(regions);
        }
        Ok(self.refresh_catalog().await?.unwrap_or_default())
    }
}
