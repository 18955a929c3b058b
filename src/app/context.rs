use std::sync::Arc;

use crate::app::error::Result;
use crate::catalog::ZoneCatalog;
use crate::config::Config;
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::{Fetcher, ScheduleFetcher};
use crate::store::sqlite::SqliteStore;

pub struct AppContext {
    pub config: Config,
    pub store: Arc<SqliteStore>,
    pub catalog: ZoneCatalog<SqliteStore>,
    pub schedule: ScheduleFetcher<SqliteStore>,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let db_path = config.resolve_db_path()?;
        tracing::debug!("Opening cache at {}", db_path.display());

        let store = Arc::new(SqliteStore::new(&db_path)?);
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new(&config.remote)?);

        Ok(Self::with_parts(config, store, fetcher))
    }

    pub fn in_memory(config: Config, fetcher: Arc<dyn Fetcher + Send + Sync>) -> Result<Self> {
        let store = Arc::new(SqliteStore::in_memory()?);
        Ok(Self::with_parts(config, store, fetcher))
    }

    pub fn with_parts(
        config: Config,
        store: Arc<SqliteStore>,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
    ) -> Self {
        let catalog = ZoneCatalog::new(store.clone(), fetcher.clone(), config.remote.catalog_url.clone());
        let schedule =
            ScheduleFetcher::new(store.clone(), fetcher, config.remote.schedule_url.clone());

        Self {
            config,
            store,
            catalog,
            schedule,
        }
    }
}
