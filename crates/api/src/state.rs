//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::CatalogConfig;
use crate::services::CatalogService;
use crate::store::JsonFileStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. It holds no catalog data: the
/// document is re-read from the store on every request.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: CatalogConfig,
    catalog: CatalogService,
}

impl AppState {
    /// Create a new application state from configuration.
    #[must_use]
    pub fn new(config: CatalogConfig) -> Self {
        let store = JsonFileStore::new(config.data_file.clone());
        let catalog = CatalogService::new(store, config.strict_categories);

        Self {
            inner: Arc::new(AppStateInner { config, catalog }),
        }
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &CatalogConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog service.
    #[must_use]
    pub fn catalog(&self) -> &CatalogService {
        &self.inner.catalog
    }
}
