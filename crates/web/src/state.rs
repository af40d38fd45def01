//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::supabase::ProductsClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the backend client. The client owns the query cache, so
/// constructing a fresh state yields a fresh, isolated cache - there is no
/// process-wide singleton.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    products: ProductsClient,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        let products = ProductsClient::new(&config.supabase);

        Self {
            inner: Arc::new(AppStateInner { config, products }),
        }
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the products client.
    #[must_use]
    pub fn products(&self) -> &ProductsClient {
        &self.inner.products
    }
}
