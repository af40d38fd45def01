//! Products table client over the backend's REST interface.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use tracing::{debug, instrument};

use shopkeep_core::{NewProduct, Product, ProductId};

use crate::config::SupabaseConfig;

use super::BackendError;
use super::cache::{CacheKey, CacheValue};

/// How long a fetched product list may be served before expiring on its own.
/// Writes invalidate it explicitly well before this.
const LIST_TTL: Duration = Duration::from_secs(300);

/// Client for the `products` table of the hosted backend.
///
/// Cheaply cloneable via `Arc`. The list result is cached under a fixed key;
/// mutations never patch the cached value - callers invalidate it after a
/// successful write so the next read re-derives from server state.
#[derive(Clone)]
pub struct ProductsClient {
    inner: Arc<ProductsClientInner>,
}

struct ProductsClientInner {
    client: reqwest::Client,
    endpoint: String,
    service_key: String,
    cache: Cache<CacheKey, CacheValue>,
}

impl ProductsClient {
    /// Create a new client for the configured backend.
    #[must_use]
    pub fn new(config: &SupabaseConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(16)
            .time_to_live(LIST_TTL)
            .build();

        Self {
            inner: Arc::new(ProductsClientInner {
                client: reqwest::Client::new(),
                endpoint: config.table_endpoint("products"),
                service_key: config.service_key.expose_secret().to_string(),
                cache,
            }),
        }
    }

    /// Attach the backend auth headers to a request.
    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.inner.service_key)
            .header(
                "Authorization",
                format!("Bearer {}", self.inner.service_key),
            )
    }

    // =========================================================================
    // Read Path
    // =========================================================================

    /// Get the full product list, ordered by id.
    ///
    /// Served through the cache: concurrent callers share one in-flight
    /// fetch, and a cached list is returned as-is until it is invalidated or
    /// expires. Failed fetches are not cached.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the fetch fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Product>, BackendError> {
        let result = self
            .inner
            .cache
            .try_get_with(CacheKey::Products, async {
                self.fetch_products().await.map(CacheValue::Products)
            })
            .await;

        match result {
            Ok(CacheValue::Products(products)) => Ok(products),
            Err(err) => Err((*err).clone()),
        }
    }

    /// One uncached round trip for the list.
    async fn fetch_products(&self) -> Result<Vec<Product>, BackendError> {
        debug!("fetching product list");

        let response = self
            .authed(self.inner.client.get(&self.inner.endpoint))
            .query(&[("select", "*"), ("order", "id.asc")])
            .send()
            .await?;

        Self::read_rows(response).await
    }

    // =========================================================================
    // Write Path
    // =========================================================================

    /// Insert one product, returning the created row with its server-assigned
    /// `id` and `created_at`.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on constraint violation or connectivity failure.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: &NewProduct) -> Result<Product, BackendError> {
        let response = self
            .authed(self.inner.client.post(&self.inner.endpoint))
            .header("Prefer", "return=representation")
            .json(input)
            .send()
            .await?;

        let rows = Self::read_rows(response).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| BackendError::Decode("insert returned no rows".to_string()))
    }

    /// Update the row matching `id` with the supplied fields, returning the
    /// updated row. No version check is performed - last write wins.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if no row matches `id` or the call fails.
    #[instrument(skip(self, input), fields(id = %id))]
    pub async fn update(&self, id: ProductId, input: &NewProduct) -> Result<Product, BackendError> {
        let response = self
            .authed(self.inner.client.patch(&self.inner.endpoint))
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(input)
            .send()
            .await?;

        let rows = Self::read_rows(response).await?;
        rows.into_iter()
            .next()
            .ok_or(BackendError::NoRows(id.as_i64()))
    }

    /// Remove the row matching `id`.
    ///
    /// Deleting an id that is already absent is indistinguishable from
    /// success; only an error reported by the backend fails the call.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the delete call itself errors.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete(&self, id: ProductId) -> Result<(), BackendError> {
        let response = self
            .authed(self.inner.client.delete(&self.inner.endpoint))
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(api_error(status, &body));
        }

        Ok(())
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Mark the cached product list stale so the next `list()` re-fetches.
    pub async fn invalidate_products(&self) {
        self.inner.cache.invalidate(&CacheKey::Products).await;
    }

    /// Read a response expected to carry product rows, normalizing errors.
    async fn read_rows(response: reqwest::Response) -> Result<Vec<Product>, BackendError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        let rows: Vec<Product> = serde_json::from_str(&body)?;
        Ok(rows)
    }
}

/// Map an error response to `BackendError`, preferring the backend's own
/// `message` field when the body carries its JSON error shape.
fn api_error(status: StatusCode, body: &str) -> BackendError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_owned)
        })
        .unwrap_or_else(|| body.chars().take(200).collect());

    BackendError::Api {
        status: status.as_u16(),
        message,
    }
}
