//! Hosted backend (Supabase-style REST) client.
//!
//! # Architecture
//!
//! - The backend is the source of truth - no local persistence, direct REST
//!   calls against its `rest/v1` interface
//! - In-memory caching of the product list via `moka`; writes never patch the
//!   cached value, they invalidate it so the next read re-fetches
//! - Each call is a single best-effort round trip: no retries, no client-side
//!   timeouts, no batching
//!
//! # Example
//!
//! ```rust,ignore
//! use shopkeep_web::supabase::ProductsClient;
//!
//! let client = ProductsClient::new(&config.supabase);
//!
//! let created = client.create(&input).await?;
//! client.invalidate_products().await;
//! let products = client.list().await?;
//! ```

mod cache;
mod client;

pub use client::ProductsClient;

use thiserror::Error;

/// Errors reported by the remote data calls.
///
/// One taxonomy for every failure: the view does not distinguish validation,
/// not-found, conflict, or transport problems. Variants are `Clone` so a
/// coalesced cache load can hand the same failure to every waiter.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// The HTTP round trip itself failed.
    #[error("request failed: {0}")]
    Transport(String),

    /// The backend answered with an error status.
    #[error("backend returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// A write matched no row.
    #[error("no product row matched id {0}")]
    NoRows(i64),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
