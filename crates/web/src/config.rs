//! Application configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SUPABASE_URL` - Base URL of the hosted backend project
//! - `SUPABASE_SERVICE_KEY` - Key sent as the `apikey` and bearer headers
//!
//! ## Optional
//! - `SHOPKEEP_HOST` - Bind address (default: 127.0.0.1)
//! - `SHOPKEEP_PORT` - Listen port (default: 3000)

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Hosted backend configuration
    pub supabase: SupabaseConfig,
}

/// Hosted backend (Supabase-style REST) configuration.
///
/// Implements `Debug` manually to redact the service key.
#[derive(Clone)]
pub struct SupabaseConfig {
    /// Base project URL (e.g. <https://xyz.supabase.co>)
    pub url: String,
    /// Service key used for the `apikey` and bearer headers
    pub service_key: SecretString,
}

impl std::fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("service_key", &"[REDACTED]")
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("SHOPKEEP_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("SHOPKEEP_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("SHOPKEEP_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SHOPKEEP_PORT".to_string(), e.to_string()))?;

        let supabase = SupabaseConfig::from_env()?;

        Ok(Self {
            host,
            port,
            supabase,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl SupabaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = get_required_env("SUPABASE_URL")?;

        // Reject malformed URLs at startup rather than on the first request
        Url::parse(&url)
            .map_err(|e| ConfigError::InvalidEnvVar("SUPABASE_URL".to_string(), e.to_string()))?;

        let service_key = SecretString::from(get_required_env("SUPABASE_SERVICE_KEY")?);

        Ok(Self { url, service_key })
    }

    /// REST endpoint for a table of the hosted backend.
    #[must_use]
    pub fn table_endpoint(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.url.trim_end_matches('/'))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
