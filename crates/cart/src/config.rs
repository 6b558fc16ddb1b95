//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `ROCKETSHOES_API_URL` - Inventory API base URL (default: `http://localhost:3333`)
//! - `ROCKETSHOES_STORAGE_PATH` - Storage file for persisted slots
//!   (default: `.rocketshoes/storage.json`)
//! - `ROCKETSHOES_PRODUCT_CACHE_TTL_SECS` - Product detail cache TTL, `0` disables
//!   (default: 300)
//! - `ROCKETSHOES_PERSIST_REMOVALS` - `true` to rewrite the stored cart when a
//!   product is removed (default: false)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::store::RemovalPersistence;

const DEFAULT_API_URL: &str = "http://localhost:3333";
const DEFAULT_STORAGE_PATH: &str = ".rocketshoes/storage.json";
const DEFAULT_PRODUCT_CACHE_TTL_SECS: &str = "300";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart application configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Inventory API configuration
    pub catalog: CatalogConfig,
    /// File holding the persisted storage slots
    pub storage_path: PathBuf,
    /// Whether `remove_product` rewrites the stored cart
    pub removal_persistence: RemovalPersistence,
}

/// Inventory API configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL; always ends with `/` so endpoints join underneath it
    pub api_url: Url,
    /// Product detail cache TTL (zero disables caching)
    pub product_cache_ttl: Duration,
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let catalog = CatalogConfig::from_lookup(&lookup)?;
        let storage_path = PathBuf::from(get_or_default(
            &lookup,
            "ROCKETSHOES_STORAGE_PATH",
            DEFAULT_STORAGE_PATH,
        ));
        let removal_persistence = if parse_bool(
            "ROCKETSHOES_PERSIST_REMOVALS",
            lookup("ROCKETSHOES_PERSIST_REMOVALS"),
        )? {
            RemovalPersistence::Persist
        } else {
            RemovalPersistence::Legacy
        };

        Ok(Self {
            catalog,
            storage_path,
            removal_persistence,
        })
    }
}

impl CatalogConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = parse_base_url(
            "ROCKETSHOES_API_URL",
            &get_or_default(lookup, "ROCKETSHOES_API_URL", DEFAULT_API_URL),
        )?;
        let ttl_secs = get_or_default(
            lookup,
            "ROCKETSHOES_PRODUCT_CACHE_TTL_SECS",
            DEFAULT_PRODUCT_CACHE_TTL_SECS,
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar(
                "ROCKETSHOES_PRODUCT_CACHE_TTL_SECS".to_string(),
                e.to_string(),
            )
        })?;

        Ok(Self {
            api_url,
            product_cache_ttl: Duration::from_secs(ttl_secs),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a variable with a default value.
fn get_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Parse an HTTP(S) base URL, appending the trailing slash `Url::join` needs.
fn parse_base_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let mut url =
        Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

/// Parse an optional boolean flag (`true`/`false`/`1`/`0`/`yes`/`no`).
fn parse_bool(key: &str, value: Option<String>) -> Result<bool, ConfigError> {
    let Some(value) = value else {
        return Ok(false);
    };

    match value.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Ok(false),
        "1" | "true" | "yes" | "on" => Ok(true),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}
