//! `reqwest` client for the inventory API.
//!
//! Product details are cached using `moka` (TTL from configuration). Stock is
//! never cached: every check reads the live list.

use std::sync::Arc;

use moka::future::Cache;
use rocketshoes_core::{Product, ProductId, Stock};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::{ApiError, CatalogApi};
use crate::config::CatalogConfig;

const PRODUCT_CACHE_CAPACITY: u64 = 1000;

/// Number of response body characters kept in error messages and logs.
const BODY_EXCERPT_CHARS: usize = 200;

/// Client for the inventory API.
///
/// Cheap to clone; clones share the connection pool and product cache.
#[derive(Clone)]
pub struct HttpCatalog {
    inner: Arc<HttpCatalogInner>,
}

struct HttpCatalogInner {
    client: reqwest::Client,
    base_url: Url,
    products: Option<Cache<ProductId, Product>>,
}

impl std::fmt::Debug for HttpCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCatalog")
            .field("base_url", &self.inner.base_url.as_str())
            .field("product_cache", &self.inner.products.is_some())
            .finish()
    }
}

impl HttpCatalog {
    /// Create a new inventory API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &CatalogConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("rocketshoes-cart/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let products = (!config.product_cache_ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(PRODUCT_CACHE_CAPACITY)
                .time_to_live(config.product_cache_ttl)
                .build()
        });

        Ok(Self {
            inner: Arc::new(HttpCatalogInner {
                client,
                base_url: config.api_url.clone(),
                products,
            }),
        })
    }

    /// Base URL every endpoint is resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// Execute a GET request and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let response = self.inner.client.get(url.clone()).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(url.path().to_string()));
        }

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                url = %url,
                body = %excerpt(&body),
                "Inventory API returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: excerpt(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                url = %url,
                body = %excerpt(&body),
                "Failed to parse inventory API response"
            );
            ApiError::Parse(e)
        })
    }
}

impl CatalogApi for HttpCatalog {
    #[instrument(skip(self))]
    async fn stock(&self) -> Result<Vec<Stock>, ApiError> {
        let url = self.endpoint("stock")?;
        let stock: Vec<Stock> = self.get_json(url).await?;
        debug!(entries = stock.len(), "Fetched stock list");
        Ok(stock)
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn product(&self, id: ProductId) -> Result<Product, ApiError> {
        if let Some(cache) = &self.inner.products
            && let Some(product) = cache.get(&id).await
        {
            debug!("Cache hit for product");
            return Ok(product);
        }

        let url = self.endpoint(&format!("products/{id}"))?;
        let product: Product = self.get_json(url).await?;

        if let Some(cache) = &self.inner.products {
            cache.insert(id, product.clone()).await;
        }

        Ok(product)
    }
}

fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn config(url: &str, ttl_secs: u64) -> CatalogConfig {
        CatalogConfig {
            api_url: Url::parse(url).unwrap(),
            product_cache_ttl: Duration::from_secs(ttl_secs),
        }
    }

    #[test]
    fn test_endpoints_resolve_against_base_path() {
        let catalog = HttpCatalog::new(&config("http://localhost:3333/api/", 300)).unwrap();
        assert_eq!(
            catalog.endpoint("stock").unwrap().as_str(),
            "http://localhost:3333/api/stock"
        );
        assert_eq!(
            catalog.endpoint("products/4").unwrap().as_str(),
            "http://localhost:3333/api/products/4"
        );
    }

    #[test]
    fn test_zero_ttl_disables_cache() {
        let catalog = HttpCatalog::new(&config("http://localhost:3333/", 0)).unwrap();
        assert!(catalog.inner.products.is_none());

        let catalog = HttpCatalog::new(&config("http://localhost:3333/", 60)).unwrap();
        assert!(catalog.inner.products.is_some());
    }

    #[test]
    fn test_excerpt_truncates() {
        let body = "x".repeat(BODY_EXCERPT_CHARS * 2);
        assert_eq!(excerpt(&body).len(), BODY_EXCERPT_CHARS);
        assert_eq!(excerpt("short"), "short");
    }
}
