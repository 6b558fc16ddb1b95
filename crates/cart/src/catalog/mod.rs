//! Inventory API access.
//!
//! # Endpoints
//!
//! - `GET /stock` - every product's purchasable quantity
//! - `GET /products/{id}` - product details for a single id
//!
//! [`CatalogApi`] is the seam the cart store talks through; [`HttpCatalog`]
//! is the `reqwest` implementation used by the binaries.

mod http;

use std::future::Future;
use std::sync::Arc;

use rocketshoes_core::{Product, ProductId, Stock};
use thiserror::Error;

pub use http::HttpCatalog;

/// Errors that can occur when interacting with the inventory API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The configured base URL cannot address an endpoint.
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Remote source of stock levels and product details.
pub trait CatalogApi: Send + Sync {
    /// Fetch the stock list for every product.
    fn stock(&self) -> impl Future<Output = Result<Vec<Stock>, ApiError>> + Send;

    /// Fetch the details of one product.
    fn product(&self, id: ProductId) -> impl Future<Output = Result<Product, ApiError>> + Send;
}

impl<T: CatalogApi> CatalogApi for Arc<T> {
    fn stock(&self) -> impl Future<Output = Result<Vec<Stock>, ApiError>> + Send {
        (**self).stock()
    }

    fn product(&self, id: ProductId) -> impl Future<Output = Result<Product, ApiError>> + Send {
        (**self).product(id)
    }
}
