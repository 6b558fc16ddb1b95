//! Cart operation errors.
//!
//! Every store operation catches its error at the boundary, shows
//! [`CartError::user_message`] through the notifier, and hands the error back
//! to the caller for logging or exit codes.

use rocketshoes_core::ProductId;
use thiserror::Error;

use crate::catalog::ApiError;
use crate::storage::StorageError;

/// Message shown when a requested quantity is not available.
pub const OUT_OF_STOCK_MESSAGE: &str = "Quantidade solicitada fora de estoque";

/// Message shown when removing a product fails.
pub const DELETE_FAILED_MESSAGE: &str = "Erro ao deletar o produto";

/// Errors returned by cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Stock does not allow another unit of this product.
    #[error("Requested quantity for product {0} exceeds available stock")]
    StockExceeded(ProductId),

    /// The stock list has no entry for this product.
    #[error("No stock entry for product {0}")]
    StockNotFound(ProductId),

    /// The product is not in the cart.
    #[error("Product {0} is not in the cart")]
    NotInCart(ProductId),

    /// Quantity outside the accepted range.
    #[error("Invalid amount {amount} for product {product_id}")]
    InvalidAmount { product_id: ProductId, amount: u32 },

    /// Inventory API operation failed.
    #[error("Catalog error: {0}")]
    Api(#[from] ApiError),

    /// Snapshot storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Removing a product from the stored cart failed.
    #[error("Failed to remove product {product_id}: {source}")]
    DeletionFailed {
        product_id: ProductId,
        #[source]
        source: StorageError,
    },
}

impl CartError {
    /// Text shown to the user for this error.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::StockExceeded(_) => OUT_OF_STOCK_MESSAGE.to_string(),
            Self::DeletionFailed { .. } => DELETE_FAILED_MESSAGE.to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
