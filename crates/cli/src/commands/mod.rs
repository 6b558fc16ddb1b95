//! Command implementations.

pub mod cart;
pub mod stock;

use rocketshoes_cart::{ApiError, CartError, ConfigError};
use thiserror::Error;

/// Errors that can end a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Inventory API client could not be built or queried.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// A cart operation failed (already shown to the user).
    #[error("{0}")]
    Cart(#[from] CartError),
}
