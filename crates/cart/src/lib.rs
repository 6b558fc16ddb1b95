//! RocketShoes Cart - shopping cart state with stock validation.
//!
//! # Architecture
//!
//! - [`CartStore`] owns the ordered cart, the catalog client, the storage
//!   handle and the notifier. Every mutation validates against remote stock,
//!   then rewrites the persisted snapshot, then updates the in-memory cart.
//! - [`SharedCart`] wraps a store in an async mutex so concurrent callers
//!   run each read-check-write sequence one at a time.
//! - [`catalog`] talks to the inventory API (`GET /stock`,
//!   `GET /products/{id}`); product details are cached with `moka`.
//! - [`storage`] is a string key-value slot store (memory or JSON file).
//! - [`notify`] surfaces user-facing error messages.
//!
//! # Example
//!
//! ```rust,ignore
//! use rocketshoes_cart::{CartConfig, open_store};
//!
//! let config = CartConfig::from_env()?;
//! let mut store = open_store(&config)?;
//!
//! store.add_product(ProductId::new(1)).await?;
//! store.update_product_amount(UpdateProductAmount::new(ProductId::new(1), 3)).await?;
//! store.remove_product(ProductId::new(1))?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod notify;
pub mod shared;
pub mod snapshot;
pub mod storage;
pub mod store;

pub use catalog::{ApiError, CatalogApi, HttpCatalog};
pub use config::{CartConfig, CatalogConfig, ConfigError};
pub use error::CartError;
pub use notify::{Notifier, RecordingNotifier, TracingNotifier};
pub use shared::SharedCart;
pub use snapshot::CART_STORAGE_KEY;
pub use storage::{CartStorage, FileStorage, MemoryStorage, StorageError};
pub use store::{CartStore, RemovalPersistence, UpdateProductAmount};

/// Store type used by binaries: HTTP catalog, file-backed storage, log notifications.
pub type FileCartStore = CartStore<HttpCatalog, FileStorage, TracingNotifier>;

/// Build a [`FileCartStore`] from configuration, loading the persisted cart.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be constructed.
pub fn open_store(config: &CartConfig) -> Result<FileCartStore, ApiError> {
    let catalog = HttpCatalog::new(&config.catalog)?;
    let storage = FileStorage::new(&config.storage_path);

    Ok(CartStore::new(catalog, storage, TracingNotifier)
        .with_removal_persistence(config.removal_persistence))
}
