//! Shared cart handle.
//!
//! Several tasks may act on the same cart (for example concurrent requests
//! from one session). [`SharedCart`] holds the store behind an async mutex
//! and keeps it locked for the whole operation, stock fetch included, so two
//! read-check-write sequences never interleave their snapshot writes.

use std::sync::Arc;

use rocketshoes_core::{Product, ProductId};
use tokio::sync::{Mutex, MutexGuard};

use crate::catalog::CatalogApi;
use crate::error::Result;
use crate::notify::Notifier;
use crate::storage::CartStorage;
use crate::store::{CartStore, UpdateProductAmount};

/// Cloneable handle to one [`CartStore`].
pub struct SharedCart<C, S, N> {
    inner: Arc<Mutex<CartStore<C, S, N>>>,
}

impl<C, S, N> Clone for SharedCart<C, S, N> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C, S, N> SharedCart<C, S, N>
where
    C: CatalogApi,
    S: CartStorage,
    N: Notifier,
{
    #[must_use]
    pub fn new(store: CartStore<C, S, N>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Lock the store for several reads or operations in a row.
    pub async fn lock(&self) -> MutexGuard<'_, CartStore<C, S, N>> {
        self.inner.lock().await
    }

    /// Copy of the current cart.
    pub async fn cart(&self) -> Vec<Product> {
        self.inner.lock().await.cart().to_vec()
    }

    /// See [`CartStore::add_product`].
    ///
    /// # Errors
    ///
    /// Returns the operation's error after it has been notified.
    pub async fn add_product(&self, product_id: ProductId) -> Result<()> {
        self.inner.lock().await.add_product(product_id).await
    }

    /// See [`CartStore::remove_product`].
    ///
    /// # Errors
    ///
    /// Returns the operation's error after it has been notified.
    pub async fn remove_product(&self, product_id: ProductId) -> Result<()> {
        self.inner.lock().await.remove_product(product_id)
    }

    /// See [`CartStore::update_product_amount`].
    ///
    /// # Errors
    ///
    /// Returns the operation's error after it has been notified.
    pub async fn update_product_amount(&self, request: UpdateProductAmount) -> Result<()> {
        self.inner.lock().await.update_product_amount(request).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use rocketshoes_core::Stock;
    use rust_decimal::Decimal;

    use super::*;
    use crate::catalog::ApiError;
    use crate::error::CartError;
    use crate::notify::RecordingNotifier;
    use crate::snapshot;
    use crate::storage::MemoryStorage;

    /// Catalog whose stock read yields to the scheduler, so unsynchronized
    /// callers would both pass the check before either writes.
    struct SlowCatalog {
        stock: AtomicU32,
    }

    impl CatalogApi for SlowCatalog {
        async fn stock(&self) -> std::result::Result<Vec<Stock>, ApiError> {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Ok(vec![Stock {
                id: ProductId::new(1),
                amount: self.stock.load(Ordering::SeqCst),
            }])
        }

        async fn product(&self, id: ProductId) -> std::result::Result<Product, ApiError> {
            Ok(Product {
                id,
                name: "Tênis de Caminhada Leve Confortável".to_string(),
                price: Decimal::new(17_990, 2),
                image: String::new(),
                amount: 0,
            })
        }
    }

    #[tokio::test]
    async fn test_concurrent_adds_respect_stock() {
        let storage = Arc::new(MemoryStorage::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let cart = SharedCart::new(CartStore::new(
            SlowCatalog {
                stock: AtomicU32::new(2),
            },
            storage.clone(),
            notifier.clone(),
        ));

        let tasks: Vec<_> = (0..4)
            .map(|_| {
                let cart = cart.clone();
                tokio::spawn(async move { cart.add_product(ProductId::new(1)).await })
            })
            .collect();

        let mut rejected = 0;
        for task in tasks {
            if let Err(e) = task.await.unwrap() {
                assert!(matches!(e, CartError::StockExceeded(_)));
                rejected += 1;
            }
        }

        assert_eq!(rejected, 2);
        let lines = cart.cart().await;
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].amount, 2);
        assert_eq!(snapshot::load(&storage), lines);
        assert_eq!(notifier.messages().len(), 2);
    }

    #[tokio::test]
    async fn test_remove_and_update_through_handle() {
        let storage = Arc::new(MemoryStorage::new());
        let cart = SharedCart::new(CartStore::new(
            SlowCatalog {
                stock: AtomicU32::new(5),
            },
            storage,
            RecordingNotifier::new(),
        ));

        cart.add_product(ProductId::new(1)).await.unwrap();
        cart.update_product_amount(UpdateProductAmount::new(ProductId::new(1), 3))
            .await
            .unwrap();
        assert_eq!(cart.lock().await.amount_of(ProductId::new(1)), Some(3));

        cart.remove_product(ProductId::new(1)).await.unwrap();
        assert!(cart.cart().await.is_empty());
    }
}
