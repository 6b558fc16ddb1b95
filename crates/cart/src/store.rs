//! Cart store: the cart's single source of truth.
//!
//! Data flow for every mutation:
//! operation → stock check (remote) → snapshot rewrite → in-memory update.
//!
//! The in-memory cart only changes after the snapshot write succeeds, so a
//! failed operation leaves both untouched.

use rocketshoes_core::{Product, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::catalog::CatalogApi;
use crate::error::{CartError, Result};
use crate::notify::Notifier;
use crate::snapshot;
use crate::storage::CartStorage;

/// How `remove_product` treats the stored snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemovalPersistence {
    /// Remove from memory only. The stored snapshot keeps the product, so it
    /// comes back on the next load. This is how the storefront has always
    /// behaved.
    #[default]
    Legacy,
    /// Rewrite the stored snapshot without the product, then remove it from
    /// memory.
    Persist,
}

/// Request to set a cart line to an exact quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: u32,
}

impl UpdateProductAmount {
    #[must_use]
    pub const fn new(product_id: ProductId, amount: u32) -> Self {
        Self { product_id, amount }
    }
}

/// Ordered cart of products, mirrored to a persisted snapshot.
///
/// Operations take `&mut self`, so a single store never interleaves two
/// mutations. Wrap it in a [`SharedCart`](crate::SharedCart) to share it.
pub struct CartStore<C, S, N> {
    catalog: C,
    storage: S,
    notifier: N,
    cart: Vec<Product>,
    removal_persistence: RemovalPersistence,
}

impl<C, S, N> std::fmt::Debug for CartStore<C, S, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("removal_persistence", &self.removal_persistence)
            .finish_non_exhaustive()
    }
}

impl<C, S, N> CartStore<C, S, N>
where
    C: CatalogApi,
    S: CartStorage,
    N: Notifier,
{
    /// Create a store, loading the cart from the persisted snapshot.
    ///
    /// An absent or unparsable snapshot starts an empty cart.
    pub fn new(catalog: C, storage: S, notifier: N) -> Self {
        let cart = snapshot::load(&storage);
        debug!(lines = cart.len(), "Cart loaded from storage");

        Self {
            catalog,
            storage,
            notifier,
            cart,
            removal_persistence: RemovalPersistence::default(),
        }
    }

    /// Choose how removals touch the stored snapshot.
    #[must_use]
    pub fn with_removal_persistence(mut self, mode: RemovalPersistence) -> Self {
        self.removal_persistence = mode;
        self
    }

    // =========================================================================
    // Read access
    // =========================================================================

    /// Products in the cart, in the order they were added.
    #[must_use]
    pub fn cart(&self) -> &[Product] {
        &self.cart
    }

    /// In-cart amount for a product, if it is in the cart.
    #[must_use]
    pub fn amount_of(&self, id: ProductId) -> Option<u32> {
        self.cart.iter().find(|p| p.id == id).map(|p| p.amount)
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.cart.len()
    }

    /// Sum of every line's amount.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.cart.iter().map(|p| u64::from(p.amount)).sum()
    }

    /// Sum of every line's subtotal.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.cart.iter().map(Product::subtotal).sum()
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Add one unit of a product.
    ///
    /// Fails with [`CartError::StockExceeded`] when the stock does not exceed
    /// the amount already in the cart. A product already in the cart gets its
    /// amount incremented; a new one is fetched from the catalog and appended
    /// with amount 1.
    ///
    /// # Errors
    ///
    /// Returns the error after it has been shown through the notifier. The
    /// cart is unchanged on error.
    #[instrument(skip(self))]
    pub async fn add_product(&mut self, product_id: ProductId) -> Result<()> {
        match self.try_add_product(product_id).await {
            Ok(()) => Ok(()),
            Err(e) => Err(self.report(e)),
        }
    }

    /// Remove a product from the cart. Removing an absent product is a no-op.
    ///
    /// # Errors
    ///
    /// With [`RemovalPersistence::Persist`], returns
    /// [`CartError::DeletionFailed`] if the stored snapshot cannot be
    /// rewritten; the cart is unchanged in that case.
    #[instrument(skip(self))]
    pub fn remove_product(&mut self, product_id: ProductId) -> Result<()> {
        match self.try_remove_product(product_id) {
            Ok(()) => Ok(()),
            Err(e) => Err(self.report(e)),
        }
    }

    /// Set a cart line to an exact amount.
    ///
    /// Increases are validated against stock the same way
    /// [`add_product`](Self::add_product) is; decreases are not.
    ///
    /// # Errors
    ///
    /// Returns the error after it has been shown through the notifier. The
    /// cart is unchanged on error.
    #[instrument(skip(self, request), fields(product_id = %request.product_id, amount = request.amount))]
    pub async fn update_product_amount(&mut self, request: UpdateProductAmount) -> Result<()> {
        match self.try_update_product_amount(request).await {
            Ok(()) => Ok(()),
            Err(e) => Err(self.report(e)),
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn try_add_product(&mut self, product_id: ProductId) -> Result<()> {
        if self.check_stock(product_id).await? {
            return Err(CartError::StockExceeded(product_id));
        }

        if let Some(current) = self.amount_of(product_id) {
            let amount = current.saturating_add(1);
            let next = self.with_line_amount(product_id, amount);

            snapshot::patch(&self.storage, &next, product_id, |stored| {
                stored.with_amount(stored.amount.saturating_add(1))
            })?;
            self.cart = next;
            info!(amount, "Incremented product in cart");
        } else {
            let product = self.catalog.product(product_id).await?;
            let mut next = self.cart.clone();
            next.push(product.with_amount(1));

            snapshot::write(&self.storage, &next)?;
            self.cart = next;
            info!("Added product to cart");
        }

        Ok(())
    }

    fn try_remove_product(&mut self, product_id: ProductId) -> Result<()> {
        let next: Vec<Product> = self
            .cart
            .iter()
            .filter(|p| p.id != product_id)
            .cloned()
            .collect();

        if self.removal_persistence == RemovalPersistence::Persist {
            snapshot::remove(&self.storage, &next, product_id).map_err(|source| {
                CartError::DeletionFailed { product_id, source }
            })?;
        }

        if next.len() == self.cart.len() {
            debug!("Product not in cart, nothing to remove");
        } else {
            info!("Removed product from cart");
        }
        self.cart = next;
        Ok(())
    }

    async fn try_update_product_amount(&mut self, request: UpdateProductAmount) -> Result<()> {
        let UpdateProductAmount { product_id, amount } = request;

        if amount == 0 {
            return Err(CartError::InvalidAmount { product_id, amount });
        }

        let current = self
            .amount_of(product_id)
            .ok_or(CartError::NotInCart(product_id))?;

        if amount > current && self.check_stock(product_id).await? {
            return Err(CartError::StockExceeded(product_id));
        }

        let next = self.with_line_amount(product_id, amount);

        snapshot::patch(&self.storage, &next, product_id, |stored| {
            stored.with_amount(amount)
        })?;

        self.cart = next;
        info!(previous = current, "Updated product amount");
        Ok(())
    }

    /// Returns `true` when stock leaves no room for another unit, i.e. the
    /// stock amount is at most the amount already in the cart.
    async fn check_stock(&self, product_id: ProductId) -> Result<bool> {
        let stock = self.catalog.stock().await?;

        let available = stock
            .iter()
            .find(|s| s.id == product_id)
            .map(|s| s.amount)
            .ok_or(CartError::StockNotFound(product_id))?;
        let in_cart = self.amount_of(product_id).unwrap_or(0);

        debug!(available, in_cart, "Checked stock");
        Ok(available <= in_cart)
    }

    /// Copy of the cart with one line's amount replaced.
    fn with_line_amount(&self, product_id: ProductId, amount: u32) -> Vec<Product> {
        self.cart
            .iter()
            .map(|p| {
                if p.id == product_id {
                    p.with_amount(amount)
                } else {
                    p.clone()
                }
            })
            .collect()
    }

    fn report(&self, error: CartError) -> CartError {
        debug!(error = %error, "Cart operation failed");
        self.notifier.error(&error.user_message());
        error
    }
}
