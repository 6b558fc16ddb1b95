//! Catalog product and stock types.
//!
//! These mirror the inventory API's JSON payloads (`GET /products/{id}` and
//! `GET /stock`) and the persisted cart snapshot, which stores products with
//! their in-cart `amount`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// A product as listed by the catalog and held in the cart.
///
/// `amount` is the quantity in the cart. The catalog omits it, so it defaults
/// to zero on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(alias = "title")]
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub image: String,
    #[serde(default)]
    pub amount: u32,
}

impl Product {
    /// Price of this line: unit price times in-cart amount.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.amount)
    }

    /// Copy of this product with a different in-cart amount.
    #[must_use]
    pub fn with_amount(&self, amount: u32) -> Self {
        Self {
            amount,
            ..self.clone()
        }
    }
}

/// Remote-sourced ceiling on purchasable quantity for one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub id: ProductId,
    pub amount: u32,
}
