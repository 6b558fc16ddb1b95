//! Persisted cart snapshot.
//!
//! The cart is stored as a JSON array of products under a single slot. Writes
//! always replace the whole slot; there are no partial or merge writes.

use rocketshoes_core::{Product, ProductId};
use tracing::{debug, warn};

use crate::storage::{CartStorage, StorageError};

/// Storage slot holding the serialized cart.
pub const CART_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Load the cart from storage.
///
/// An absent, unreadable or unparsable slot yields an empty cart.
pub fn load(storage: &impl CartStorage) -> Vec<Product> {
    match read(storage) {
        Ok(Some(cart)) => cart,
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!(error = %e, "Ignoring unreadable stored cart");
            Vec::new()
        }
    }
}

/// Replace the stored cart with `cart`.
///
/// # Errors
///
/// Returns an error if the cart cannot be serialized or written.
pub fn write(storage: &impl CartStorage, cart: &[Product]) -> Result<(), StorageError> {
    let json = serde_json::to_string(cart)?;
    storage.set_item(CART_STORAGE_KEY, &json)?;
    debug!(lines = cart.len(), "Stored cart snapshot");
    Ok(())
}

/// Rewrite the stored entry for `id` with `update`, keeping every other
/// stored entry as it is.
///
/// The stored list is re-read and mapped rather than replaced by the
/// in-memory cart. When nothing usable is stored (absent, empty or
/// unparsable slot) the whole `fallback` cart is written instead.
///
/// # Errors
///
/// Returns an error if storage cannot be read or written.
pub fn patch(
    storage: &impl CartStorage,
    fallback: &[Product],
    id: ProductId,
    update: impl Fn(&Product) -> Product,
) -> Result<(), StorageError> {
    let stored = match read(storage) {
        Ok(Some(stored)) if !stored.is_empty() => stored,
        Ok(_) => return write(storage, fallback),
        Err(StorageError::Serialize(e)) => {
            warn!(error = %e, "Replacing unparsable stored cart");
            return write(storage, fallback);
        }
        Err(e) => return Err(e),
    };

    let patched: Vec<Product> = stored
        .iter()
        .map(|product| {
            if product.id == id {
                update(product)
            } else {
                product.clone()
            }
        })
        .collect();

    write(storage, &patched)
}

/// Rewrite the stored cart without the entry for `id`.
///
/// An unparsable slot is replaced by `fallback`, the in-memory cart without
/// the entry.
///
/// # Errors
///
/// Returns an error if storage cannot be read or written.
pub fn remove(
    storage: &impl CartStorage,
    fallback: &[Product],
    id: ProductId,
) -> Result<(), StorageError> {
    let stored = match read(storage) {
        Ok(Some(stored)) => stored,
        Ok(None) => return Ok(()),
        Err(StorageError::Serialize(e)) => {
            warn!(error = %e, "Replacing unparsable stored cart");
            return write(storage, fallback);
        }
        Err(e) => return Err(e),
    };

    let remaining: Vec<Product> = stored.into_iter().filter(|p| p.id != id).collect();
    write(storage, &remaining)
}

fn read(storage: &impl CartStorage) -> Result<Option<Vec<Product>>, StorageError> {
    storage
        .get_item(CART_STORAGE_KEY)?
        .map(|json| serde_json::from_str(&json).map_err(StorageError::Serialize))
        .transpose()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::storage::MemoryStorage;

    fn product(id: i32, amount: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Tênis {id}"),
            price: Decimal::new(13_990 + i64::from(id), 2),
            image: format!("https://example.com/tenis{id}.jpg"),
            amount,
        }
    }

    #[test]
    fn test_round_trip_preserves_order_and_amounts() {
        let storage = MemoryStorage::new();
        let cart = vec![product(3, 1), product(1, 4), product(2, 2)];

        write(&storage, &cart).unwrap();
        assert_eq!(load(&storage), cart);
    }

    #[test]
    fn test_load_absent_or_garbage_is_empty() {
        assert!(load(&MemoryStorage::new()).is_empty());
        assert!(load(&MemoryStorage::with_item(CART_STORAGE_KEY, "{oops")).is_empty());
    }

    #[test]
    fn test_patch_maps_stored_entry_only() {
        let storage = MemoryStorage::new();
        // Stored copy diverges from memory: product 9 only exists on disk.
        write(&storage, &[product(1, 1), product(9, 2)]).unwrap();

        let in_memory = vec![product(1, 5)];
        patch(&storage, &in_memory, ProductId::new(1), |p| p.with_amount(5)).unwrap();

        assert_eq!(load(&storage), vec![product(1, 5), product(9, 2)]);
    }

    #[test]
    fn test_patch_without_stored_cart_writes_fallback() {
        let storage = MemoryStorage::with_item(CART_STORAGE_KEY, "[]");
        let in_memory = vec![product(1, 2)];

        patch(&storage, &in_memory, ProductId::new(1), |p| p.with_amount(2)).unwrap();
        assert_eq!(load(&storage), in_memory);

        let storage = MemoryStorage::with_item(CART_STORAGE_KEY, "garbage");
        patch(&storage, &in_memory, ProductId::new(1), |p| p.with_amount(2)).unwrap();
        assert_eq!(load(&storage), in_memory);
    }

    #[test]
    fn test_remove_filters_entry() {
        let storage = MemoryStorage::new();
        write(&storage, &[product(1, 1), product(2, 1)]).unwrap();

        remove(&storage, &[product(2, 1)], ProductId::new(1)).unwrap();
        assert_eq!(load(&storage), vec![product(2, 1)]);

        let empty = MemoryStorage::new();
        remove(&empty, &[], ProductId::new(1)).unwrap();
        assert_eq!(empty.get_item(CART_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_remove_replaces_unparsable_slot() {
        let storage = MemoryStorage::with_item(CART_STORAGE_KEY, "{oops");

        remove(&storage, &[product(2, 1)], ProductId::new(1)).unwrap();
        assert_eq!(load(&storage), vec![product(2, 1)]);
    }
}
