//! Cart commands.
//!
//! Each command opens the file-backed store, runs one operation and prints
//! the resulting cart.

use rocketshoes_cart::{CartConfig, FileCartStore, UpdateProductAmount, open_store};
use rocketshoes_core::{CurrencyCode, ProductId, format_price};

use super::CommandError;

/// Print the cart.
pub fn show(config: &CartConfig) -> Result<(), CommandError> {
    let store = open_store(config)?;
    print_cart(&store);
    Ok(())
}

/// Add one unit of a product.
pub async fn add(config: &CartConfig, product_id: ProductId) -> Result<(), CommandError> {
    let mut store = open_store(config)?;
    store.add_product(product_id).await?;
    print_cart(&store);
    Ok(())
}

/// Remove a product.
pub fn remove(config: &CartConfig, product_id: ProductId) -> Result<(), CommandError> {
    let mut store = open_store(config)?;
    store.remove_product(product_id)?;
    print_cart(&store);
    Ok(())
}

/// Set a product's amount.
pub async fn update(
    config: &CartConfig,
    product_id: ProductId,
    amount: u32,
) -> Result<(), CommandError> {
    let mut store = open_store(config)?;
    store
        .update_product_amount(UpdateProductAmount::new(product_id, amount))
        .await?;
    print_cart(&store);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_cart(store: &FileCartStore) {
    if store.cart().is_empty() {
        println!("Cart is empty");
        return;
    }

    let currency = CurrencyCode::default();
    println!("{:>4}  {:<40} {:>12} {:>5} {:>12}", "ID", "PRODUCT", "PRICE", "QTY", "SUBTOTAL");
    for line in store.cart() {
        println!(
            "{:>4}  {:<40} {:>12} {:>5} {:>12}",
            line.id.as_i32(),
            line.name,
            format_price(line.price, currency),
            line.amount,
            format_price(line.subtotal(), currency),
        );
    }
    println!(
        "{} products, {} units, total {}",
        store.item_count(),
        store.total_quantity(),
        format_price(store.total(), currency)
    );
}
