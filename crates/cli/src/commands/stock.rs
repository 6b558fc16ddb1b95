//! Stock listing command.

use rocketshoes_cart::{CartConfig, CatalogApi, HttpCatalog};

use super::CommandError;

/// Print every product's available stock.
pub async fn list(config: &CartConfig) -> Result<(), CommandError> {
    let catalog = HttpCatalog::new(&config.catalog)?;
    tracing::info!("Fetching stock from {}", catalog.base_url());

    let mut stock = catalog.stock().await?;
    stock.sort_by_key(|s| s.id);

    #[allow(clippy::print_stdout)]
    {
        println!("{:>4}  {:>6}", "ID", "STOCK");
        for entry in &stock {
            println!("{:>4}  {:>6}", entry.id.as_i32(), entry.amount);
        }
    }
    Ok(())
}
