//! Catalog commands.

use sable_storefront::Storefront;
use tracing::info;

/// List all catalog products, newest first.
///
/// # Errors
///
/// Returns an error if the fetch fails.
pub async fn list(front: &Storefront) -> Result<(), Box<dyn std::error::Error>> {
    front.catalog.fetch_all().await?;

    let items = front.catalog.items();
    if items.is_empty() {
        info!("Catalog is empty");
        return Ok(());
    }

    for product in &items {
        info!(
            "{}  {:<28} {:<16} {}",
            product.id, product.title, product.category, product.price
        );
    }
    info!("{} products", items.len());
    Ok(())
}
