//! Seed the catalog with the launch collection.

use sable_core::{Category, Price};
use sable_storefront::Storefront;
use sable_storefront::models::NewProduct;
use tracing::info;

/// The launch collection.
const LAUNCH: &[(&str, Category, &str, &str)] = &[
    (
        "Heavyweight Boxy Tee",
        Category::Essentials,
        "$45",
        "280gsm organic cotton, garment-dyed.",
    ),
    (
        "Wide Tapered Cargo",
        Category::Streetwear,
        "$110",
        "Ripstop cotton, adjustable hem.",
    ),
    (
        "Wool Overshirt",
        Category::Outerwear,
        "$160",
        "Brushed wool blend, horn buttons.",
    ),
    (
        "Archive Coach Jacket",
        Category::LimitedEdition,
        "$190",
        "Numbered run of 150.",
    ),
];

/// Create the launch collection through the admin surface.
///
/// # Errors
///
/// Returns an error if sign-in fails, the account is not an admin, or any
/// create is rejected by the backend.
pub async fn run(front: &Storefront) -> Result<(), Box<dyn std::error::Error>> {
    let office = super::admin_office(front).await?;

    for (title, category, price, description) in LAUNCH {
        let product = office
            .create_product(NewProduct {
                title: (*title).to_owned(),
                category: *category,
                price: Price::new(*price),
                description: Some((*description).to_owned()),
                images: vec![format!(
                    "https://cdn.sable.studio/products/{}.jpg",
                    title.to_lowercase().replace(' ', "-")
                )],
            })
            .await?;

        info!("Seeded {} ({})", product.title, product.id);
    }

    info!("Seeded {} products", LAUNCH.len());
    Ok(())
}
