//! CLI command implementations.

pub mod messages;
pub mod orders;
pub mod products;
pub mod seed;

use std::sync::Arc;

use sable_core::Email;
use sable_storefront::Storefront;
use sable_storefront::admin::BackOffice;
use sable_storefront::backend::RestBackend;
use sable_storefront::config::StorefrontConfig;

/// Build a storefront wired to the hosted platform.
pub fn storefront(config: &StorefrontConfig) -> Result<Storefront, Box<dyn std::error::Error>> {
    let backend = Arc::new(RestBackend::new(&config.backend)?);
    Ok(Storefront::new(backend))
}

/// Sign in the admin account and open the back-office.
///
/// Reads `SABLE_ADMIN_EMAIL` and `SABLE_ADMIN_PASSWORD`. The back-office
/// itself rejects accounts without the admin flag.
pub async fn admin_office(
    front: &Storefront,
) -> Result<BackOffice, Box<dyn std::error::Error>> {
    let email = std::env::var("SABLE_ADMIN_EMAIL").map_err(|_| "SABLE_ADMIN_EMAIL not set")?;
    let password =
        std::env::var("SABLE_ADMIN_PASSWORD").map_err(|_| "SABLE_ADMIN_PASSWORD not set")?;

    let email = Email::parse(&email)?;
    front.auth.sign_in(&email, &password).await?;

    tracing::info!("Signed in as {email}");
    Ok(front.back_office())
}
