//! Order queue commands.

use sable_core::{OrderId, OrderStatus};
use sable_storefront::Storefront;
use tracing::info;

/// List all orders, newest first.
///
/// # Errors
///
/// Returns an error if sign-in, the admin gate, or the fetch fails.
pub async fn list(front: &Storefront) -> Result<(), Box<dyn std::error::Error>> {
    let office = super::admin_office(front).await?;
    office.refresh_orders().await?;

    let items = front.orders.items();
    if items.is_empty() {
        info!("No orders");
        return Ok(());
    }

    for order in &items {
        info!(
            "{}  {:<10} {:<24} {:>10}  {} item(s)",
            order.reference(),
            order.status,
            order.customer_name,
            order.total_amount,
            order.items.len()
        );
    }
    info!("{} orders", items.len());
    Ok(())
}

/// Move an order through its lifecycle.
///
/// # Errors
///
/// Returns an error if the status string is unknown, or if sign-in, the
/// admin gate, or the patch fails.
pub async fn set_status(
    front: &Storefront,
    id: &str,
    status: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let status: OrderStatus = status.parse()?;
    let office = super::admin_office(front).await?;

    let id = OrderId::new(id);
    office.set_order_status(&id, status).await?;

    info!("Order {id} is now {status}");
    Ok(())
}

/// Force-cancel an order. The record survives with status `cancelled`.
///
/// # Errors
///
/// Returns an error if sign-in, the admin gate, or the cancellation fails.
pub async fn cancel(front: &Storefront, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let office = super::admin_office(front).await?;

    let id = OrderId::new(id);
    office.cancel_order(&id).await?;

    info!("Order {id} cancelled");
    Ok(())
}
