//! Contact inbox commands.

use sable_core::MessageId;
use sable_storefront::Storefront;
use tracing::info;

/// List all contact messages, newest first.
///
/// # Errors
///
/// Returns an error if sign-in, the admin gate, or the fetch fails.
pub async fn list(front: &Storefront) -> Result<(), Box<dyn std::error::Error>> {
    let office = super::admin_office(front).await?;
    office.refresh_messages().await?;

    let items = front.messages.items();
    if items.is_empty() {
        info!("Inbox is empty");
        return Ok(());
    }

    for message in &items {
        let marker = if message.is_read { " " } else { "*" };
        info!(
            "{marker} {}  {:<24} {:<28} {}",
            message.id, message.name, message.email, message.subject
        );
    }
    info!("{} messages", items.len());
    Ok(())
}

/// Delete a contact message.
///
/// # Errors
///
/// Returns an error if sign-in, the admin gate, or the delete fails.
pub async fn delete(front: &Storefront, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let office = super::admin_office(front).await?;

    let id = MessageId::new(id);
    office.remove_message(&id).await?;

    info!("Message {id} deleted");
    Ok(())
}
