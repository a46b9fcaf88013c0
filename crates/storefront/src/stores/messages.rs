//! Contact messages store.
//!
//! Mirrors the `contact_messages` collection: the public contact form
//! appends, the back-office lists and removes. Append-only otherwise.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::instrument;

use sable_core::MessageId;

use crate::backend::{BackendError, MessagesApi};
use crate::models::{ContactMessage, NewMessage};

/// Pure messages state.
#[derive(Debug, Clone, Default)]
pub struct MessagesState {
    pub items: Vec<ContactMessage>,
    pub loading: bool,
    pub error: Option<String>,
}

impl MessagesState {
    pub fn op_started(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn op_failed(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }

    pub fn fetched(&mut self, items: Vec<ContactMessage>) {
        self.loading = false;
        self.items = items;
    }

    /// A submit completed: prepend, keeping the newest-first display order.
    pub fn created(&mut self, message: ContactMessage) {
        self.loading = false;
        self.items.insert(0, message);
    }

    pub fn removed(&mut self, id: &MessageId) {
        self.loading = false;
        self.items.retain(|m| &m.id != id);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

/// Thread-safe container around [`MessagesState`] plus the backend calls.
pub struct MessagesStore {
    api: Arc<dyn MessagesApi>,
    state: RwLock<MessagesState>,
}

impl MessagesStore {
    pub fn new(api: Arc<dyn MessagesApi>) -> Self {
        Self {
            api,
            state: RwLock::new(MessagesState::default()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, MessagesState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, MessagesState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Load the full message list, replacing the in-memory one.
    #[instrument(skip(self))]
    pub async fn fetch_all(&self) -> Result<(), BackendError> {
        self.write().op_started();

        match self.api.list_messages().await {
            Ok(items) => {
                self.write().fetched(items);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("message fetch failed: {e}");
                self.write().op_failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Submit a contact-form message. The backend stores it unread.
    #[instrument(skip(self, draft), fields(subject = %draft.subject))]
    pub async fn submit(&self, draft: NewMessage) -> Result<ContactMessage, BackendError> {
        self.write().op_started();

        match self.api.insert_message(draft).await {
            Ok(message) => {
                self.write().created(message.clone());
                Ok(message)
            }
            Err(e) => {
                tracing::warn!("message submit failed: {e}");
                self.write().op_failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Delete a message and drop it from the local list.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: &MessageId) -> Result<(), BackendError> {
        self.write().op_started();

        match self.api.delete_message(id).await {
            Ok(()) => {
                self.write().removed(id);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("message delete failed: {e}");
                self.write().op_failed(e.to_string());
                Err(e)
            }
        }
    }

    #[must_use]
    pub fn items(&self) -> Vec<ContactMessage> {
        self.read().items.clone()
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.read().loading
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    pub fn clear_error(&self) {
        self.write().clear_error();
    }

    /// A copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> MessagesState {
        self.read().clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::backend::MemoryBackend;
    use crate::backend::memory::Surface;

    use super::*;

    fn draft(subject: &str) -> NewMessage {
        NewMessage {
            name: "Jo Field".to_owned(),
            email: "jo@example.com".to_owned(),
            phone: None,
            subject: subject.to_owned(),
            message: "Where is my order?".to_owned(),
        }
    }

    fn store() -> (Arc<MemoryBackend>, MessagesStore) {
        let backend = Arc::new(MemoryBackend::new());
        let store = MessagesStore::new(backend.clone());
        (backend, store)
    }

    #[tokio::test]
    async fn test_submit_stores_unread() {
        let (backend, store) = store();

        let message = store.submit(draft("Order status")).await.unwrap();
        assert!(!message.is_read);
        assert!(!backend.stored_messages()[0].is_read);
    }

    #[tokio::test]
    async fn test_submit_prepends() {
        let (_, store) = store();

        store.submit(draft("First")).await.unwrap();
        store.submit(draft("Second")).await.unwrap();

        assert_eq!(store.items()[0].subject, "Second");
    }

    #[tokio::test]
    async fn test_remove_filters() {
        let (_, store) = store();
        let message = store.submit(draft("Order status")).await.unwrap();

        store.remove(&message.id).await.unwrap();
        assert!(store.items().is_empty());
    }

    #[tokio::test]
    async fn test_failed_submit_sets_error() {
        let (backend, store) = store();
        backend.fail(Surface::Messages);

        let result = store.submit(draft("Nope")).await;
        assert!(result.is_err());
        assert!(store.items().is_empty());
        assert!(store.error().is_some());
    }
}
