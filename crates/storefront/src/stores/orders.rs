//! Orders store.
//!
//! Mirrors the `orders` collection. Orders are only ever created and
//! status-patched; "removing" one is a forced cancellation on the backend
//! followed by dropping it from the local list. The document survives.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::instrument;

use sable_core::{OrderId, OrderStatus};

use crate::backend::{BackendError, OrdersApi};
use crate::models::{Order, OrderDraft};

/// Pure orders state.
#[derive(Debug, Clone, Default)]
pub struct OrdersState {
    pub items: Vec<Order>,
    pub loading: bool,
    pub error: Option<String>,
}

impl OrdersState {
    pub fn op_started(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn op_failed(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }

    pub fn fetched(&mut self, items: Vec<Order>) {
        self.loading = false;
        self.items = items;
    }

    /// A create completed: prepend, keeping the newest-first display order.
    pub fn created(&mut self, order: Order) {
        self.loading = false;
        self.items.insert(0, order);
    }

    /// A status patch was acknowledged by the backend; mirror it locally.
    /// Absent id: unchanged. Does not touch the loading flag.
    pub fn status_updated(&mut self, id: &OrderId, status: OrderStatus) {
        if let Some(order) = self.items.iter_mut().find(|o| &o.id == id) {
            order.status = status;
        }
    }

    /// A forced cancellation completed: drop the order from the list.
    pub fn removed(&mut self, id: &OrderId) {
        self.loading = false;
        self.items.retain(|o| &o.id != id);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

/// Thread-safe container around [`OrdersState`] plus the backend calls.
pub struct OrdersStore {
    api: Arc<dyn OrdersApi>,
    state: RwLock<OrdersState>,
}

impl OrdersStore {
    pub fn new(api: Arc<dyn OrdersApi>) -> Self {
        Self {
            api,
            state: RwLock::new(OrdersState::default()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, OrdersState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, OrdersState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Load the full order list, replacing the in-memory one.
    #[instrument(skip(self))]
    pub async fn fetch_all(&self) -> Result<(), BackendError> {
        self.write().op_started();

        match self.api.list_orders().await {
            Ok(items) => {
                self.write().fetched(items);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("order fetch failed: {e}");
                self.write().op_failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Submit an order; the backend assigns the id.
    #[instrument(skip(self, draft), fields(lines = draft.items.len()))]
    pub async fn create(&self, draft: OrderDraft) -> Result<Order, BackendError> {
        self.write().op_started();

        match self.api.insert_order(draft).await {
            Ok(order) => {
                self.write().created(order.clone());
                Ok(order)
            }
            Err(e) => {
                tracing::warn!("order create failed: {e}");
                self.write().op_failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Patch an order's status on the backend, then mirror it locally.
    ///
    /// The local patch is tied to the fulfilled outcome - it never applies
    /// before the backend acknowledges.
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), BackendError> {
        match self.api.set_order_status(id, status).await {
            Ok(()) => {
                self.write().status_updated(id, status);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("order status update failed: {e}");
                self.write().op_failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Force-cancel an order and drop it from the local list.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: &OrderId) -> Result<(), BackendError> {
        self.write().op_started();

        match self.api.cancel_order(id).await {
            Ok(()) => {
                self.write().removed(id);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("order cancellation failed: {e}");
                self.write().op_failed(e.to_string());
                Err(e)
            }
        }
    }

    #[must_use]
    pub fn items(&self) -> Vec<Order> {
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
    pub fn snapshot(&self) -> OrdersState {
        self.read().clone()
    }
}
