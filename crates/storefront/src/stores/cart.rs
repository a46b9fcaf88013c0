//! Shopping bag store.
//!
//! Pure in-memory: nothing here talks to the backend, and nothing is
//! persisted. The cart panel's open/closed flag lives alongside the lines
//! because the two always change together in the UI.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use sable_core::ProductId;

use crate::models::Product;

/// One line item in the shopping bag.
///
/// Line identity is the `(product id, selected size)` pair: the same
/// product in two sizes is two lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product: Product,
    /// Always at least 1; a line that would drop below 1 is removed.
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_size: Option<String>,
}

impl CartLine {
    /// Parsed price times quantity. NaN when the price does not parse.
    #[must_use]
    pub fn line_total(&self) -> f64 {
        self.product.price.amount() * f64::from(self.quantity)
    }

    fn matches(&self, id: &ProductId, size: Option<&str>) -> bool {
        &self.product.id == id && self.selected_size.as_deref() == size
    }
}

/// Pure cart state: lines in display order plus the panel flag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartState {
    pub lines: Vec<CartLine>,
    pub is_open: bool,
}

impl CartState {
    /// Add one unit of a product in the given size.
    ///
    /// If a line with the same `(product id, size)` pair exists its
    /// quantity increments; otherwise a new line with quantity 1 is
    /// appended. Never fails.
    pub fn add_line(&mut self, product: &Product, size: Option<&str>) {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.matches(&product.id, size))
        {
            line.quantity += 1;
            return;
        }

        self.lines.push(CartLine {
            product: product.clone(),
            quantity: 1,
            selected_size: size.map(str::to_owned),
        });
    }

    /// Remove the matching line. No-op when absent.
    pub fn remove_line(&mut self, id: &ProductId, size: Option<&str>) {
        self.lines.retain(|line| !line.matches(id, size));
    }

    /// Set the matching line's quantity.
    ///
    /// A quantity below 1 removes the line instead of clamping it. There
    /// is no upper bound. No-op when the line is absent.
    pub fn set_quantity(&mut self, id: &ProductId, size: Option<&str>, quantity: i64) {
        if quantity < 1 {
            self.remove_line(id, size);
            return;
        }

        if let Some(line) = self.lines.iter_mut().find(|line| line.matches(id, size)) {
            line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
    }

    /// Empty the bag. The panel flag is untouched.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn open(&mut self) {
        self.is_open = true;
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    pub fn toggle(&mut self) {
        self.is_open = !self.is_open;
    }

    /// Derived total: sum of parsed price times quantity over all lines.
    ///
    /// Not stored; recomputed from line data on every call. A price that
    /// fails to parse contributes NaN, which poisons the sum silently.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Thread-safe container around [`CartState`].
#[derive(Debug, Default)]
pub struct CartStore {
    state: RwLock<CartState>,
}

impl CartStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, CartState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CartState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_line(&self, product: &Product, size: Option<&str>) {
        self.write().add_line(product, size);
    }

    pub fn remove_line(&self, id: &ProductId, size: Option<&str>) {
        self.write().remove_line(id, size);
    }

    pub fn set_quantity(&self, id: &ProductId, size: Option<&str>, quantity: i64) {
        self.write().set_quantity(id, size, quantity);
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    pub fn open(&self) {
        self.write().open();
    }

    pub fn close(&self) {
        self.write().close();
    }

    pub fn toggle(&self) {
        self.write().toggle();
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.read().total()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.read().is_open
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// A copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> CartState {
        self.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use sable_core::{Category, Price};

    use super::*;

    fn product(id: &str, price: &str) -> Product {
        let now = Utc::now();
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            category: Category::Essentials,
            price: Price::new(price),
            description: None,
            images: vec![format!("https://cdn.example/{id}.jpg")],
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_add_line_merges_same_product_and_size() {
        let mut cart = CartState::default();
        let tee = product("tee", "$45");

        cart.add_line(&tee, Some("M"));
        cart.add_line(&tee, Some("M"));
        cart.add_line(&tee, Some("M"));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines[0].quantity, 3);
    }

    #[test]
    fn test_add_line_distinct_sizes_are_distinct_lines() {
        let mut cart = CartState::default();
        let tee = product("tee", "$45");

        cart.add_line(&tee, Some("M"));
        cart.add_line(&tee, Some("L"));
        cart.add_line(&tee, None);

        assert_eq!(cart.len(), 3);
        assert!(cart.lines.iter().all(|line| line.quantity == 1));
    }

    #[test]
    fn test_remove_line_matches_pair() {
        let mut cart = CartState::default();
        let tee = product("tee", "$45");

        cart.add_line(&tee, Some("M"));
        cart.add_line(&tee, Some("L"));

        cart.remove_line(&tee.id, Some("M"));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines[0].selected_size.as_deref(), Some("L"));

        // Removing a pair that is not present is a no-op.
        cart.remove_line(&tee.id, Some("XL"));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_set_quantity_zero_or_negative_removes() {
        let mut cart = CartState::default();
        let tee = product("tee", "$45");

        cart.add_line(&tee, None);
        cart.set_quantity(&tee.id, None, 0);
        assert!(cart.is_empty());

        cart.add_line(&tee, None);
        cart.set_quantity(&tee.id, None, -3);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_positive_never_below_one() {
        let mut cart = CartState::default();
        let tee = product("tee", "$45");

        cart.add_line(&tee, None);
        cart.set_quantity(&tee.id, None, 7);
        assert_eq!(cart.lines[0].quantity, 7);

        cart.set_quantity(&tee.id, None, 1);
        assert_eq!(cart.lines[0].quantity, 1);
    }

    #[test]
    fn test_set_quantity_missing_line_is_noop() {
        let mut cart = CartState::default();
        let tee = product("tee", "$45");

        cart.set_quantity(&tee.id, None, 5);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_total_empty_cart_is_zero() {
        let cart = CartState::default();
        assert_eq!(cart.total(), 0.0);
    }

    #[test]
    fn test_total_example() {
        // Product A "$50" qty 2, product B "$30" qty 1 -> 130.
        let mut cart = CartState::default();
        let a = product("a", "$50");
        let b = product("b", "$30");

        cart.add_line(&a, None);
        cart.add_line(&a, None);
        cart.add_line(&b, None);

        assert_eq!(cart.total(), 130.0);
    }

    #[test]
    fn test_total_commutes_over_insertion_order() {
        let a = product("a", "$19.99");
        let b = product("b", "$5");
        let c = product("c", "$7.50");

        let mut forward = CartState::default();
        forward.add_line(&a, None);
        forward.add_line(&b, None);
        forward.add_line(&c, None);

        let mut backward = CartState::default();
        backward.add_line(&c, None);
        backward.add_line(&b, None);
        backward.add_line(&a, None);

        assert_eq!(forward.total(), backward.total());
    }

    #[test]
    fn test_unparseable_price_poisons_total() {
        let mut cart = CartState::default();
        cart.add_line(&product("a", "$50"), None);
        cart.add_line(&product("b", "call us"), None);

        assert!(cart.total().is_nan());
    }

    #[test]
    fn test_panel_flag() {
        let mut cart = CartState::default();
        assert!(!cart.is_open);

        cart.open();
        assert!(cart.is_open);

        cart.toggle();
        assert!(!cart.is_open);

        cart.toggle();
        cart.close();
        assert!(!cart.is_open);
    }

    #[test]
    fn test_clear_keeps_panel_flag() {
        let mut cart = CartState::default();
        cart.add_line(&product("a", "$50"), None);
        cart.open();

        cart.clear();
        assert!(cart.is_empty());
        assert!(cart.is_open);
    }

    #[test]
    fn test_store_wrapper_shares_state() {
        let store = CartStore::new();
        let tee = product("tee", "$45");

        store.add_line(&tee, Some("M"));
        store.add_line(&tee, Some("M"));

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.lines[0].quantity, 2);
        assert_eq!(store.total(), 90.0);
    }
}
