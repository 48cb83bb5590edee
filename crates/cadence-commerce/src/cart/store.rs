//! Per-user cart storage.

use std::collections::HashMap;

use tracing::debug;

use crate::cart::{Cart, CartView};
use crate::catalog::Catalog;
use crate::error::CommerceError;
use crate::ids::{ItemId, UserId};
use crate::money::Currency;

/// Carts keyed by user. A user with no entry has an empty cart.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    carts: HashMap<UserId, Cart>,
}

impl CartStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item to a user's cart, creating the cart on first use.
    ///
    /// The item must exist in the catalog. Returns the updated view.
    pub fn add_item(
        &mut self,
        catalog: &Catalog,
        user_id: &UserId,
        item_id: &ItemId,
        quantity: i64,
        max_quantity: i64,
        currency: Currency,
    ) -> Result<CartView, CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        if !catalog.contains(item_id) {
            return Err(CommerceError::ItemNotFound(item_id.to_string()));
        }

        let cart = self
            .carts
            .entry(user_id.clone())
            .or_insert_with(|| Cart::new(user_id.clone()));
        let new_quantity = cart.add_item(item_id.clone(), quantity, max_quantity)?;

        debug!(user = %user_id, item = %item_id, quantity = new_quantity, "cart updated");

        CartView::from_cart(cart, catalog, currency)
    }

    /// Current view of a user's cart.
    pub fn view(
        &self,
        catalog: &Catalog,
        user_id: &UserId,
        currency: Currency,
    ) -> Result<CartView, CommerceError> {
        match self.carts.get(user_id) {
            Some(cart) => CartView::from_cart(cart, catalog, currency),
            None => Ok(CartView::empty(user_id.clone(), currency)),
        }
    }

    /// Borrow a user's cart, if one was ever created.
    pub fn get(&self, user_id: &UserId) -> Option<&Cart> {
        self.carts.get(user_id)
    }

    /// Empty a user's cart. Idempotent.
    pub fn clear(&mut self, user_id: &UserId) {
        if let Some(cart) = self.carts.get_mut(user_id) {
            cart.clear();
        }
    }

    /// Number of carts ever created.
    pub fn len(&self) -> usize {
        self.carts.len()
    }

    /// Check if no cart exists.
    pub fn is_empty(&self) -> bool {
        self.carts.is_empty()
    }

    /// Drop every cart.
    pub fn reset(&mut self) {
        self.carts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(
        store: &mut CartStore,
        catalog: &Catalog,
        user: &str,
        item: &str,
        qty: i64,
    ) -> Result<CartView, CommerceError> {
        store.add_item(
            catalog,
            &UserId::new(user),
            &ItemId::new(item),
            qty,
            1000,
            Currency::USD,
        )
    }

    #[test]
    fn test_add_creates_cart() {
        let catalog = Catalog::seeded(Currency::USD);
        let mut store = CartStore::new();

        let view = add(&mut store, &catalog, "user1", "item001", 2).unwrap();
        assert_eq!(view.subtotal.amount_cents, 199998);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_unknown_item_rejected() {
        let catalog = Catalog::seeded(Currency::USD);
        let mut store = CartStore::new();

        let err = add(&mut store, &catalog, "user1", "item999", 1).unwrap_err();
        assert_eq!(err, CommerceError::ItemNotFound("item999".into()));
        assert!(store.is_empty());
    }

    #[test]
    fn test_non_positive_quantity_rejected_before_cart_creation() {
        let catalog = Catalog::seeded(Currency::USD);
        let mut store = CartStore::new();

        assert!(add(&mut store, &catalog, "user1", "item001", 0).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_view_unknown_user_is_empty() {
        let catalog = Catalog::seeded(Currency::USD);
        let store = CartStore::new();

        let view = store
            .view(&catalog, &UserId::new("ghost"), Currency::USD)
            .unwrap();
        assert!(view.is_empty());
        assert_eq!(view.user_id.as_str(), "ghost");
    }

    #[test]
    fn test_carts_are_per_user() {
        let catalog = Catalog::seeded(Currency::USD);
        let mut store = CartStore::new();

        add(&mut store, &catalog, "alice", "item001", 1).unwrap();
        add(&mut store, &catalog, "bob", "item002", 4).unwrap();

        let alice = store.get(&UserId::new("alice")).unwrap();
        assert_eq!(alice.item_count(), 1);
        let bob = store.get(&UserId::new("bob")).unwrap();
        assert_eq!(bob.item_count(), 4);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let catalog = Catalog::seeded(Currency::USD);
        let mut store = CartStore::new();
        let user = UserId::new("user1");

        add(&mut store, &catalog, "user1", "item003", 1).unwrap();
        store.clear(&user);
        store.clear(&user);
        store.clear(&UserId::new("never-seen"));

        assert!(store.get(&user).unwrap().is_empty());
        assert_eq!(store.len(), 1);
    }
}
