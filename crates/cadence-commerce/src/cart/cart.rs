//! Cart and cart entry types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::CommerceError;
use crate::ids::{ItemId, UserId};

/// A shopping cart owned by one user.
///
/// Holds item identifiers and quantities only; prices are looked up from
/// the catalog whenever the cart is viewed or checked out.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Owning user.
    pub user_id: UserId,
    /// Entries in first-insertion order.
    pub entries: Vec<CartEntry>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last mutation time.
    pub updated_at: DateTime<Utc>,
}

/// One line of a cart.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    /// Item being purchased.
    pub item_id: ItemId,
    /// Quantity, always at least 1.
    pub quantity: i64,
}

impl Cart {
    /// Create an empty cart for a user.
    pub fn new(user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            entries: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Add `quantity` of an item, merging with an existing entry.
    ///
    /// Returns the resulting quantity of that entry. Fails if the quantity
    /// is not positive or the merged quantity would exceed `max_quantity`.
    pub fn add_item(
        &mut self,
        item_id: ItemId,
        quantity: i64,
        max_quantity: i64,
    ) -> Result<i64, CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }

        if let Some(existing) = self.entries.iter_mut().find(|e| e.item_id == item_id) {
            let new_quantity = existing
                .quantity
                .checked_add(quantity)
                .ok_or(CommerceError::Overflow)?;

            if new_quantity > max_quantity {
                return Err(CommerceError::QuantityExceedsLimit(new_quantity, max_quantity));
            }

            existing.quantity = new_quantity;
            self.updated_at = Utc::now();
            return Ok(new_quantity);
        }

        if quantity > max_quantity {
            return Err(CommerceError::QuantityExceedsLimit(quantity, max_quantity));
        }

        self.entries.push(CartEntry { item_id, quantity });
        self.updated_at = Utc::now();
        Ok(quantity)
    }

    /// Remove every entry. The cart itself remains for reuse.
    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            self.entries.clear();
            self.updated_at = Utc::now();
        }
    }

    /// Quantity of an item, zero if absent.
    pub fn quantity_of(&self, item_id: &ItemId) -> i64 {
        self.entries
            .iter()
            .find(|e| &e.item_id == item_id)
            .map(|e| e.quantity)
            .unwrap_or(0)
    }

    /// Get total item count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.entries.iter().map(|e| e.quantity).sum()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
