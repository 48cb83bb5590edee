//! Cart pricing calculations.

use serde::Serialize;

use crate::cart::Cart;
use crate::catalog::{Catalog, Item};
use crate::error::CommerceError;
use crate::ids::{ItemId, UserId};
use crate::money::{Currency, Money};

/// A priced line, used both in cart views and in placed orders.
///
/// The unit price is a snapshot: once copied into an order it no longer
/// follows the catalog.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Item identifier.
    pub item_id: ItemId,
    /// Item name at pricing time.
    pub name: String,
    /// Unit price at pricing time.
    pub price: Money,
    /// Quantity.
    pub quantity: i64,
    /// Subtotal (price * quantity).
    pub subtotal: Money,
}

impl LineItem {
    /// Price `quantity` units of a catalog item.
    pub fn from_item(item: &Item, quantity: i64) -> Result<Self, CommerceError> {
        let subtotal = item
            .price
            .try_multiply(quantity)
            .ok_or(CommerceError::Overflow)?;
        Ok(Self {
            item_id: item.item_id.clone(),
            name: item.name.clone(),
            price: item.price,
            quantity,
            subtotal,
        })
    }
}

/// Current contents of a user's cart, priced against the live catalog.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    /// Owning user.
    pub user_id: UserId,
    /// Priced lines.
    pub items: Vec<LineItem>,
    /// Sum of line subtotals.
    pub subtotal: Money,
    /// Amount payable (no discount is applied before checkout).
    pub total: Money,
}

impl CartView {
    /// View of a cart with nothing in it.
    pub fn empty(user_id: UserId, currency: Currency) -> Self {
        Self {
            user_id,
            items: Vec::new(),
            subtotal: Money::zero(currency),
            total: Money::zero(currency),
        }
    }

    /// Price a cart.
    pub fn from_cart(cart: &Cart, catalog: &Catalog, currency: Currency) -> Result<Self, CommerceError> {
        let (items, subtotal) = price_lines(cart, catalog, currency)?;
        Ok(Self {
            user_id: cart.user_id.clone(),
            items,
            subtotal,
            total: subtotal,
        })
    }

    /// Total quantity across lines.
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Check if the view has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Price every cart entry against the catalog and sum the subtotals.
///
/// Entries whose item is no longer in the catalog are skipped.
pub fn price_lines(
    cart: &Cart,
    catalog: &Catalog,
    currency: Currency,
) -> Result<(Vec<LineItem>, Money), CommerceError> {
    let items = cart
        .entries
        .iter()
        .filter_map(|entry| {
            catalog
                .get(&entry.item_id)
                .map(|item| LineItem::from_item(item, entry.quantity))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let subtotal = Money::try_sum(items.iter().map(|i| &i.subtotal), currency).ok_or_else(|| {
        CommerceError::CurrencyMismatch {
            expected: currency.code().to_string(),
            got: "mixed".to_string(),
        }
    })?;

    Ok((items, subtotal))
}
