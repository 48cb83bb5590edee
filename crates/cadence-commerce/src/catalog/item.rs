//! Catalog items.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::CommerceError;
use crate::ids::ItemId;
use crate::money::{Currency, Money};

/// An item that can be purchased.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique item identifier.
    pub item_id: ItemId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Money,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Item {
    /// Create a new item.
    pub fn new(item_id: impl Into<ItemId>, name: impl Into<String>, price: Money) -> Self {
        Self {
            item_id: item_id.into(),
            name: name.into(),
            price,
            description: None,
        }
    }

    /// Attach a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Read-only mapping from item identifier to item.
///
/// Iteration follows the order items were supplied in.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<Item>,
    index: HashMap<ItemId, usize>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate identifiers and negative prices.
    pub fn new(items: Vec<Item>) -> Result<Self, CommerceError> {
        let mut index = HashMap::with_capacity(items.len());
        for (pos, item) in items.iter().enumerate() {
            if item.price.is_negative() {
                return Err(CommerceError::InvalidConfig(format!(
                    "item '{}' has a negative price",
                    item.item_id
                )));
            }
            if index.insert(item.item_id.clone(), pos).is_some() {
                return Err(CommerceError::DuplicateItem(item.item_id.to_string()));
            }
        }
        Ok(Self { items, index })
    }

    /// The default demo catalog.
    pub fn seeded(currency: Currency) -> Self {
        let items = [
            ("item001", "Laptop", 99999, "High-performance laptop"),
            ("item002", "Mouse", 2999, "Wireless mouse"),
            ("item003", "Keyboard", 7999, "Mechanical keyboard"),
            ("item004", "Monitor", 29999, "27-inch 4K monitor"),
            ("item005", "Headphones", 14999, "Noise-cancelling headphones"),
            ("item006", "Webcam", 8999, "HD webcam"),
        ];

        let items: Vec<Item> = items
            .into_iter()
            .map(|(id, name, cents, description)| {
                Item::new(id, name, Money::new(cents, currency)).with_description(description)
            })
            .collect();
        let index = items
            .iter()
            .enumerate()
            .map(|(pos, item)| (item.item_id.clone(), pos))
            .collect();
        Self { items, index }
    }

    /// Look up an item.
    pub fn get(&self, item_id: &ItemId) -> Option<&Item> {
        self.index.get(item_id).and_then(|&pos| self.items.get(pos))
    }

    /// Check whether an item exists.
    pub fn contains(&self, item_id: &ItemId) -> bool {
        self.index.contains_key(item_id)
    }

    /// All items in catalog order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
