//! Order types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cart::LineItem;
use crate::error::CommerceError;
use crate::ids::{OrderId, UserId};
use crate::money::Money;

/// A placed order. Immutable once appended to the ledger.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique order identifier.
    pub order_id: OrderId,
    /// Customer.
    pub user_id: UserId,
    /// Lines with prices snapshotted at checkout.
    pub items: Vec<LineItem>,
    /// Sum of line subtotals.
    pub subtotal: Money,
    /// Code redeemed by this order.
    pub discount_code: Option<String>,
    /// Amount taken off the subtotal.
    pub discount_amount: Money,
    /// Amount charged (subtotal - discount).
    pub total: Money,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Assemble an order, deriving the total.
    ///
    /// Fails if the discount is negative or larger than the subtotal.
    pub fn new(
        order_id: OrderId,
        user_id: UserId,
        items: Vec<LineItem>,
        subtotal: Money,
        discount_code: Option<String>,
        discount_amount: Money,
    ) -> Result<Self, CommerceError> {
        if discount_amount.is_negative() || discount_amount.amount_cents > subtotal.amount_cents {
            return Err(CommerceError::InvalidDiscount {
                discount: discount_amount.to_string(),
                subtotal: subtotal.to_string(),
            });
        }

        let total = subtotal.try_subtract(&discount_amount).ok_or_else(|| {
            CommerceError::CurrencyMismatch {
                expected: subtotal.currency.code().to_string(),
                got: discount_amount.currency.code().to_string(),
            }
        })?;

        Ok(Self {
            order_id,
            user_id,
            items,
            subtotal,
            discount_code,
            discount_amount,
            total,
            created_at: Utc::now(),
        })
    }

    /// Get total item count.
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}
