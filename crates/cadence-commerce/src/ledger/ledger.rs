//! Append-only order ledger with running aggregates.

use std::collections::HashMap;

use serde::Serialize;
use tracing::info;

use crate::error::CommerceError;
use crate::ids::OrderId;
use crate::ledger::Order;
use crate::money::{Currency, Money};

/// Running totals, maintained at append time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerAggregates {
    /// Sum of line quantities across all orders.
    pub total_items_purchased: i64,
    /// Sum of order totals.
    pub total_purchase_amount: Money,
    /// Sum of discounts applied.
    pub total_discount_amount: Money,
}

impl LedgerAggregates {
    fn zero(currency: Currency) -> Self {
        Self {
            total_items_purchased: 0,
            total_purchase_amount: Money::zero(currency),
            total_discount_amount: Money::zero(currency),
        }
    }

    fn with_order(&self, order: &Order) -> Result<Self, CommerceError> {
        Ok(Self {
            total_items_purchased: self
                .total_items_purchased
                .checked_add(order.item_count())
                .ok_or(CommerceError::Overflow)?,
            total_purchase_amount: self
                .total_purchase_amount
                .try_add(&order.total)
                .ok_or(CommerceError::Overflow)?,
            total_discount_amount: self
                .total_discount_amount
                .try_add(&order.discount_amount)
                .ok_or(CommerceError::Overflow)?,
        })
    }
}

/// Every placed order plus the global order counter.
#[derive(Debug, Clone)]
pub struct OrderLedger {
    orders: Vec<Order>,
    index: HashMap<OrderId, usize>,
    order_count: u64,
    currency: Currency,
    aggregates: LedgerAggregates,
}

impl OrderLedger {
    /// Create an empty ledger.
    pub fn new(currency: Currency) -> Self {
        Self {
            orders: Vec::new(),
            index: HashMap::new(),
            order_count: 0,
            currency,
            aggregates: LedgerAggregates::zero(currency),
        }
    }

    /// Identifier the next appended order should carry.
    ///
    /// Nothing is reserved; a checkout that fails before `append` leaves
    /// the identifier free for the next attempt.
    pub fn next_order_id(&self) -> OrderId {
        OrderId::from_sequence(self.order_count.saturating_add(1))
    }

    /// Store an order, bump the global counter and fold it into the aggregates.
    ///
    /// Returns the new order count. Nothing changes if the order id is
    /// already present or the aggregates would overflow.
    pub fn append(&mut self, order: Order) -> Result<u64, CommerceError> {
        if self.index.contains_key(&order.order_id) {
            return Err(CommerceError::DuplicateOrder(order.order_id.to_string()));
        }

        let aggregates = self.aggregates.with_order(&order)?;
        let order_count = self
            .order_count
            .checked_add(1)
            .ok_or(CommerceError::Overflow)?;

        info!(
            order = %order.order_id,
            user = %order.user_id,
            total = %order.total,
            order_count,
            "order recorded"
        );

        self.index.insert(order.order_id.clone(), self.orders.len());
        self.orders.push(order);
        self.aggregates = aggregates;
        self.order_count = order_count;

        Ok(order_count)
    }

    /// Current global order count.
    pub fn order_count(&self) -> u64 {
        self.order_count
    }

    /// Running aggregates.
    pub fn aggregates(&self) -> LedgerAggregates {
        self.aggregates
    }

    /// All orders in placement order.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Look up an order.
    pub fn order(&self, order_id: &OrderId) -> Option<&Order> {
        self.index.get(order_id).and_then(|&pos| self.orders.get(pos))
    }

    /// Drop every order and zero the counters.
    pub fn reset(&mut self) {
        self.orders.clear();
        self.index.clear();
        self.order_count = 0;
        self.aggregates = LedgerAggregates::zero(self.currency);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::LineItem;
    use crate::catalog::Catalog;
    use crate::ids::{ItemId, UserId};

    fn order(ledger: &OrderLedger, item: &str, qty: i64, discount_cents: i64) -> Order {
        let catalog = Catalog::seeded(Currency::USD);
        let line = LineItem::from_item(catalog.get(&ItemId::new(item)).unwrap(), qty).unwrap();
        let subtotal = line.subtotal;
        Order::new(
            ledger.next_order_id(),
            UserId::new("user1"),
            vec![line],
            subtotal,
            (discount_cents > 0).then(|| "DISCOUNT1".to_string()),
            Money::new(discount_cents, Currency::USD),
        )
        .unwrap()
    }

    #[test]
    fn test_order_ids_advance_only_on_append() {
        let mut ledger = OrderLedger::new(Currency::USD);
        assert_eq!(ledger.next_order_id().as_str(), "order001");
        assert_eq!(ledger.next_order_id().as_str(), "order001");

        let first = order(&ledger, "item002", 1, 0);
        ledger.append(first).unwrap();
        assert_eq!(ledger.next_order_id().as_str(), "order002");
    }

    #[test]
    fn test_append_counts_and_aggregates() {
        let mut ledger = OrderLedger::new(Currency::USD);

        let first = order(&ledger, "item001", 2, 0);
        assert_eq!(ledger.append(first).unwrap(), 1);

        let second = order(&ledger, "item002", 3, 900);
        assert_eq!(ledger.append(second).unwrap(), 2);

        let agg = ledger.aggregates();
        assert_eq!(agg.total_items_purchased, 5);
        assert_eq!(agg.total_purchase_amount.amount_cents, 199998 + 8997 - 900);
        assert_eq!(agg.total_discount_amount.amount_cents, 900);
        assert_eq!(ledger.order_count(), 2);
    }

    #[test]
    fn test_duplicate_order_rejected_without_side_effects() {
        let mut ledger = OrderLedger::new(Currency::USD);
        let first = order(&ledger, "item001", 1, 0);
        ledger.append(first.clone()).unwrap();

        assert_eq!(
            ledger.append(first),
            Err(CommerceError::DuplicateOrder("order001".into()))
        );
        assert_eq!(ledger.order_count(), 1);
        assert_eq!(ledger.aggregates().total_items_purchased, 1);
    }

    #[test]
    fn test_lookup_and_reset() {
        let mut ledger = OrderLedger::new(Currency::USD);
        let first = order(&ledger, "item004", 1, 0);
        let id = first.order_id.clone();
        ledger.append(first).unwrap();

        assert_eq!(ledger.order(&id).unwrap().total.amount_cents, 29999);

        ledger.reset();
        assert_eq!(ledger.order_count(), 0);
        assert!(ledger.orders().is_empty());
        assert_eq!(ledger.aggregates().total_items_purchased, 0);
        assert_eq!(ledger.next_order_id().as_str(), "order001");
    }
}
