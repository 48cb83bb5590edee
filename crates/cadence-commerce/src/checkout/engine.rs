//! Checkout state machine.

use serde::Serialize;
use tracing::{info, warn};

use crate::cart::{price_lines, CartStore};
use crate::catalog::Catalog;
use crate::config::ShopConfig;
use crate::discount::{DiscountRegistry, Redemption, RejectReason};
use crate::error::CommerceError;
use crate::ids::UserId;
use crate::ledger::{Order, OrderLedger};
use crate::money::Money;

/// A discount code that was presented but not applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedCode {
    /// The code as presented.
    pub code: String,
    /// Why it was not applied.
    pub reason: RejectReason,
}

/// Outcome of a successful checkout.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
    /// Always true; failures are returned as errors.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// The placed order.
    pub order: Order,
    /// Code minted because this order hit the cadence.
    pub new_discount_code: Option<String>,
    /// Code presented but not applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected_code: Option<RejectedCode>,
    /// Global order count after this order.
    pub order_count: u64,
}

/// Runs one checkout against borrowed shop components.
///
/// The engine owns no state of its own; callers hand it the cart store,
/// registry and ledger for the duration of a single checkout.
pub struct CheckoutEngine<'a> {
    catalog: &'a Catalog,
    config: &'a ShopConfig,
    carts: &'a mut CartStore,
    discounts: &'a mut DiscountRegistry,
    ledger: &'a mut OrderLedger,
}

impl<'a> CheckoutEngine<'a> {
    pub fn new(
        catalog: &'a Catalog,
        config: &'a ShopConfig,
        carts: &'a mut CartStore,
        discounts: &'a mut DiscountRegistry,
        ledger: &'a mut OrderLedger,
    ) -> Self {
        Self {
            catalog,
            config,
            carts,
            discounts,
            ledger,
        }
    }

    /// Place an order from the user's cart.
    ///
    /// An empty cart fails with `EmptyCart` before anything is mutated. A
    /// code that cannot be applied does not fail the checkout. The code is
    /// only marked used once the order is in the ledger, so a failed
    /// checkout leaves the registry untouched. The order counter is bumped
    /// before the issuance check, so the Nth order mints its own code.
    pub fn checkout(
        &mut self,
        user_id: &UserId,
        discount_code: Option<&str>,
    ) -> Result<CheckoutReceipt, CommerceError> {
        let currency = self.config.currency;

        let cart = self
            .carts
            .get(user_id)
            .filter(|cart| !cart.is_empty())
            .ok_or_else(|| CommerceError::EmptyCart(user_id.to_string()))?;

        let (items, subtotal) = price_lines(cart, self.catalog, currency)?;
        if items.is_empty() {
            return Err(CommerceError::EmptyCart(user_id.to_string()));
        }

        let order_id = self.ledger.next_order_id();

        let mut applied_code = None;
        let mut discount_amount = Money::zero(currency);
        let mut rejected_code = None;

        if let Some(code) = discount_code.map(str::trim).filter(|c| !c.is_empty()) {
            match self.discounts.check(code, subtotal)? {
                Redemption::Applied { code, amount } => {
                    applied_code = Some(code);
                    discount_amount = amount;
                }
                Redemption::Rejected { code, reason } => {
                    warn!(user = %user_id, code = %code, reason = reason.as_str(), "discount code not applied");
                    rejected_code = Some(RejectedCode { code, reason });
                }
            }
        }

        let order = Order::new(
            order_id,
            user_id.clone(),
            items,
            subtotal,
            applied_code,
            discount_amount,
        )?;

        // Last fallible step; everything after it must succeed.
        let order_count = self.ledger.append(order.clone())?;

        if let Some(ref code) = order.discount_code {
            self.discounts.consume(code, &order.order_id);
        }
        self.carts.clear(user_id);

        let new_discount_code = self
            .discounts
            .issue(order_count)
            .issued_code()
            .map(str::to_string);

        info!(
            user = %user_id,
            order = %order.order_id,
            total = %order.total,
            discount = %order.discount_amount,
            order_count,
            "checkout complete"
        );

        let mut message = String::from("Order placed successfully");
        if let Some(ref code) = new_discount_code {
            message.push_str(&format!(". New discount code '{}' generated!", code));
        }

        Ok(CheckoutReceipt {
            success: true,
            message,
            order,
            new_discount_code,
            rejected_code,
            order_count,
        })
    }
}
