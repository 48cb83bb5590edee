//! Admin queries: manual discount issuance and store statistics.

use serde::Serialize;

use crate::discount::{DiscountCode, DiscountRegistry, IssueOutcome};
use crate::ledger::OrderLedger;
use crate::money::Money;

/// Response to a manual issuance request.
///
/// `success: false` is a business outcome, not a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReport {
    pub success: bool,
    pub message: String,
    /// The new code, or the outstanding one when issuance was refused.
    pub code: Option<String>,
    pub current_order_count: u64,
    #[serde(rename = "nextDiscountAt")]
    pub next_threshold: u64,
    /// Set only when the order count is not yet eligible.
    pub orders_remaining: Option<u64>,
}

impl From<IssueOutcome> for GenerateReport {
    fn from(outcome: IssueOutcome) -> Self {
        match outcome {
            IssueOutcome::Issued {
                code,
                order_count,
                next_threshold,
            } => Self {
                success: true,
                message: "Discount code generated successfully".to_string(),
                code: Some(code),
                current_order_count: order_count,
                next_threshold,
                orders_remaining: None,
            },
            IssueOutcome::AlreadyOutstanding {
                code,
                order_count,
                next_threshold,
            } => Self {
                success: false,
                message: format!("Unused discount code '{}' already exists", code),
                code: Some(code),
                current_order_count: order_count,
                next_threshold,
                orders_remaining: None,
            },
            IssueOutcome::NotYetEligible {
                order_count,
                next_threshold,
                orders_remaining,
            } => Self {
                success: false,
                message: "Discount code cannot be generated yet".to_string(),
                code: None,
                current_order_count: order_count,
                next_threshold,
                orders_remaining: Some(orders_remaining),
            },
        }
    }
}

/// Store-wide statistics.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_items_purchased: i64,
    pub total_purchase_amount: Money,
    pub total_discount_amount: Money,
    pub order_count: u64,
    /// Every issued code in issuance order.
    pub discount_codes: Vec<DiscountCode>,
}

impl Statistics {
    /// Snapshot the ledger aggregates and the code history.
    pub fn collect(ledger: &OrderLedger, discounts: &DiscountRegistry) -> Self {
        let aggregates = ledger.aggregates();
        Self {
            total_items_purchased: aggregates.total_items_purchased,
            total_purchase_amount: aggregates.total_purchase_amount,
            total_discount_amount: aggregates.total_discount_amount,
            order_count: ledger.order_count(),
            discount_codes: discounts.codes().to_vec(),
        }
    }
}

/// Admin operations over borrowed shop components.
pub struct AdminService<'a> {
    discounts: &'a mut DiscountRegistry,
    ledger: &'a OrderLedger,
}

impl<'a> AdminService<'a> {
    pub fn new(discounts: &'a mut DiscountRegistry, ledger: &'a OrderLedger) -> Self {
        Self { discounts, ledger }
    }

    /// Ask the registry for a code using the current order count.
    pub fn generate_discount(&mut self) -> GenerateReport {
        self.discounts.issue(self.ledger.order_count()).into()
    }

    /// Aggregates plus the full code history.
    pub fn statistics(&self) -> Statistics {
        Statistics::collect(self.ledger, self.discounts)
    }
}
