//! Issued discount codes.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::ids::OrderId;

/// Usage state of a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CodeStatus {
    /// Issued and still redeemable.
    #[default]
    Unused,
    /// Redeemed by an order.
    Used,
}

impl CodeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeStatus::Unused => "unused",
            CodeStatus::Used => "used",
        }
    }
}

/// A code minted by the registry.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiscountCode {
    /// Code string (e.g., "DISCOUNT1").
    pub code: String,
    /// Usage state.
    pub status: CodeStatus,
    /// Order that redeemed the code.
    pub used_by_order: Option<OrderId>,
    /// Issuance time.
    pub created_at: DateTime<Utc>,
    /// Redemption time.
    pub used_at: Option<DateTime<Utc>>,
}

impl DiscountCode {
    /// Mint a fresh, unused code.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            status: CodeStatus::Unused,
            used_by_order: None,
            created_at: Utc::now(),
            used_at: None,
        }
    }

    /// Check if the code has been redeemed.
    pub fn is_used(&self) -> bool {
        self.status == CodeStatus::Used
    }

    /// Mark as redeemed by `order_id`.
    ///
    /// Returns false, leaving the record untouched, if it was already used.
    pub(crate) fn mark_used(&mut self, order_id: OrderId) -> bool {
        if self.is_used() {
            return false;
        }
        self.status = CodeStatus::Used;
        self.used_by_order = Some(order_id);
        self.used_at = Some(Utc::now());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_code_is_unused() {
        let code = DiscountCode::new("DISCOUNT1");
        assert!(!code.is_used());
        assert!(code.used_by_order.is_none());
        assert!(code.used_at.is_none());
    }

    #[test]
    fn test_mark_used_once() {
        let mut code = DiscountCode::new("DISCOUNT1");
        assert!(code.mark_used(OrderId::new("order005")));
        assert!(code.is_used());
        assert_eq!(code.used_by_order, Some(OrderId::new("order005")));

        assert!(!code.mark_used(OrderId::new("order006")));
        assert_eq!(code.used_by_order, Some(OrderId::new("order005")));
    }

    #[test]
    fn test_status_wire_format() {
        let code = DiscountCode::new("DISCOUNT1");
        let json = serde_json::to_value(&code).unwrap();
        assert_eq!(json["status"], "unused");
        assert!(json["usedByOrder"].is_null());
    }
}
