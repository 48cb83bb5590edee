//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in shop operations.
///
/// Every variant is terminal: it describes bad caller input or an unmet
/// precondition, never a transient fault. A rejected discount code and a
/// refused issuance are deliberately *not* errors; they are reported inside
/// successful results instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommerceError {
    /// Item not found in the catalog.
    #[error("Item '{0}' not found")]
    ItemNotFound(String),

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Blank user identifier.
    #[error("User id must not be empty")]
    MissingUserId,

    /// Checkout attempted on an empty cart.
    #[error("Cart is empty for user '{0}'")]
    EmptyCart(String),

    /// Catalog contains the same item identifier twice.
    #[error("Duplicate catalog item: {0}")]
    DuplicateItem(String),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Order identifier already present in the ledger.
    #[error("Order '{0}' already recorded")]
    DuplicateOrder(String),

    /// Discount amount negative or larger than the subtotal.
    #[error("Discount {discount} outside 0..={subtotal}")]
    InvalidDiscount { discount: String, subtotal: String },

    /// Configuration value out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Shop state lock was poisoned by a panicking operation.
    #[error("Shop state is poisoned")]
    StatePoisoned,
}

impl CommerceError {
    /// Short machine-readable code, used by outer layers for status mapping.
    pub fn code(&self) -> &'static str {
        match self {
            CommerceError::ItemNotFound(_) => "item_not_found",
            CommerceError::InvalidQuantity(_) => "invalid_quantity",
            CommerceError::QuantityExceedsLimit(..) => "quantity_exceeds_limit",
            CommerceError::MissingUserId => "missing_user_id",
            CommerceError::EmptyCart(_) => "empty_cart",
            CommerceError::DuplicateItem(_) => "duplicate_item",
            CommerceError::CurrencyMismatch { .. } => "currency_mismatch",
            CommerceError::Overflow => "overflow",
            CommerceError::DuplicateOrder(_) => "duplicate_order",
            CommerceError::InvalidDiscount { .. } => "invalid_discount",
            CommerceError::InvalidConfig(_) => "invalid_config",
            CommerceError::StatePoisoned => "state_poisoned",
        }
    }
}
