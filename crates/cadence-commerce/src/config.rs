//! Shop configuration consumed by the core.

use serde::{Deserialize, Serialize};

use crate::error::CommerceError;
use crate::money::Currency;

/// Tunables for the discount cadence and cart limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopConfig {
    /// Display name used in logs.
    #[serde(default = "default_name")]
    pub name: String,

    /// A discount code may be issued every `nth_order` orders.
    #[serde(default = "default_nth_order")]
    pub nth_order: u64,

    /// Percentage taken off the subtotal when a code is applied.
    #[serde(default = "default_discount_percent")]
    pub discount_percent: u32,

    /// Prefix of minted codes (`DISCOUNT1`, `DISCOUNT2`, ...).
    #[serde(default = "default_code_prefix")]
    pub code_prefix: String,

    /// Currency of every price in the shop.
    #[serde(default)]
    pub currency: Currency,

    /// Upper bound on the quantity of a single cart line.
    #[serde(default = "default_max_quantity")]
    pub max_quantity_per_item: i64,
}

fn default_name() -> String {
    "cadence".to_string()
}

fn default_nth_order() -> u64 {
    5
}

fn default_discount_percent() -> u32 {
    10
}

fn default_code_prefix() -> String {
    "DISCOUNT".to_string()
}

fn default_max_quantity() -> i64 {
    1000
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            nth_order: default_nth_order(),
            discount_percent: default_discount_percent(),
            code_prefix: default_code_prefix(),
            currency: Currency::default(),
            max_quantity_per_item: default_max_quantity(),
        }
    }
}

impl ShopConfig {
    /// Set the issuance cadence.
    pub fn with_nth_order(mut self, nth_order: u64) -> Self {
        self.nth_order = nth_order;
        self
    }

    /// Set the discount percentage.
    pub fn with_discount_percent(mut self, percent: u32) -> Self {
        self.discount_percent = percent;
        self
    }

    /// Set the code prefix.
    pub fn with_code_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.code_prefix = prefix.into();
        self
    }

    /// Check every value is within range.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.nth_order == 0 {
            return Err(CommerceError::InvalidConfig(
                "nth_order must be at least 1".to_string(),
            ));
        }
        if self.discount_percent == 0 || self.discount_percent > 100 {
            return Err(CommerceError::InvalidConfig(format!(
                "discount_percent must be 1-100, got {}",
                self.discount_percent
            )));
        }
        if self.code_prefix.trim().is_empty() {
            return Err(CommerceError::InvalidConfig(
                "code_prefix must not be empty".to_string(),
            ));
        }
        if self.max_quantity_per_item < 1 {
            return Err(CommerceError::InvalidConfig(format!(
                "max_quantity_per_item must be positive, got {}",
                self.max_quantity_per_item
            )));
        }
        Ok(())
    }
}
