//! Order and discount-cadence state machine for Cadence.
//!
//! This crate provides the core of a small order-processing backend:
//!
//! - **Catalog**: Read-only items with unit prices
//! - **Cart**: Per-user carts priced against the live catalog
//! - **Discount**: Every-Nth-order code issuance and single-use redemption
//! - **Ledger**: Append-only orders, the global order counter, running aggregates
//! - **Checkout**: Cart to order, with optional code redemption
//! - **Admin**: Manual issuance and store statistics
//!
//! # Example
//!
//! ```rust,ignore
//! use cadence_commerce::prelude::*;
//!
//! let shop = Shop::seeded(ShopConfig::default())?;
//! shop.add_to_cart("user1", "item001", 2)?;
//!
//! let receipt = shop.checkout("user1", None)?;
//! println!("Total: {}", receipt.order.total.display());
//!
//! let report = shop.admin_generate_discount()?;
//! println!("{} ({} orders to go)", report.message, report.orders_remaining.unwrap_or(0));
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod discount;
pub mod ledger;
mod shop;

pub use config::ShopConfig;
pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};
pub use shop::Shop;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::ShopConfig;
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};
    pub use crate::shop::Shop;

    // Catalog
    pub use crate::catalog::{Catalog, Item};

    // Cart
    pub use crate::cart::{Cart, CartEntry, CartStore, CartView, LineItem};

    // Discounts
    pub use crate::discount::{
        CodeStatus, DiscountCode, DiscountRegistry, IssueOutcome, Redemption, RejectReason,
    };

    // Orders
    pub use crate::ledger::{LedgerAggregates, Order, OrderLedger};

    // Checkout and admin
    pub use crate::admin::{AdminService, GenerateReport, Statistics};
    pub use crate::checkout::{CheckoutEngine, CheckoutReceipt, RejectedCode};
}
