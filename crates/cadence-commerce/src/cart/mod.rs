//! Shopping cart module.
//!
//! Contains the per-user cart, the cart store, and line item pricing.

mod cart;
mod pricing;
mod store;

pub use cart::{Cart, CartEntry};
pub use pricing::{price_lines, CartView, LineItem};
pub use store::CartStore;
