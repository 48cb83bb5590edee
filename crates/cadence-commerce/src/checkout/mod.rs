//! Checkout module.
//!
//! Turns a cart into an order, redeeming and issuing discount codes.

mod engine;

pub use engine::{CheckoutEngine, CheckoutReceipt, RejectedCode};
