//! Order ledger module.
//!
//! Contains placed orders and the append-only ledger that counts them.

mod ledger;
mod order;

pub use ledger::{LedgerAggregates, OrderLedger};
pub use order::Order;
