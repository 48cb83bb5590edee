//! Discount code module.
//!
//! Contains issued codes and the registry enforcing the issuance cadence
//! and single-use consumption.

mod code;
mod registry;

pub use code::{CodeStatus, DiscountCode};
pub use registry::{DiscountRegistry, IssueOutcome, Redemption, RejectReason};
