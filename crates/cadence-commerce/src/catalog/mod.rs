//! Product catalog module.
//!
//! Static, read-only item reference data.

mod item;

pub use item::{Catalog, Item};
