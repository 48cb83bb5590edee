//! Observability for Cadence shop sessions.
//!
//! This crate provides:
//! - `OperationId` - Unique identifier for one shop operation
//! - `StructuredLogger` - Structured logging with shop and operation context
//! - `MetricsCollector` - Per-operation timing and outcome summaries

mod logging;
mod metrics;
mod operation;

pub use logging::*;
pub use metrics::*;
pub use operation::*;
