//! Per-operation timing metrics for a shop session.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::{OperationId, Outcome};

/// Metrics for a single operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationMetrics {
    pub operation_id: String,
    /// Operation name (`add`, `checkout`, ...).
    pub operation: String,
    pub outcome: Outcome,
    /// Wall time spent in the shop call (microseconds).
    pub duration_us: u64,
    /// Error or rejection text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Aggregate for one operation name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationSummary {
    pub count: u64,
    pub ok: u64,
    pub rejected: u64,
    pub failed: u64,
    pub total_duration_us: u64,
}

impl OperationSummary {
    fn record(&mut self, metrics: &OperationMetrics) {
        self.count += 1;
        match metrics.outcome {
            Outcome::Ok => self.ok += 1,
            Outcome::Rejected => self.rejected += 1,
            Outcome::Error => self.failed += 1,
        }
        self.total_duration_us = self.total_duration_us.saturating_add(metrics.duration_us);
    }

    /// Mean duration in microseconds.
    pub fn avg_duration_us(&self) -> u64 {
        if self.count == 0 {
            0
        } else {
            self.total_duration_us / self.count
        }
    }
}

/// Everything recorded during one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMetrics {
    pub operations: Vec<OperationMetrics>,
    /// Keyed by operation name.
    pub summary: BTreeMap<String, OperationSummary>,
    pub total_duration_us: u64,
}

impl SessionMetrics {
    pub fn failures(&self) -> u64 {
        self.summary.values().map(|s| s.failed).sum()
    }

    pub fn operation_count(&self) -> usize {
        self.operations.len()
    }

    /// Format as human-readable summary.
    pub fn to_summary(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "Session: {} operations, {} failed, {}us ({:.2}ms)",
            self.operations.len(),
            self.failures(),
            self.total_duration_us,
            self.total_duration_us as f64 / 1000.0
        ));

        for (name, summary) in &self.summary {
            let mut line = format!(
                "  {}: {}x, avg {}us, total {}us",
                name,
                summary.count,
                summary.avg_duration_us(),
                summary.total_duration_us
            );
            if summary.rejected > 0 {
                line.push_str(&format!(" [{} rejected]", summary.rejected));
            }
            if summary.failed > 0 {
                line.push_str(&format!(" [{} failed]", summary.failed));
            }
            lines.push(line);
        }

        lines.join("\n")
    }
}

/// A running operation; finish it with [`MetricsCollector::finish`].
#[derive(Debug)]
pub struct OperationTimer {
    operation_id: OperationId,
    operation: String,
    start: Instant,
}

impl OperationTimer {
    pub fn operation_id(&self) -> &OperationId {
        &self.operation_id
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Collector for session metrics.
#[derive(Debug)]
pub struct MetricsCollector {
    start: Instant,
    operations: Vec<OperationMetrics>,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            operations: Vec::new(),
        }
    }

    /// Start timing an operation.
    pub fn start(&self, operation: impl Into<String>, operation_id: OperationId) -> OperationTimer {
        OperationTimer {
            operation_id,
            operation: operation.into(),
            start: Instant::now(),
        }
    }

    /// Stop a timer and record its outcome.
    pub fn finish(
        &mut self,
        timer: OperationTimer,
        outcome: Outcome,
        detail: Option<String>,
    ) -> &OperationMetrics {
        let duration = timer.start.elapsed();
        self.record(timer.operation_id, timer.operation, outcome, duration, detail)
    }

    /// Record an operation timed elsewhere.
    pub fn record(
        &mut self,
        operation_id: OperationId,
        operation: impl Into<String>,
        outcome: Outcome,
        duration: Duration,
        detail: Option<String>,
    ) -> &OperationMetrics {
        self.operations.push(OperationMetrics {
            operation_id: operation_id.to_string(),
            operation: operation.into(),
            outcome,
            duration_us: duration.as_micros() as u64,
            detail,
        });
        &self.operations[self.operations.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Get total elapsed time.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Finalize and return the session metrics.
    pub fn finalize(self) -> SessionMetrics {
        let mut summary: BTreeMap<String, OperationSummary> = BTreeMap::new();
        for op in &self.operations {
            summary.entry(op.operation.clone()).or_default().record(op);
        }

        SessionMetrics {
            total_duration_us: self.start.elapsed().as_micros() as u64,
            operations: self.operations,
            summary,
        }
    }
}
