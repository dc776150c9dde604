//! Batch result reconciliation.
//!
//! Interprets the order-generation batch response into a UI-facing
//! summary, and resolves generated purchase-order ids into display
//! summaries with a dependent fetch. Partial failure is a normal terminal
//! outcome here, never an error.

use crate::abstractions::ReplenishmentApi;
use crate::api::types::{BatchResultDto, PurchaseOrderSummary};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// How the batch ended. Exhaustive by construction: matching on this
/// replaces inspecting flag/count combinations on the raw result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchOutcome {
    /// Every selected alert produced an order.
    Complete,
    /// Some alerts succeeded, some failed. Orders exist for the
    /// successful ones.
    Partial,
    /// No alert succeeded.
    Failed,
}

/// UI-facing interpretation of a batch result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub outcome: BatchOutcome,
    pub total: u32,
    pub succeeded: u32,
    pub failed: u32,
    pub succeeded_alerts: Vec<i64>,
    pub failed_alerts: Vec<i64>,
    /// Failure diagnostics for the batch as a whole. Unordered: the
    /// server contract does not tie these positionally to
    /// `failed_alerts`.
    pub diagnostics: Vec<String>,
    pub forecast_ids: Vec<i64>,
    pub optimization_ids: Vec<i64>,
    pub order_ids: Vec<i64>,
    pub elapsed: Duration,
    /// One human-readable counts line.
    pub headline: String,
}

impl BatchSummary {
    pub fn is_complete_success(&self) -> bool {
        self.outcome == BatchOutcome::Complete
    }
}

/// Interpret a raw batch result. Pure; the outcome is computed from the
/// counts, which are authoritative over the server's `exitoTotal` flag.
pub fn interpret(result: &BatchResultDto) -> BatchSummary {
    let outcome = if result.failed == 0 {
        BatchOutcome::Complete
    } else if result.succeeded > 0 {
        BatchOutcome::Partial
    } else {
        BatchOutcome::Failed
    };

    if result.fully_successful != (result.failed == 0) {
        warn!(
            succeeded = result.succeeded,
            failed = result.failed,
            flag = result.fully_successful,
            "batch success flag disagrees with failure count; trusting the counts"
        );
    }

    let headline = match outcome {
        BatchOutcome::Complete => {
            format!("All {} alerts processed successfully", result.total_processed)
        }
        BatchOutcome::Partial => format!(
            "{} of {} alerts processed; {} failed",
            result.succeeded, result.total_processed, result.failed
        ),
        BatchOutcome::Failed => {
            format!("No alerts could be processed ({} failed)", result.failed)
        }
    };

    BatchSummary {
        outcome,
        total: result.total_processed,
        succeeded: result.succeeded,
        failed: result.failed,
        succeeded_alerts: result.succeeded_alerts.clone(),
        failed_alerts: result.failed_alerts.clone(),
        diagnostics: result.error_messages.clone(),
        forecast_ids: result.forecast_ids.clone(),
        optimization_ids: result.optimization_ids.clone(),
        order_ids: result.order_ids.clone(),
        elapsed: Duration::from_millis(result.duration_ms),
        headline,
    }
}

/// Results view model: the interpreted summary plus the purchase-order
/// summaries resolved by the dependent fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledBatch {
    pub summary: BatchSummary,
    pub orders: Vec<PurchaseOrderSummary>,
    pub orders_loading: bool,
    pub order_fetch_error: Option<String>,
}

impl ReconciledBatch {
    /// View state right after the batch resolves, before the dependent
    /// fetch. The loading flag only goes up when there is something to
    /// fetch.
    pub fn pending(summary: BatchSummary) -> Self {
        let orders_loading = !summary.order_ids.is_empty();
        Self {
            summary,
            orders: Vec::new(),
            orders_loading,
            order_fetch_error: None,
        }
    }
}

pub struct Reconciler {
    api: Arc<dyn ReplenishmentApi>,
}

impl Reconciler {
    pub fn new(api: Arc<dyn ReplenishmentApi>) -> Self {
        Self { api }
    }

    /// Fetch display summaries for the generated orders. Returns `None`
    /// without touching the network when the batch produced no orders —
    /// including a `Failed` outcome. A `Partial` outcome with orders still
    /// fetches: the successful subset must be displayed.
    pub async fn resolve_orders(
        &self,
        summary: &BatchSummary,
    ) -> Option<Result<Vec<PurchaseOrderSummary>>> {
        if summary.order_ids.is_empty() {
            debug!("batch produced no orders; skipping summary fetch");
            return None;
        }
        Some(self.api.fetch_order_summaries(&summary.order_ids).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures::batch_result;

    #[test]
    fn complete_success() {
        let dto = batch_result(3, 3, 0).orders(vec![101, 102, 103]).build();
        let summary = interpret(&dto);
        assert_eq!(summary.outcome, BatchOutcome::Complete);
        assert!(summary.is_complete_success());
        assert!(summary.headline.contains("All 3"));
    }

    #[test]
    fn partial_success_is_not_reported_as_total() {
        let dto = batch_result(5, 3, 2)
            .orders(vec![101, 102, 103])
            .errors(vec!["supplier 9 has no lead time".to_string()])
            .build();
        let summary = interpret(&dto);
        assert_eq!(summary.outcome, BatchOutcome::Partial);
        assert!(!summary.is_complete_success());
        assert_eq!(summary.order_ids, vec![101, 102, 103]);
        assert_eq!(summary.diagnostics.len(), 1);
        assert!(summary.headline.contains("3 of 5"));
    }

    #[test]
    fn total_failure() {
        let dto = batch_result(2, 0, 2).build();
        let summary = interpret(&dto);
        assert_eq!(summary.outcome, BatchOutcome::Failed);
        assert!(summary.order_ids.is_empty());
    }

    #[test]
    fn counts_win_over_a_lying_success_flag() {
        let mut dto = batch_result(5, 3, 2).build();
        dto.fully_successful = true;
        let summary = interpret(&dto);
        assert_eq!(summary.outcome, BatchOutcome::Partial);
    }

    #[test]
    fn pending_view_only_loads_when_orders_exist() {
        let with_orders = interpret(&batch_result(2, 2, 0).orders(vec![101]).build());
        assert!(ReconciledBatch::pending(with_orders).orders_loading);

        let without_orders = interpret(&batch_result(2, 0, 2).build());
        assert!(!ReconciledBatch::pending(without_orders).orders_loading);
    }

    #[test]
    fn elapsed_comes_from_duration_ms() {
        let dto = batch_result(1, 1, 0).build();
        let summary = interpret(&dto);
        assert_eq!(summary.elapsed, Duration::from_millis(dto.duration_ms));
    }
}
