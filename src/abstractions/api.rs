//! Backend API abstraction.
//!
//! The orchestrator only ever talks to the backend through this trait, so
//! tests swap in a scripted mock and production wires up the HTTP client.

use crate::alerts::types::Alert;
use crate::api::types::{
    BatchResultDto, ForecastBatchRequest, ForecastsBySupplier, OrderBatchRequest,
    PurchaseOrderSummary,
};
use crate::error::Result;
use async_trait::async_trait;

/// The four backend endpoints the workflow core consumes.
#[async_trait]
pub trait ReplenishmentApi: Send + Sync {
    /// Current dashboard alert list with denormalized product/supplier
    /// fields.
    async fn fetch_alerts(&self) -> Result<Vec<Alert>>;

    /// Generate demand forecasts for the selected alerts, grouped by
    /// supplier.
    async fn generate_forecasts(
        &self,
        request: &ForecastBatchRequest,
    ) -> Result<ForecastsBySupplier>;

    /// Run the optimization-and-order batch for the selected alerts.
    /// Partial failure is reported inside the result, not as an `Err`.
    async fn generate_orders(&self, request: &OrderBatchRequest) -> Result<BatchResultDto>;

    /// Display summaries for generated purchase orders.
    async fn fetch_order_summaries(&self, order_ids: &[i64]) -> Result<Vec<PurchaseOrderSummary>>;
}
