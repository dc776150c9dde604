//! Wire types and HTTP transport for the replenishment backend.

pub mod client;
pub mod types;

pub use client::HttpReplenishmentClient;
pub use types::{
    BatchResultDto, ForecastBatchRequest, ForecastMetrics, ForecastsBySupplier, OrderBatchRequest,
    OrderLine, ProductForecast, PurchaseOrderSummary, SeriesPoint, SupplierForecasts,
};
