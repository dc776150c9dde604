//! Scripted mock backend for orchestrator tests.

use crate::abstractions::ReplenishmentApi;
use crate::alerts::types::Alert;
use crate::api::types::{
    BatchResultDto, ForecastBatchRequest, ForecastsBySupplier, OrderBatchRequest,
    PurchaseOrderSummary,
};
use crate::error::{RestockError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Rendezvous for holding a forecast call open: the mock signals
/// `entered` when the call starts and parks on `release` until the test
/// lets it finish.
pub struct ForecastGate {
    pub entered: Notify,
    pub release: Notify,
}

impl ForecastGate {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            entered: Notify::new(),
            release: Notify::new(),
        })
    }
}

type Scripted<T> = std::result::Result<T, String>;

/// Builder for configured mock backends.
pub struct MockApiBuilder {
    alerts: Vec<Alert>,
    alerts_error: Option<String>,
    forecasts: Scripted<ForecastsBySupplier>,
    orders: Scripted<BatchResultDto>,
    summaries: Scripted<Vec<PurchaseOrderSummary>>,
    forecast_gate: Option<Arc<ForecastGate>>,
}

impl Default for MockApiBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockApiBuilder {
    pub fn new() -> Self {
        Self {
            alerts: Vec::new(),
            alerts_error: None,
            forecasts: Ok(HashMap::new()),
            orders: Err("no order batch scripted".to_string()),
            summaries: Ok(Vec::new()),
            forecast_gate: None,
        }
    }

    pub fn with_alerts(mut self, alerts: Vec<Alert>) -> Self {
        self.alerts = alerts;
        self
    }

    pub fn alerts_error(mut self, message: &str) -> Self {
        self.alerts_error = Some(message.to_string());
        self
    }

    pub fn with_forecasts(mut self, forecasts: ForecastsBySupplier) -> Self {
        self.forecasts = Ok(forecasts);
        self
    }

    pub fn forecasts_error(mut self, message: &str) -> Self {
        self.forecasts = Err(message.to_string());
        self
    }

    pub fn with_batch(mut self, batch: BatchResultDto) -> Self {
        self.orders = Ok(batch);
        self
    }

    pub fn orders_error(mut self, message: &str) -> Self {
        self.orders = Err(message.to_string());
        self
    }

    pub fn with_summaries(mut self, summaries: Vec<PurchaseOrderSummary>) -> Self {
        self.summaries = Ok(summaries);
        self
    }

    pub fn summaries_error(mut self, message: &str) -> Self {
        self.summaries = Err(message.to_string());
        self
    }

    /// Hold every forecast call open on the gate until released.
    pub fn gate_forecasts(mut self, gate: Arc<ForecastGate>) -> Self {
        self.forecast_gate = Some(gate);
        self
    }

    pub fn build(self) -> MockReplenishmentApi {
        MockReplenishmentApi {
            alerts: Mutex::new(self.alerts),
            alerts_error: Mutex::new(self.alerts_error),
            forecasts: Mutex::new(self.forecasts),
            orders: Mutex::new(self.orders),
            summaries: Mutex::new(self.summaries),
            forecast_gate: self.forecast_gate,
            alerts_calls: AtomicUsize::new(0),
            forecast_calls: AtomicUsize::new(0),
            order_calls: AtomicUsize::new(0),
            summary_calls: AtomicUsize::new(0),
            forecast_requests: Mutex::new(Vec::new()),
            order_requests: Mutex::new(Vec::new()),
            summary_requests: Mutex::new(Vec::new()),
        }
    }
}

/// Mock backend recording every request it receives.
pub struct MockReplenishmentApi {
    alerts: Mutex<Vec<Alert>>,
    alerts_error: Mutex<Option<String>>,
    forecasts: Mutex<Scripted<ForecastsBySupplier>>,
    orders: Mutex<Scripted<BatchResultDto>>,
    summaries: Mutex<Scripted<Vec<PurchaseOrderSummary>>>,
    forecast_gate: Option<Arc<ForecastGate>>,
    alerts_calls: AtomicUsize,
    forecast_calls: AtomicUsize,
    order_calls: AtomicUsize,
    summary_calls: AtomicUsize,
    forecast_requests: Mutex<Vec<ForecastBatchRequest>>,
    order_requests: Mutex<Vec<OrderBatchRequest>>,
    summary_requests: Mutex<Vec<Vec<i64>>>,
}

impl MockReplenishmentApi {
    pub fn builder() -> MockApiBuilder {
        MockApiBuilder::new()
    }

    /// Change what the next `fetch_alerts` returns, e.g. to simulate the
    /// backend resolving alerts between refreshes.
    pub fn set_alerts(&self, alerts: Vec<Alert>) {
        *self.alerts.lock().unwrap() = alerts;
    }

    pub fn alerts_calls(&self) -> usize {
        self.alerts_calls.load(Ordering::SeqCst)
    }

    pub fn forecast_calls(&self) -> usize {
        self.forecast_calls.load(Ordering::SeqCst)
    }

    pub fn order_calls(&self) -> usize {
        self.order_calls.load(Ordering::SeqCst)
    }

    pub fn summary_calls(&self) -> usize {
        self.summary_calls.load(Ordering::SeqCst)
    }

    pub fn forecast_requests(&self) -> Vec<ForecastBatchRequest> {
        self.forecast_requests.lock().unwrap().clone()
    }

    pub fn order_requests(&self) -> Vec<OrderBatchRequest> {
        self.order_requests.lock().unwrap().clone()
    }

    pub fn summary_requests(&self) -> Vec<Vec<i64>> {
        self.summary_requests.lock().unwrap().clone()
    }

    fn scripted<T: Clone>(
        slot: &Mutex<Scripted<T>>,
        endpoint: &'static str,
    ) -> Result<T> {
        match &*slot.lock().unwrap() {
            Ok(value) => Ok(value.clone()),
            Err(message) => Err(RestockError::api(endpoint, None, message.clone())),
        }
    }
}

#[async_trait]
impl ReplenishmentApi for MockReplenishmentApi {
    async fn fetch_alerts(&self) -> Result<Vec<Alert>> {
        self.alerts_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.alerts_error.lock().unwrap().clone() {
            return Err(RestockError::api("alertas/dashboard", None, message));
        }
        Ok(self.alerts.lock().unwrap().clone())
    }

    async fn generate_forecasts(
        &self,
        request: &ForecastBatchRequest,
    ) -> Result<ForecastsBySupplier> {
        self.forecast_calls.fetch_add(1, Ordering::SeqCst);
        self.forecast_requests.lock().unwrap().push(request.clone());
        if let Some(gate) = &self.forecast_gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        Self::scripted(&self.forecasts, "pronosticos/lote")
    }

    async fn generate_orders(&self, request: &OrderBatchRequest) -> Result<BatchResultDto> {
        self.order_calls.fetch_add(1, Ordering::SeqCst);
        self.order_requests.lock().unwrap().push(request.clone());
        Self::scripted(&self.orders, "ordenes/generar-lote")
    }

    async fn fetch_order_summaries(&self, order_ids: &[i64]) -> Result<Vec<PurchaseOrderSummary>> {
        self.summary_calls.fetch_add(1, Ordering::SeqCst);
        self.summary_requests.lock().unwrap().push(order_ids.to_vec());
        Self::scripted(&self.summaries, "ordenes/resumen")
    }
}
