//! Builders for test data.

use crate::alerts::types::{Alert, AlertStatus, AlertType, Criticality, ProductRef, SupplierRef};
use crate::api::types::{
    BatchResultDto, ForecastMetrics, ForecastsBySupplier, ProductForecast, SupplierForecasts,
};
use chrono::Utc;
use std::collections::HashMap;

/// Start building an alert with sensible defaults: pending, medium
/// criticality, low stock, supplier 1.
pub fn alert(id: i64) -> AlertBuilder {
    AlertBuilder {
        id,
        alert_type: AlertType::LowStock,
        criticality: Criticality::Medium,
        status: AlertStatus::Pending,
        supplier: Some((1, "Proveedor General".to_string())),
        suggested_quantity: None,
        message: format!("alert {id}"),
    }
}

pub struct AlertBuilder {
    id: i64,
    alert_type: AlertType,
    criticality: Criticality,
    status: AlertStatus,
    supplier: Option<(i64, String)>,
    suggested_quantity: Option<f64>,
    message: String,
}

impl AlertBuilder {
    pub fn supplier(mut self, id: i64, name: &str) -> Self {
        self.supplier = Some((id, name.to_string()));
        self
    }

    pub fn no_supplier(mut self) -> Self {
        self.supplier = None;
        self
    }

    pub fn alert_type(mut self, alert_type: AlertType) -> Self {
        self.alert_type = alert_type;
        self
    }

    pub fn criticality(mut self, criticality: Criticality) -> Self {
        self.criticality = criticality;
        self
    }

    pub fn critical(self) -> Self {
        self.criticality(Criticality::Critical)
    }

    pub fn status(mut self, status: AlertStatus) -> Self {
        self.status = status;
        self
    }

    pub fn resolved(self) -> Self {
        self.status(AlertStatus::Resolved)
    }

    pub fn suggested(mut self, quantity: f64) -> Self {
        self.suggested_quantity = Some(quantity);
        self
    }

    pub fn build(self) -> Alert {
        let resolved_at = self.status.is_terminal().then(Utc::now);
        Alert {
            id: self.id,
            alert_type: self.alert_type,
            criticality: self.criticality,
            message: self.message,
            product: ProductRef {
                id: 1000 + self.id,
                name: format!("Producto {}", self.id),
                sku: format!("SKU-{:04}", self.id),
                unit_cost: 10.0,
                supplier: self
                    .supplier
                    .map(|(id, name)| SupplierRef { id, name }),
            },
            current_stock: Some(5.0),
            minimum_stock: Some(20.0),
            suggested_quantity: self.suggested_quantity,
            assigned_user: None,
            status: self.status,
            generated_at: Utc::now(),
            resolved_at,
            action_taken: None,
        }
    }
}

/// Start building a batch result. `fully_successful` tracks the failure
/// count unless a test overrides it afterwards.
pub fn batch_result(total: u32, succeeded: u32, failed: u32) -> BatchResultBuilder {
    BatchResultBuilder {
        total,
        succeeded,
        failed,
        succeeded_alerts: Vec::new(),
        failed_alerts: Vec::new(),
        error_messages: Vec::new(),
        forecast_ids: Vec::new(),
        optimization_ids: Vec::new(),
        order_ids: Vec::new(),
    }
}

pub struct BatchResultBuilder {
    total: u32,
    succeeded: u32,
    failed: u32,
    succeeded_alerts: Vec<i64>,
    failed_alerts: Vec<i64>,
    error_messages: Vec<String>,
    forecast_ids: Vec<i64>,
    optimization_ids: Vec<i64>,
    order_ids: Vec<i64>,
}

impl BatchResultBuilder {
    pub fn succeeded_ids(mut self, ids: Vec<i64>) -> Self {
        self.succeeded_alerts = ids;
        self
    }

    pub fn failed_ids(mut self, ids: Vec<i64>) -> Self {
        self.failed_alerts = ids;
        self
    }

    pub fn errors(mut self, messages: Vec<String>) -> Self {
        self.error_messages = messages;
        self
    }

    pub fn forecasts(mut self, ids: Vec<i64>) -> Self {
        self.forecast_ids = ids;
        self
    }

    pub fn optimizations(mut self, ids: Vec<i64>) -> Self {
        self.optimization_ids = ids;
        self
    }

    pub fn orders(mut self, ids: Vec<i64>) -> Self {
        self.order_ids = ids;
        self
    }

    pub fn build(self) -> BatchResultDto {
        let finished_at = Utc::now();
        BatchResultDto {
            started_at: finished_at - chrono::Duration::milliseconds(1500),
            finished_at,
            duration_ms: 1500,
            total_processed: self.total,
            succeeded: self.succeeded,
            failed: self.failed,
            succeeded_alerts: self.succeeded_alerts,
            failed_alerts: self.failed_alerts,
            error_messages: self.error_messages,
            fully_successful: self.failed == 0,
            forecast_ids: self.forecast_ids,
            optimization_ids: self.optimization_ids,
            order_ids: self.order_ids,
        }
    }
}

/// A one-supplier forecast response covering the given alerts.
pub fn forecasts_for_supplier(
    supplier_id: i64,
    supplier_name: &str,
    alert_ids: &[i64],
) -> ForecastsBySupplier {
    let forecasts = alert_ids
        .iter()
        .map(|&alert_id| ProductForecast {
            product_id: 1000 + alert_id,
            product_name: format!("Producto {alert_id}"),
            alert_id,
            historical: Vec::new(),
            predicted: Vec::new(),
            metrics: ForecastMetrics {
                mape: 9.5,
                rmse: 3.2,
                mae: 2.1,
            },
            trend: false,
            seasonality: false,
            recommended_quantity: 25.0,
            recommendation: None,
        })
        .collect();

    HashMap::from([(
        supplier_id,
        SupplierForecasts {
            supplier_name: supplier_name.to_string(),
            forecasts,
        },
    )])
}
