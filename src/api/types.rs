//! Wire types for the replenishment backend.
//!
//! The backend's JSON contract uses Spanish camelCase keys; Rust field
//! names stay English and map through explicit renames. Requests are built
//! once per pipeline action and never mutated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Body for the forecast batch endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastBatchRequest {
    #[serde(rename = "alertIds")]
    pub alert_ids: Vec<i64>,
    #[serde(rename = "horizonteTiempo")]
    pub horizon_days: u32,
}

/// Body for the order-generation batch endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBatchRequest {
    #[serde(rename = "alertIds")]
    pub alert_ids: Vec<i64>,
    #[serde(rename = "horizonteTiempo")]
    pub horizon_days: u32,
    #[serde(rename = "usuarioId", default, skip_serializing_if = "Option::is_none")]
    pub operator_id: Option<i64>,
    #[serde(rename = "observaciones", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Forecast bundles keyed by supplier id. JSON object keys arrive as
/// strings; serde parses them back into ids.
pub type ForecastsBySupplier = HashMap<i64, SupplierForecasts>;

/// All product forecasts for one supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierForecasts {
    #[serde(rename = "nombreProveedor")]
    pub supplier_name: String,
    #[serde(rename = "pronosticos")]
    pub forecasts: Vec<ProductForecast>,
}

/// A demand forecast for one product, tied back to the alert that asked
/// for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductForecast {
    #[serde(rename = "productoId")]
    pub product_id: i64,
    #[serde(rename = "nombreProducto")]
    pub product_name: String,
    #[serde(rename = "alertaId")]
    pub alert_id: i64,
    #[serde(rename = "serieHistorica", default)]
    pub historical: Vec<SeriesPoint>,
    #[serde(rename = "seriePronosticada", default)]
    pub predicted: Vec<SeriesPoint>,
    #[serde(rename = "metricasError")]
    pub metrics: ForecastMetrics,
    #[serde(rename = "tendencia", default)]
    pub trend: bool,
    #[serde(rename = "estacionalidad", default)]
    pub seasonality: bool,
    #[serde(rename = "cantidadRecomendada")]
    pub recommended_quantity: f64,
    #[serde(rename = "recomendacion", default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    #[serde(rename = "periodo")]
    pub period: String,
    #[serde(rename = "cantidad")]
    pub quantity: f64,
}

/// Forecast quality measures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastMetrics {
    pub mape: f64,
    pub rmse: f64,
    pub mae: f64,
}

/// Raw batch outcome of the order-generation endpoint. Immutable once
/// received.
///
/// `error_messages` is an unordered bag of diagnostics for the batch as a
/// whole; the server contract does not guarantee positional alignment with
/// `failed_alerts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResultDto {
    #[serde(rename = "fechaInicio")]
    pub started_at: DateTime<Utc>,
    #[serde(rename = "fechaFin")]
    pub finished_at: DateTime<Utc>,
    #[serde(rename = "duracionMs")]
    pub duration_ms: u64,
    #[serde(rename = "totalProcesadas")]
    pub total_processed: u32,
    #[serde(rename = "exitosos")]
    pub succeeded: u32,
    #[serde(rename = "fallidos")]
    pub failed: u32,
    #[serde(rename = "alertasExitosas", default)]
    pub succeeded_alerts: Vec<i64>,
    #[serde(rename = "alertasFallidas", default)]
    pub failed_alerts: Vec<i64>,
    #[serde(rename = "mensajesError", default)]
    pub error_messages: Vec<String>,
    #[serde(rename = "exitoTotal")]
    pub fully_successful: bool,
    #[serde(rename = "pronosticosGenerados", default)]
    pub forecast_ids: Vec<i64>,
    #[serde(rename = "optimizacionesGeneradas", default)]
    pub optimization_ids: Vec<i64>,
    #[serde(rename = "ordenesGeneradas", default)]
    pub order_ids: Vec<i64>,
}

/// Display summary of a generated purchase order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrderSummary {
    pub id: i64,
    #[serde(rename = "proveedorId")]
    pub supplier_id: i64,
    #[serde(rename = "nombreProveedor")]
    pub supplier_name: String,
    #[serde(rename = "total")]
    pub total: f64,
    #[serde(rename = "fechaCreacion")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "lineas", default)]
    pub lines: Vec<OrderLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    #[serde(rename = "productoId")]
    pub product_id: i64,
    #[serde(rename = "nombreProducto")]
    pub product_name: String,
    #[serde(rename = "cantidad")]
    pub quantity: f64,
    #[serde(rename = "costoUnitario")]
    pub unit_cost: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forecast_request_serializes_to_contract_keys() {
        let request = ForecastBatchRequest {
            alert_ids: vec![7, 9],
            horizon_days: 30,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["alertIds"], serde_json::json!([7, 9]));
        assert_eq!(json["horizonteTiempo"], 30);
    }

    #[test]
    fn order_request_omits_absent_optionals() {
        let request = OrderBatchRequest {
            alert_ids: vec![7],
            horizon_days: 30,
            operator_id: None,
            notes: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("usuarioId").is_none());
        assert!(json.get("observaciones").is_none());

        let request = OrderBatchRequest {
            operator_id: Some(12),
            notes: Some("urgent".to_string()),
            ..request
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["usuarioId"], 12);
        assert_eq!(json["observaciones"], "urgent");
    }

    #[test]
    fn batch_result_deserializes_from_contract() {
        let json = r#"{
            "fechaInicio": "2025-11-02T10:15:00Z",
            "fechaFin": "2025-11-02T10:15:09Z",
            "duracionMs": 9000,
            "totalProcesadas": 5,
            "exitosos": 3,
            "fallidos": 2,
            "alertasExitosas": [1, 2, 3],
            "alertasFallidas": [4, 5],
            "mensajesError": ["supplier 9 has no lead time"],
            "exitoTotal": false,
            "pronosticosGenerados": [11, 12, 13],
            "optimizacionesGeneradas": [21, 22, 23],
            "ordenesGeneradas": [101, 102, 103]
        }"#;

        let result: BatchResultDto = serde_json::from_str(json).unwrap();
        assert_eq!(result.total_processed, 5);
        assert_eq!(result.failed_alerts, vec![4, 5]);
        assert!(!result.fully_successful);
        assert_eq!(result.order_ids, vec![101, 102, 103]);
    }

    #[test]
    fn forecasts_map_parses_string_supplier_keys() {
        let json = r#"{
            "4": {
                "nombreProveedor": "Distribuidora Norte",
                "pronosticos": [{
                    "productoId": 31,
                    "nombreProducto": "Tornillo M6",
                    "alertaId": 7,
                    "serieHistorica": [{"periodo": "2025-10", "cantidad": 12.0}],
                    "seriePronosticada": [{"periodo": "2025-11", "cantidad": 18.0}],
                    "metricasError": {"mape": 8.2, "rmse": 3.1, "mae": 2.4},
                    "tendencia": true,
                    "estacionalidad": false,
                    "cantidadRecomendada": 40.0
                }]
            }
        }"#;

        let forecasts: ForecastsBySupplier = serde_json::from_str(json).unwrap();
        let bundle = forecasts.get(&4).unwrap();
        assert_eq!(bundle.supplier_name, "Distribuidora Norte");
        assert_eq!(bundle.forecasts[0].alert_id, 7);
        assert!(bundle.forecasts[0].trend);
    }
}
