//! Alert domain model.
//!
//! These types double as the wire read model for the dashboard alert
//! endpoint: the backend speaks a Spanish camelCase JSON contract, mapped
//! here through explicit field renames.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What triggered an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertType {
    LowStock,
    ReorderPoint,
    CriticalStock,
    Overstock,
    Obsolete,
    ExpiryNear,
    ExpiryPast,
    AnomalousDemand,
    HighCost,
    HighShrinkage,
    SupplierDelay,
}

/// Alert severity. The derived ordering is the business ordering:
/// `Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Criticality {
    Low,
    Medium,
    High,
    Critical,
}

/// Lifecycle state of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertStatus {
    Pending,
    InProcess,
    Resolved,
    Ignored,
    Escalated,
}

impl AlertStatus {
    /// Terminal alerts leave the active selection pool on the next
    /// refresh.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AlertStatus::Resolved | AlertStatus::Ignored)
    }
}

/// Denormalized supplier reference carried on the alert's product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierRef {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
}

/// Denormalized product fields carried on each alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRef {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    pub sku: String,
    #[serde(rename = "costoAdquisicion")]
    pub unit_cost: f64,
    #[serde(rename = "proveedor", default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<SupplierRef>,
}

/// A pending inventory alert as returned by the dashboard endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: i64,
    #[serde(rename = "tipo")]
    pub alert_type: AlertType,
    #[serde(rename = "criticidad")]
    pub criticality: Criticality,
    #[serde(rename = "mensaje")]
    pub message: String,
    #[serde(rename = "producto")]
    pub product: ProductRef,
    #[serde(rename = "stockActual", default, skip_serializing_if = "Option::is_none")]
    pub current_stock: Option<f64>,
    #[serde(rename = "stockMinimo", default, skip_serializing_if = "Option::is_none")]
    pub minimum_stock: Option<f64>,
    #[serde(rename = "cantidadSugerida", default, skip_serializing_if = "Option::is_none")]
    pub suggested_quantity: Option<f64>,
    #[serde(rename = "usuarioAsignado", default, skip_serializing_if = "Option::is_none")]
    pub assigned_user: Option<i64>,
    #[serde(rename = "estado")]
    pub status: AlertStatus,
    #[serde(rename = "fechaGeneracion")]
    pub generated_at: DateTime<Utc>,
    #[serde(rename = "fechaResolucion", default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(rename = "accionTomada", default, skip_serializing_if = "Option::is_none")]
    pub action_taken: Option<String>,
}

impl Alert {
    pub fn supplier(&self) -> Option<&SupplierRef> {
        self.product.supplier.as_ref()
    }

    /// Whether this alert can still be selected for a workflow run.
    pub fn is_selectable(&self) -> bool {
        !self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(AlertStatus::Resolved.is_terminal());
        assert!(AlertStatus::Ignored.is_terminal());
        assert!(!AlertStatus::Pending.is_terminal());
        assert!(!AlertStatus::InProcess.is_terminal());
        assert!(!AlertStatus::Escalated.is_terminal());
    }

    #[test]
    fn criticality_is_ordered() {
        assert!(Criticality::Low < Criticality::Medium);
        assert!(Criticality::Medium < Criticality::High);
        assert!(Criticality::High < Criticality::Critical);
    }

    #[test]
    fn alert_deserializes_from_backend_contract() {
        let json = r#"{
            "id": 7,
            "tipo": "LOW_STOCK",
            "criticidad": "HIGH",
            "mensaje": "Stock below minimum",
            "producto": {
                "id": 31,
                "nombre": "Tornillo M6",
                "sku": "TOR-M6",
                "costoAdquisicion": 0.12,
                "proveedor": { "id": 4, "nombre": "Distribuidora Norte" }
            },
            "stockActual": 5.0,
            "stockMinimo": 20.0,
            "cantidadSugerida": 40.0,
            "estado": "PENDING",
            "fechaGeneracion": "2025-11-02T10:15:00Z"
        }"#;

        let alert: Alert = serde_json::from_str(json).unwrap();
        assert_eq!(alert.id, 7);
        assert_eq!(alert.alert_type, AlertType::LowStock);
        assert_eq!(alert.criticality, Criticality::High);
        assert_eq!(alert.supplier().unwrap().id, 4);
        assert_eq!(alert.suggested_quantity, Some(40.0));
        assert!(alert.resolved_at.is_none());
        assert!(alert.is_selectable());
    }

    #[test]
    fn missing_supplier_is_allowed() {
        let json = r#"{
            "id": 8,
            "tipo": "OBSOLETE",
            "criticidad": "LOW",
            "mensaje": "No movement in 180 days",
            "producto": { "id": 9, "nombre": "Junta", "sku": "JUN-1", "costoAdquisicion": 1.5 },
            "estado": "PENDING",
            "fechaGeneracion": "2025-11-02T10:15:00Z"
        }"#;

        let alert: Alert = serde_json::from_str(json).unwrap();
        assert!(alert.supplier().is_none());
    }
}
