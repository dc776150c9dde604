//! Alert domain model and the shared alert store.

pub mod store;
pub mod types;

pub use store::AlertStore;
pub use types::{Alert, AlertStatus, AlertType, Criticality, ProductRef, SupplierRef};
