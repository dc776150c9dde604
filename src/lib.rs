//! # Restock
//!
//! Orchestration core for an alert-driven inventory replenishment
//! workflow: an operator selects pending alerts, reviews demand forecasts
//! grouped by supplier, and commits a purchase-order batch, with partial
//! success tracked per alert.
//!
//! ## Modules
//!
//! - `abstractions` - Trait-based abstractions for the backend API
//! - `alerts` - Alert domain model and the shared replace-on-refresh store
//! - `api` - Wire types and the HTTP client for the backend
//! - `config` - TOML configuration for transport and workflow settings
//! - `events` - Broadcast event bus consumed by the UI host
//! - `grouping` - Pure supplier grouping over an alert snapshot
//! - `pipeline` - The forecast → review → order state machine
//! - `reconcile` - Batch result interpretation and order-summary resolution
//! - `selection` - The selected-alert id set
//! - `testing` - Fixtures and a scripted mock backend

pub mod abstractions;
pub mod alerts;
pub mod api;
pub mod config;
pub mod error;
pub mod events;
pub mod grouping;
pub mod pipeline;
pub mod reconcile;
pub mod selection;
pub mod testing;

pub use error::{RestockError, Result};
