//! Mock implementations of external collaborators.

pub mod api;

pub use api::{ForecastGate, MockApiBuilder, MockReplenishmentApi};
