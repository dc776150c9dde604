//! Configuration for the replenishment workflow core.
//!
//! Loaded from TOML by the embedding host. Every field has a default so a
//! partial (or empty) config file is valid.

use crate::error::{RestockError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default forecast horizon, in days.
pub const DEFAULT_HORIZON_DAYS: u32 = 30;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub workflow: WorkflowSettings,
}

/// Backend transport settings. Timeouts live here, not in the
/// orchestrator: the transport owns them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the inventory backend, e.g. `https://host/api/`.
    pub base_url: String,
    /// Per-request timeout applied to the HTTP client.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// Optional bearer token attached to every request.
    pub token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api/".to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            token: None,
        }
    }
}

/// Operator-facing workflow settings applied when pipeline requests are
/// built.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowSettings {
    /// Forecast horizon in days. Must be positive.
    pub horizon_days: u32,
    /// Operator recorded on generated purchase orders.
    pub operator_id: Option<i64>,
    /// Free-text notes forwarded with the order batch.
    pub notes: Option<String>,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            horizon_days: DEFAULT_HORIZON_DAYS,
            operator_id: None,
            notes: None,
        }
    }
}

impl Config {
    /// Parse a config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.workflow.horizon_days == 0 {
            return Err(RestockError::Validation(
                "horizon_days must be a positive number of days".to_string(),
            ));
        }
        if self.api.base_url.trim().is_empty() {
            return Err(RestockError::Config("api.base_url must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_empty_config() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.workflow.horizon_days, 30);
        assert_eq!(config.api.timeout, Duration::from_secs(30));
        assert!(config.api.token.is_none());
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config = Config::from_toml_str(
            r#"
            [workflow]
            horizon_days = 60
            operator_id = 12

            [api]
            base_url = "https://inventory.example.com/api/"
            timeout = "10s"
            "#,
        )
        .unwrap();
        assert_eq!(config.workflow.horizon_days, 60);
        assert_eq!(config.workflow.operator_id, Some(12));
        assert!(config.workflow.notes.is_none());
        assert_eq!(config.api.timeout, Duration::from_secs(10));
    }

    #[test]
    fn zero_horizon_is_rejected() {
        let err = Config::from_toml_str("[workflow]\nhorizon_days = 0\n").unwrap_err();
        assert!(matches!(err, RestockError::Validation(_)));
    }
}
