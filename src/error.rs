use thiserror::Error;

/// Unified error type for the replenishment core.
#[derive(Error, Debug)]
pub enum RestockError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("API error from {endpoint}: {message}")]
    Api {
        endpoint: &'static str,
        status: Option<u16>,
        message: String,
    },

    #[error("Failed to decode {endpoint} response: {message}")]
    Decode {
        endpoint: &'static str,
        message: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RestockError {
    /// Error for a non-success HTTP status from a backend endpoint.
    pub fn api(endpoint: &'static str, status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Api {
            endpoint,
            status,
            message: message.into(),
        }
    }

    pub fn decode(endpoint: &'static str, message: impl Into<String>) -> Self {
        Self::Decode {
            endpoint,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RestockError>;
