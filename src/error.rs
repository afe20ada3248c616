use serde::Deserialize;
use thiserror::Error;

// Error body returned by the Routes API on non-2xx responses
#[derive(Deserialize, Debug)]
pub struct ApiErrorDetail {
    pub code: u16,
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct ApiErrorPayload {
    pub error: ApiErrorDetail,
}

#[derive(Error, Debug)]
pub enum MapError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Routing service error: {0}")]
    RoutingService(#[from] RoutingError),

    #[error("Polyline decode error: {0}")]
    Decode(#[from] PolylineError),
}

impl MapError {
    pub fn missing_api_key() -> Self {
        MapError::Configuration("missing API key".to_string())
    }
}

#[derive(Error, Debug)]
pub enum RoutingError {
    #[error("Underlying request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse route response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No route found in response")]
    NoRoute,

    #[error("Unparseable route duration: {0:?}")]
    InvalidDuration(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolylineError {
    #[error("invalid character {byte:#04x} at byte {index}")]
    InvalidCharacter { index: usize, byte: u8 },

    #[error("input ends inside a value at byte {index}")]
    Truncated { index: usize },

    #[error("value starting at byte {index} does not fit in 64 bits")]
    Overflow { index: usize },
}
