//! Error types for the BrightData client.

use thiserror::Error;

/// Result type for BrightData client operations.
pub type Result<T> = std::result::Result<T, BrightDataError>;

/// BrightData client errors.
///
/// Only the trigger path surfaces these directly. Status, snapshot and wait
/// operations fold them into outcome values so callers always get a usable answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrightDataError {
    /// Platform name outside the supported set. Raised before any network call.
    #[error("Unsupported platform: {platform}. Must be one of {supported}")]
    UnsupportedPlatform { platform: String, supported: String },

    /// Non-2xx response from the provider
    #[error("HTTP error {status_code}: {body}")]
    UpstreamHttp { status_code: u16, body: String },

    /// Network failure (DNS, connect, timeout, reset)
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// 2xx response whose body is not the documented shape
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },
}

impl From<reqwest::Error> for BrightDataError {
    fn from(err: reqwest::Error) -> Self {
        BrightDataError::Transport {
            message: err.to_string(),
        }
    }
}

impl BrightDataError {
    pub fn transport(message: impl Into<String>) -> Self {
        BrightDataError::Transport {
            message: message.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        BrightDataError::InvalidResponse {
            message: message.into(),
        }
    }
}
