use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while turning a prompt into an image.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{key} is not configured")]
    ConfigurationMissing { key: String },

    #[error("Network error contacting {provider} API: {detail}")]
    UpstreamNetwork {
        provider: String,
        detail: String,
        url: String,
    },

    #[error("{provider} API request failed with status {status}")]
    UpstreamRejected {
        provider: String,
        status: u16,
        detail: Value,
    },

    #[error("No image in response")]
    UpstreamMalformedResponse,

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Internal(String),
}

impl GenerationError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        GenerationError::InvalidInput(message.into())
    }

    pub fn configuration_missing(key: impl Into<String>) -> Self {
        GenerationError::ConfigurationMissing { key: key.into() }
    }

    pub fn network(
        provider: impl Into<String>,
        detail: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        GenerationError::UpstreamNetwork {
            provider: provider.into(),
            detail: detail.into(),
            url: url.into(),
        }
    }

    pub fn rejected(provider: impl Into<String>, status: u16, detail: Value) -> Self {
        GenerationError::UpstreamRejected {
            provider: provider.into(),
            status,
            detail,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        GenerationError::Internal(message.into())
    }
}

/// Failures of the best-effort telemetry write. Never escapes the sink task.
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("telemetry request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("telemetry store rejected insert with status {status}: {body}")]
    Rejected { status: u16, body: String },
}
