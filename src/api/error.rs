use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::error;

use crate::GenerationError;

/// An error response: status code plus JSON body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into() }),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::InvalidInput(message) => Self::bad_request(message),
            GenerationError::ConfigurationMissing { .. } => {
                error!(error = %err, "Provider is not configured");
                Self::internal(err.to_string())
            }
            GenerationError::UpstreamNetwork {
                provider,
                detail,
                url,
            } => Self {
                status: StatusCode::GATEWAY_TIMEOUT,
                body: json!({
                    "error": format!("Network error contacting {provider} API"),
                    "detail": detail,
                    "url": url,
                }),
            },
            GenerationError::UpstreamRejected {
                provider,
                status,
                detail,
            } => Self {
                status: mirrored_status(status),
                body: json!({
                    "error": format!("{provider} API request failed"),
                    "status": status,
                    "detail": detail,
                }),
            },
            GenerationError::UpstreamMalformedResponse => {
                Self::new(StatusCode::BAD_GATEWAY, err.to_string())
            }
            GenerationError::Http(_) | GenerationError::Internal(_) => {
                error!(error = %err, "Unhandled generation failure");
                Self::internal(err.to_string())
            }
        }
    }
}

/// Upstream error statuses pass through; anything else becomes 502.
fn mirrored_status(status: u16) -> StatusCode {
    StatusCode::from_u16(status)
        .ok()
        .filter(|code| code.is_client_error() || code.is_server_error())
        .unwrap_or(StatusCode::BAD_GATEWAY)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (GenerationError::invalid_input("prompt is required"), 400),
            (GenerationError::configuration_missing("NANO_BANANA_API_KEY"), 500),
            (GenerationError::network("Gemini", "timed out", "http://x"), 504),
            (GenerationError::rejected("Gemini", 429, json!({})), 429),
            (GenerationError::UpstreamMalformedResponse, 502),
            (GenerationError::internal("boom"), 500),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status.as_u16(), expected);
        }
    }

    #[test]
    fn test_rejected_body_carries_detail() {
        let api = ApiError::from(GenerationError::rejected(
            "Nano Banana",
            400,
            json!({ "message": "bad steps" }),
        ));

        assert_eq!(
            api.body,
            json!({
                "error": "Nano Banana API request failed",
                "status": 400,
                "detail": { "message": "bad steps" }
            })
        );
    }

    #[test]
    fn test_network_body_shape() {
        let api = ApiError::from(GenerationError::network(
            "Nano Banana",
            "connection refused",
            "https://api.nanobanana.ai/v1/images",
        ));

        assert_eq!(api.body["error"], "Network error contacting Nano Banana API");
        assert_eq!(api.body["detail"], "connection refused");
        assert_eq!(api.body["url"], "https://api.nanobanana.ai/v1/images");
    }

    #[test]
    fn test_non_error_upstream_status_becomes_bad_gateway() {
        assert_eq!(mirrored_status(302), StatusCode::BAD_GATEWAY);
        assert_eq!(mirrored_status(503), StatusCode::SERVICE_UNAVAILABLE);
    }
}
