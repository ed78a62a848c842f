use axum::{
    body::Bytes,
    extract::{Json, State},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ApiError, AppState};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// A `data:` URI or a remote URL.
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub provider: &'static str,
    pub configured: bool,
}

pub async fn generate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GenerateResponse>, ApiError> {
    // Parsed by hand so malformed bodies get the same JSON error shape as everything else.
    let raw: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::bad_request(format!("invalid JSON body: {e}")))?;

    let image = state.gateway.generate(&raw).await?;

    Ok(Json(GenerateResponse {
        image_url: image.to_uri(),
    }))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let provider = state.gateway.provider();
    Json(HealthResponse {
        status: "ok",
        provider: provider.name(),
        configured: provider.is_configured(),
    })
}
