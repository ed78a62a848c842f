use serde::{Deserialize, Serialize};

/// Flat request body for Nano Banana style image endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BananaRequest {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    pub model: String,
    pub steps: u32,
    pub cfg_scale: f64,
    pub width: u32,
    pub height: u32,
    /// Omitted when unset so the provider picks a random seed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    pub sampler: String,
}
