use super::types::*;
use crate::extract::extract_image;
use crate::provider::ImageProvider;
use crate::transport::{Auth, RetryPolicy, Target, UpstreamClient};
use crate::types::{GenerationRequest, ImageReference, RequestDefaults};
use crate::GenerationError;
use tracing::{debug, instrument};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";
/// Gemini has no sampler knob; recorded for telemetry only.
pub const DEFAULT_SAMPLER: &str = "auto";

const SEED_OUT_OF_RANGE: &str = "seed must fit in a 32-bit signed integer for Gemini";

/// Provider for Gemini image models via the `generateContent` API.
pub struct GeminiProvider {
    client: UpstreamClient,
    api_key: Option<String>,
    base_url: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider against the public API.
    pub fn new(api_key: Option<String>) -> Result<Self, GenerationError> {
        Self::new_with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Create a new Gemini provider with custom base URL.
    pub fn new_with_base_url(
        api_key: Option<String>,
        base_url: String,
    ) -> Result<Self, GenerationError> {
        Self::with_retry_policy(api_key, base_url, RetryPolicy::default())
    }

    pub fn with_retry_policy(
        api_key: Option<String>,
        base_url: String,
        policy: RetryPolicy,
    ) -> Result<Self, GenerationError> {
        Ok(Self {
            client: UpstreamClient::new("Gemini", policy)?,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            base_url,
        })
    }

    /// Convert a normalized request to Gemini's contents/parts format.
    ///
    /// Fails when the seed does not fit the API's 32-bit seed field.
    fn convert_request(request: &GenerationRequest) -> Result<GeminiRequest, GenerationError> {
        let seed = request
            .seed
            .map(i32::try_from)
            .transpose()
            .map_err(|_| GenerationError::invalid_input(SEED_OUT_OF_RANGE))?;

        let mut parts = vec![GeminiPart {
            text: request.prompt.clone(),
        }];

        // No dedicated field; the model reads it as an instruction.
        if let Some(negative) = request.negative_prompt() {
            parts.push(GeminiPart {
                text: format!("Avoid the following in the image: {negative}"),
            });
        }

        Ok(GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts,
            }],
            generation_config: GeminiGenerationConfig {
                response_modalities: vec!["TEXT".to_string(), "IMAGE".to_string()],
                image_config: request.aspect_ratio().map(|ratio| GeminiImageConfig {
                    aspect_ratio: ratio.as_str().to_string(),
                }),
                seed,
            },
        })
    }

    /// Get the API endpoint for the Gemini model.
    ///
    /// The model name is caller-supplied, so it is pushed as a single
    /// percent-encoded path segment and cannot alter the path or query.
    fn get_endpoint(&self, model: &str) -> Result<String, GenerationError> {
        let mut url = reqwest::Url::parse(&self.base_url).map_err(|e| {
            GenerationError::internal(format!("Invalid Gemini base URL '{}': {e}", self.base_url))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                GenerationError::internal(format!(
                    "Gemini base URL '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(["v1beta", "models"])
            .push(&format!("{model}:generateContent"));

        Ok(url.into())
    }
}

#[async_trait::async_trait]
impl ImageProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "Gemini"
    }

    fn api_key_env(&self) -> &'static str {
        API_KEY_ENV
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn defaults(&self) -> RequestDefaults {
        RequestDefaults::new(DEFAULT_MODEL, DEFAULT_SAMPLER)
    }

    #[instrument(skip(self, request), fields(provider = "Gemini", model = %request.model))]
    async fn generate(&self, request: &GenerationRequest) -> Result<ImageReference, GenerationError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| GenerationError::configuration_missing(API_KEY_ENV))?;

        let body = Self::convert_request(request)?;
        let target = Target {
            url: self.get_endpoint(&request.model)?,
            auth: Auth::QueryParam {
                name: "key",
                value: api_key.clone(),
            },
        };

        let response = self.client.post_json(&target, &body).await?;
        let image = extract_image(&response).ok_or(GenerationError::UpstreamMalformedResponse)?;

        debug!(image = %image, "Gemini returned an image");
        Ok(image)
    }
}
