use super::types::BananaRequest;
use crate::extract::extract_image;
use crate::provider::ImageProvider;
use crate::transport::{Auth, RetryPolicy, Target, UpstreamClient};
use crate::types::{GenerationRequest, ImageReference, RequestDefaults};
use crate::GenerationError;
use tracing::{debug, instrument};

pub const DEFAULT_BASE_URL: &str = "https://api.nanobanana.ai/v1/images";
pub const API_KEY_ENV: &str = "NANO_BANANA_API_KEY";
pub const DEFAULT_MODEL: &str = "banana-v3";
pub const DEFAULT_SAMPLER: &str = "euler_a";

/// Provider for endpoints that take one flat JSON object with explicit
/// dimensions and sampler settings, authenticated with a bearer token.
pub struct BananaProvider {
    client: UpstreamClient,
    api_key: Option<String>,
    base_url: String,
}

impl BananaProvider {
    /// Create a new provider against the public endpoint.
    pub fn new(api_key: Option<String>) -> Result<Self, GenerationError> {
        Self::new_with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Create a new provider with custom endpoint URL.
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
            client: UpstreamClient::new("Nano Banana", policy)?,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            base_url,
        })
    }

    /// Convert a normalized request to the flat wire format.
    fn convert_request(request: &GenerationRequest) -> BananaRequest {
        BananaRequest {
            prompt: request.prompt.clone(),
            negative_prompt: request.negative_prompt().map(str::to_string),
            model: request.model.clone(),
            steps: request.steps,
            cfg_scale: request.cfg_scale,
            width: request.width,
            height: request.height,
            seed: request.seed,
            sampler: request.sampler.clone(),
        }
    }
}

#[async_trait::async_trait]
impl ImageProvider for BananaProvider {
    fn name(&self) -> &'static str {
        "Nano Banana"
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

    #[instrument(skip(self, request), fields(provider = "Nano Banana", model = %request.model))]
    async fn generate(&self, request: &GenerationRequest) -> Result<ImageReference, GenerationError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| GenerationError::configuration_missing(API_KEY_ENV))?;

        let body = Self::convert_request(request);
        let target = Target {
            url: self.base_url.clone(),
            auth: Auth::Bearer(api_key.clone()),
        };

        let response = self.client.post_json(&target, &body).await?;
        let image = extract_image(&response).ok_or(GenerationError::UpstreamMalformedResponse)?;

        debug!(image = %image, "Nano Banana returned an image");
        Ok(image)
    }
}
