use crate::types::{GenerationRequest, ImageReference, RequestDefaults};
use crate::GenerationError;

/// A trait for upstream services that turn a prompt into an image.
/// Each implementation owns one provider wire shape.
#[async_trait::async_trait]
pub trait ImageProvider: Send + Sync + 'static {
    /// Human-readable provider name used in errors and logs.
    fn name(&self) -> &'static str;

    /// Environment variable the operator sets to supply the API key.
    fn api_key_env(&self) -> &'static str;

    /// Whether an API key is available. Checked before any network call.
    fn is_configured(&self) -> bool;

    /// Model and sampler used when the client does not pick one.
    fn defaults(&self) -> RequestDefaults;

    /// Generate one image for a normalized request.
    async fn generate(&self, request: &GenerationRequest) -> Result<ImageReference, GenerationError>;
}
