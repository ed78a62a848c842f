//! One generation round trip: normalize, log, check configuration, call the provider.

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::normalize::normalize;
use crate::telemetry::{record_detached, NoopSink, TelemetryRecord, TelemetrySink};
use crate::types::ImageReference;
use crate::{GenerationError, ImageProvider};

/// Orchestrates a single generation request. Holds no per-request state, so
/// one instance serves any number of concurrent calls.
#[derive(Clone)]
pub struct Gateway {
    provider: Arc<dyn ImageProvider>,
    telemetry: Arc<dyn TelemetrySink>,
}

impl Gateway {
    pub fn new(provider: Arc<dyn ImageProvider>, telemetry: Arc<dyn TelemetrySink>) -> Self {
        Self {
            provider,
            telemetry,
        }
    }

    /// Gateway without request logging.
    pub fn without_telemetry(provider: Arc<dyn ImageProvider>) -> Self {
        Self::new(provider, Arc::new(NoopSink))
    }

    pub fn provider(&self) -> &dyn ImageProvider {
        self.provider.as_ref()
    }

    /// Generate an image from a raw client payload.
    ///
    /// The telemetry write is started before the provider call and never
    /// awaited. A missing API key is reported only after the request has been
    /// validated and logged.
    #[instrument(
        skip(self, raw),
        fields(request_id = %Uuid::new_v4(), provider = self.provider.name())
    )]
    pub async fn generate(&self, raw: &Value) -> Result<ImageReference, GenerationError> {
        let request = normalize(raw, &self.provider.defaults())?;

        record_detached(self.telemetry.clone(), TelemetryRecord::from(&request));

        if !self.provider.is_configured() {
            return Err(GenerationError::configuration_missing(
                self.provider.api_key_env(),
            ));
        }

        let image = self.provider.generate(&request).await?;
        info!(model = %request.model, image = %image, "Generated image");
        Ok(image)
    }
}
