//! Best-effort request logging.
//!
//! Each normalized request is appended to an external table. The write runs
//! once, off the request path, and its outcome never reaches the client.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tracing::{debug, instrument, warn, Instrument};

use crate::error::TelemetryError;
use crate::types::{GenerationRequest, TelemetryConfig};

/// Upper bound on the single telemetry write.
const TELEMETRY_TIMEOUT: Duration = Duration::from_secs(10);

/// One row in the telemetry table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryRecord {
    pub prompt: String,
    pub negative_prompt: String,
    pub model: String,
    pub steps: u32,
    pub cfg_scale: f64,
    pub width: u32,
    pub height: u32,
    pub seed: Option<i64>,
    pub sampler: String,
}

impl From<&GenerationRequest> for TelemetryRecord {
    fn from(request: &GenerationRequest) -> Self {
        Self {
            prompt: request.prompt.clone(),
            negative_prompt: request.negative_prompt.clone(),
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

/// An append-only log of generation requests.
#[async_trait::async_trait]
pub trait TelemetrySink: Send + Sync + 'static {
    async fn record(&self, record: &TelemetryRecord) -> Result<(), TelemetryError>;
}

/// Sink used when no telemetry store is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

#[async_trait::async_trait]
impl TelemetrySink for NoopSink {
    async fn record(&self, _record: &TelemetryRecord) -> Result<(), TelemetryError> {
        Ok(())
    }
}

/// Inserts rows through a Supabase (PostgREST) REST endpoint.
pub struct SupabaseSink {
    client: Client,
    config: TelemetryConfig,
}

impl SupabaseSink {
    pub fn new(config: TelemetryConfig) -> Result<Self, TelemetryError> {
        let client = Client::builder().timeout(TELEMETRY_TIMEOUT).build()?;
        Ok(Self { client, config })
    }

    fn insert_url(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.table
        )
    }
}

#[async_trait::async_trait]
impl TelemetrySink for SupabaseSink {
    #[instrument(skip(self, record), fields(table = %self.config.table))]
    async fn record(&self, record: &TelemetryRecord) -> Result<(), TelemetryError> {
        let response = self
            .client
            .post(self.insert_url())
            .header("apikey", &self.config.api_key)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .header("Prefer", "return=minimal")
            .json(&[record])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TelemetryError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

/// Build the sink for the given configuration, falling back to [`NoopSink`].
pub fn sink_from_config(config: Option<TelemetryConfig>) -> Arc<dyn TelemetrySink> {
    match config {
        Some(config) => match SupabaseSink::new(config) {
            Ok(sink) => Arc::new(sink),
            Err(e) => {
                warn!(error = %e, "Telemetry sink unavailable, request logging disabled");
                Arc::new(NoopSink)
            }
        },
        None => Arc::new(NoopSink),
    }
}

/// Write a record in the background. Errors are logged and dropped.
pub fn record_detached(sink: Arc<dyn TelemetrySink>, record: TelemetryRecord) {
    let span = tracing::debug_span!("telemetry");
    tokio::spawn(
        async move {
            match sink.record(&record).await {
                Ok(()) => debug!("Recorded generation request"),
                Err(e) => debug!(error = %e, "Ignoring telemetry failure"),
            }
        }
        .instrument(span),
    );
}
