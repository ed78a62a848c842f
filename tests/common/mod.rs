#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use imagegen_gateway::api::{create_router, AppState};
use imagegen_gateway::{
    BananaProvider, Gateway, GeminiProvider, RetryPolicy, TelemetryError, TelemetryRecord,
    TelemetrySink,
};
use tokio::sync::mpsc;

pub const TEST_KEY: &str = "test-api-key";

/// Short timeouts so failure paths finish quickly; backoff stays at the default.
pub fn fast_policy() -> RetryPolicy {
    RetryPolicy::default().with_timeout(Duration::from_millis(300))
}

pub fn banana(base_url: &str) -> BananaProvider {
    BananaProvider::with_retry_policy(
        Some(TEST_KEY.to_string()),
        format!("{base_url}/v1/images"),
        fast_policy(),
    )
    .expect("Failed to create Banana provider")
}

pub fn gemini(base_url: &str) -> GeminiProvider {
    GeminiProvider::with_retry_policy(
        Some(TEST_KEY.to_string()),
        base_url.to_string(),
        fast_policy(),
    )
    .expect("Failed to create Gemini provider")
}

/// A URL nothing is listening on.
pub fn refused_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// Serve the gateway on an ephemeral port and return its base URL.
pub async fn spawn_app(gateway: Gateway) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_router(AppState::new(gateway));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Sink that forwards every record to a channel.
pub struct RecordingSink {
    tx: mpsc::UnboundedSender<TelemetryRecord>,
}

impl RecordingSink {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<TelemetryRecord>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx }), rx)
    }
}

#[async_trait::async_trait]
impl TelemetrySink for RecordingSink {
    async fn record(&self, record: &TelemetryRecord) -> Result<(), TelemetryError> {
        let _ = self.tx.send(record.clone());
        Ok(())
    }
}

/// Sink whose store is always down.
pub struct FailingSink;

#[async_trait::async_trait]
impl TelemetrySink for FailingSink {
    async fn record(&self, _record: &TelemetryRecord) -> Result<(), TelemetryError> {
        Err(TelemetryError::Rejected {
            status: 503,
            body: "store offline".to_string(),
        })
    }
}
