//! Shared HTTP plumbing for providers: per-attempt timeout, bounded retry,
//! and classification of upstream responses.

use std::error::Error as StdError;
use std::time::{Duration, Instant};

use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::GenerationError;

/// Timing rules for upstream calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub attempts: u32,
    /// Upper bound on a single attempt.
    pub timeout: Duration,
    pub base_backoff: Duration,
    pub backoff_factor: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 2,
            timeout: Duration::from_secs(60),
            base_backoff: Duration::from_millis(500),
            backoff_factor: 3,
        }
    }
}

impl RetryPolicy {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_base_backoff(mut self, base_backoff: Duration) -> Self {
        self.base_backoff = base_backoff;
        self
    }

    /// Pause after the given zero-based attempt: `base * factor^attempt`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_backoff * self.backoff_factor.saturating_pow(attempt)
    }
}

/// How the provider expects its API key.
#[derive(Clone)]
pub enum Auth {
    Bearer(String),
    QueryParam { name: &'static str, value: String },
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Auth::Bearer(_) => f.write_str("Bearer(***)"),
            Auth::QueryParam { name, .. } => write!(f, "QueryParam({name}=***)"),
        }
    }
}

/// Where one provider call goes. `url` never carries credentials, so it is safe to report.
#[derive(Debug, Clone)]
pub struct Target {
    pub url: String,
    pub auth: Auth,
}

/// HTTP client shared by every request a provider makes.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    provider: &'static str,
    policy: RetryPolicy,
}

impl UpstreamClient {
    pub fn new(provider: &'static str, policy: RetryPolicy) -> Result<Self, GenerationError> {
        // Per-attempt deadlines are enforced in `send_with_retry`.
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            provider,
            policy,
        })
    }

    /// POST a JSON body and return the parsed JSON of a successful response.
    ///
    /// Only transport failures are retried. A response with an error status is
    /// returned as [`GenerationError::UpstreamRejected`] straight away.
    #[instrument(skip(self, target, body), fields(provider = self.provider, url = %target.url))]
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        target: &Target,
        body: &B,
    ) -> Result<Value, GenerationError> {
        let response = self.send_with_retry(target, body).await?;
        let status = response.status();

        let text = match tokio::time::timeout(self.policy.timeout, response.text()).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                return Err(GenerationError::network(
                    self.provider,
                    describe(&e.without_url()),
                    &target.url,
                ))
            }
            Err(_) => {
                return Err(GenerationError::network(
                    self.provider,
                    format!("response body not received within {:?}", self.policy.timeout),
                    &target.url,
                ))
            }
        };

        if !status.is_success() {
            let detail = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));
            warn!(status = status.as_u16(), detail = %detail, "Provider rejected request");
            return Err(GenerationError::rejected(
                self.provider,
                status.as_u16(),
                detail,
            ));
        }

        serde_json::from_str(&text).map_err(|e| {
            warn!(error = %e, "Provider returned a non-JSON success body");
            GenerationError::UpstreamMalformedResponse
        })
    }

    async fn send_with_retry<B: Serialize + ?Sized>(
        &self,
        target: &Target,
        body: &B,
    ) -> Result<reqwest::Response, GenerationError> {
        let mut last_error = String::from("no attempt was made");

        for attempt in 0..self.policy.attempts {
            let started = Instant::now();
            let request = self.build_request(target, body);

            // Dropping the future on timeout aborts the request and frees the connection.
            match tokio::time::timeout(self.policy.timeout, request.send()).await {
                Ok(Ok(response)) => {
                    debug!(
                        attempt,
                        status = response.status().as_u16(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Provider responded"
                    );
                    return Ok(response);
                }
                Ok(Err(e)) => last_error = describe(&e.without_url()),
                Err(_) => {
                    last_error = format!("request timed out after {:?}", self.policy.timeout)
                }
            }

            warn!(attempt, error = %last_error, "Provider attempt failed");

            if attempt + 1 < self.policy.attempts {
                tokio::time::sleep(self.policy.backoff(attempt)).await;
            }
        }

        Err(GenerationError::network(
            self.provider,
            last_error,
            &target.url,
        ))
    }

    fn build_request<B: Serialize + ?Sized>(&self, target: &Target, body: &B) -> RequestBuilder {
        let builder = self
            .client
            .post(&target.url)
            .header("Content-Type", "application/json")
            .json(body);

        match &target.auth {
            Auth::Bearer(token) => builder.header("Authorization", format!("Bearer {token}")),
            Auth::QueryParam { name, value } => builder.query(&[(*name, value.as_str())]),
        }
    }
}

/// Flatten an error and its sources into one line.
fn describe(error: &dyn StdError) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
