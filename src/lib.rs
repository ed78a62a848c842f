//! A prompt-to-image gateway over multiple image-generation providers.
//!
//! Clients post a loosely typed generation request; the gateway normalizes
//! it, logs it best-effort, forwards it to the configured provider with a
//! bounded retry, and returns a single displayable image reference.

pub mod api;
pub mod error;
pub mod extract;
pub mod factory;
pub mod gateway;
pub mod normalize;
pub mod provider;
pub mod providers;
pub mod telemetry;
pub mod transport;
pub mod types;

// Re-export core types for easy usage
pub use error::{GenerationError, TelemetryError};
pub use factory::{ProviderConfig, ProviderFactory, ProviderType};
pub use gateway::Gateway;
pub use provider::ImageProvider;
pub use providers::*;
pub use telemetry::{NoopSink, SupabaseSink, TelemetryRecord, TelemetrySink};
pub use transport::RetryPolicy;
pub use types::*;
