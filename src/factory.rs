use crate::providers::{BananaProvider, GeminiProvider};
use crate::transport::RetryPolicy;
use crate::types::config::non_empty_var;
use crate::{GenerationError, ImageProvider};
use std::env;
use std::str::FromStr;

/// Supported image-generation provider shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderType {
    /// Flat JSON body, bearer token.
    #[default]
    Banana,
    /// Conversational contents/parts body, key in the query string.
    Gemini,
}

impl ProviderType {
    pub fn api_key_env(&self) -> &'static str {
        match self {
            ProviderType::Banana => crate::providers::banana::client::API_KEY_ENV,
            ProviderType::Gemini => crate::providers::gemini::client::API_KEY_ENV,
        }
    }

    pub fn base_url_env(&self) -> &'static str {
        match self {
            ProviderType::Banana => "NANO_BANANA_API_URL",
            ProviderType::Gemini => "GEMINI_API_URL",
        }
    }
}

impl FromStr for ProviderType {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "banana" | "nano-banana" | "nanobanana" => Ok(ProviderType::Banana),
            "gemini" | "google" => Ok(ProviderType::Gemini),
            other => Err(GenerationError::internal(format!(
                "Invalid IMAGE_PROVIDER '{other}'. Valid values are: banana, gemini"
            ))),
        }
    }
}

/// Configuration for creating providers.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub provider_type: ProviderType,
    /// May be absent; requests then fail with a configuration error.
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub retry_policy: RetryPolicy,
}

impl ProviderConfig {
    pub fn new(provider_type: ProviderType, api_key: Option<String>) -> Self {
        Self {
            provider_type,
            api_key,
            base_url: None,
            retry_policy: RetryPolicy::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// Create configuration from environment variables.
    ///
    /// Reads `IMAGE_PROVIDER` (default `banana`), then that provider's key and
    /// optional base URL override. A missing key is not an error here.
    pub fn from_env() -> Result<Self, GenerationError> {
        let provider_type = match env::var("IMAGE_PROVIDER") {
            Ok(value) if !value.trim().is_empty() => value.parse()?,
            _ => ProviderType::default(),
        };

        let mut config = Self::new(
            provider_type,
            non_empty_var(provider_type.api_key_env()),
        );
        if let Some(base_url) = non_empty_var(provider_type.base_url_env()) {
            config = config.with_base_url(base_url);
        }
        Ok(config)
    }
}

/// Factory for creating image providers.
pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a provider from configuration.
    pub fn create(config: &ProviderConfig) -> Result<Box<dyn ImageProvider>, GenerationError> {
        let api_key = config.api_key.clone();
        let policy = config.retry_policy.clone();

        match config.provider_type {
            ProviderType::Banana => {
                let base_url = config
                    .base_url
                    .clone()
                    .unwrap_or_else(|| crate::providers::banana::client::DEFAULT_BASE_URL.to_string());
                Ok(Box::new(BananaProvider::with_retry_policy(
                    api_key, base_url, policy,
                )?))
            }
            ProviderType::Gemini => {
                let base_url = config
                    .base_url
                    .clone()
                    .unwrap_or_else(|| crate::providers::gemini::client::DEFAULT_BASE_URL.to_string());
                Ok(Box::new(GeminiProvider::with_retry_policy(
                    api_key, base_url, policy,
                )?))
            }
        }
    }

    /// Create a provider from environment variables.
    pub fn from_env() -> Result<Box<dyn ImageProvider>, GenerationError> {
        let config = ProviderConfig::from_env()?;
        Self::create(&config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_type_parsing() {
        assert_eq!("banana".parse::<ProviderType>().unwrap(), ProviderType::Banana);
        assert_eq!(" Gemini ".parse::<ProviderType>().unwrap(), ProviderType::Gemini);
        assert_eq!("google".parse::<ProviderType>().unwrap(), ProviderType::Gemini);

        let err = "dalle".parse::<ProviderType>().unwrap_err();
        assert!(err.to_string().contains("Invalid IMAGE_PROVIDER 'dalle'"));
    }

    #[test]
    fn test_create_selects_shape() {
        let banana = ProviderFactory::create(&ProviderConfig::new(
            ProviderType::Banana,
            Some("k".to_string()),
        ))
        .unwrap();
        assert_eq!(banana.name(), "Nano Banana");
        assert_eq!(banana.api_key_env(), "NANO_BANANA_API_KEY");

        let gemini = ProviderFactory::create(
            &ProviderConfig::new(ProviderType::Gemini, None).with_base_url("http://localhost:1"),
        )
        .unwrap();
        assert_eq!(gemini.name(), "Gemini");
        assert!(!gemini.is_configured());
    }

    #[test]
    fn test_defaults_are_provider_specific() {
        let banana =
            ProviderFactory::create(&ProviderConfig::new(ProviderType::Banana, None)).unwrap();
        assert_eq!(banana.defaults().model, "banana-v3");
        assert_eq!(banana.defaults().sampler, "euler_a");

        let gemini =
            ProviderFactory::create(&ProviderConfig::new(ProviderType::Gemini, None)).unwrap();
        assert_eq!(gemini.defaults().model, "gemini-2.5-flash-image");
    }
}
