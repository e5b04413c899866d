//! Chat completion abstraction
//!
//! Single-turn and stateless: each call sends one user message and returns one
//! reply. Providers:
//! - OpenAI-compatible chat completions
//! - Google Gemini `generateContent`
//! - Mock echo completer for tests and offline use

mod gemini;
mod mock;
mod openai;

pub use gemini::GeminiCompleter;
pub use mock::{DisabledCompleter, EchoCompleter};
pub use openai::OpenAICompleter;

use crate::config::ChatConfig;
use crate::errors::{AppError, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Trait for generative chat collaborators
#[async_trait]
pub trait ChatCompleter: Send + Sync {
    /// Produce a reply to a single message
    async fn complete(&self, message: &str) -> Result<String>;

    /// Provider name for logs and metrics
    fn provider(&self) -> &str;
}

/// Create a chat completer based on configuration.
///
/// A provider without an API key yields a [`DisabledCompleter`] so the rest of
/// the service still starts; chat requests then fail with a logged reason.
pub fn create_completer(config: &ChatConfig) -> Result<Arc<dyn ChatCompleter>> {
    let api_key = config.api_key.clone().filter(|k| !k.is_empty());

    match (config.provider.as_str(), api_key) {
        ("openai", Some(key)) => Ok(Arc::new(OpenAICompleter::new(config, key)?)),
        ("gemini", Some(key)) => Ok(Arc::new(GeminiCompleter::new(config, key)?)),
        ("openai" | "gemini", None) => {
            tracing::warn!(
                provider = %config.provider,
                "Chat API key not configured, chat disabled"
            );
            Ok(Arc::new(DisabledCompleter::new(&config.provider)))
        }
        ("mock", _) => {
            tracing::warn!("Using mock chat completer");
            Ok(Arc::new(EchoCompleter))
        }
        (other, _) => Err(AppError::Configuration {
            message: format!("Unknown chat provider: {}", other),
        }),
    }
}

pub(crate) fn build_client(config: &ChatConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.timeout())
        .build()
        .map_err(|e| AppError::Internal {
            message: format!("Failed to create HTTP client: {}", e),
        })
}

pub(crate) fn request_error(provider: &str, err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::UpstreamTimeout {
            service: provider.to_string(),
        }
    } else {
        AppError::Chat {
            message: format!("{} request failed: {}", provider, err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_disables_chat() {
        let config = ChatConfig::default();
        let completer = create_completer(&config).unwrap();
        assert_eq!(completer.provider(), "openai");
    }

    #[tokio::test]
    async fn test_disabled_completer_fails() {
        let config = ChatConfig {
            provider: "gemini".into(),
            ..ChatConfig::default()
        };
        let completer = create_completer(&config).unwrap();
        let err = completer.complete("hello").await.unwrap_err();
        assert!(err.is_server_error());
    }

    #[test]
    fn test_configured_providers() {
        let config = ChatConfig {
            provider: "gemini".into(),
            api_key: Some("key".into()),
            ..ChatConfig::default()
        };
        assert_eq!(create_completer(&config).unwrap().provider(), "gemini");

        let config = ChatConfig {
            provider: "mock".into(),
            ..ChatConfig::default()
        };
        assert_eq!(create_completer(&config).unwrap().provider(), "mock");
    }

    #[test]
    fn test_unknown_provider() {
        let config = ChatConfig {
            provider: "eliza".into(),
            ..ChatConfig::default()
        };
        assert!(matches!(
            create_completer(&config),
            Err(AppError::Configuration { .. })
        ));
    }
}
