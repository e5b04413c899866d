//! Offline completers

use super::ChatCompleter;
use crate::errors::{AppError, Result};
use async_trait::async_trait;

/// Echoes the message back; used for tests and local development
pub struct EchoCompleter;

#[async_trait]
impl ChatCompleter for EchoCompleter {
    async fn complete(&self, message: &str) -> Result<String> {
        Ok(format!("You said: {}", message))
    }

    fn provider(&self) -> &str {
        "mock"
    }
}

/// Stands in for a provider that has no API key
pub struct DisabledCompleter {
    provider: String,
}

impl DisabledCompleter {
    pub fn new(provider: &str) -> Self {
        Self {
            provider: provider.to_string(),
        }
    }
}

#[async_trait]
impl ChatCompleter for DisabledCompleter {
    async fn complete(&self, _message: &str) -> Result<String> {
        Err(AppError::Configuration {
            message: format!("No API key configured for chat provider {}", self.provider),
        })
    }

    fn provider(&self) -> &str {
        &self.provider
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echo() {
        let reply = EchoCompleter.complete("hello").await.unwrap();
        assert_eq!(reply, "You said: hello");
    }

    #[test]
    fn test_disabled_completer_errors() {
        let completer = DisabledCompleter::new("openai");
        let err = tokio_test::block_on(completer.complete("hello")).unwrap_err();
        assert!(matches!(err, AppError::Configuration { .. }));
        assert_eq!(completer.provider(), "openai");
    }
}
