//! Bibliographic source abstraction
//!
//! Provides a unified interface over the providers a search can be served from:
//! - OpenAlex (abstracts as word-position inverted indexes)
//! - Semantic Scholar Graph API (plain-string abstracts)
//! - An in-memory mock for tests and offline use
//!
//! Each adapter translates provider JSON into [`SeedWork`] / [`SourceRecord`].

mod mock;
mod openalex;
mod semantic_scholar;

pub use mock::MockSource;
pub use openalex::{abstract_from_inverted_index, OpenAlexSource};
pub use semantic_scholar::SemanticScholarSource;

use crate::config::SourceConfig;
use crate::errors::{AppError, Result};
use crate::metrics;
use crate::models::{SeedWork, SourceRecord};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// User agent sent to bibliographic providers
pub const USER_AGENT: &str = concat!("PaperScope/", env!("CARGO_PKG_VERSION"));

/// Trait for bibliographic lookups
#[async_trait]
pub trait BibliographicSource: Send + Sync {
    /// Find the best-matching work for free-text search; None when nothing matches
    async fn search_by_query(&self, query: &str) -> Result<Option<SeedWork>>;

    /// Works referenced by the seed, at most `limit`
    async fn references_of(&self, seed: &SeedWork, limit: usize) -> Result<Vec<SourceRecord>>;

    /// Works citing the seed, at most `limit`
    async fn citers_of(&self, seed: &SeedWork, limit: usize) -> Result<Vec<SourceRecord>>;

    /// Provider name for logs and metrics
    fn name(&self) -> &str;
}

/// Create a bibliographic source based on configuration
pub fn create_source(config: &SourceConfig) -> Result<Arc<dyn BibliographicSource>> {
    match config.provider.as_str() {
        "openalex" => {
            let client = build_client(config.timeout())?;
            Ok(Arc::new(OpenAlexSource::new(
                client,
                config.base_url.clone(),
                config.api_key.clone(),
                config.mailto.clone(),
            )))
        }
        "semantic_scholar" => {
            let client = build_client(config.timeout())?;
            Ok(Arc::new(SemanticScholarSource::new(
                client,
                config.base_url.clone(),
                config.api_key.clone(),
            )))
        }
        "mock" => {
            tracing::warn!("Using mock bibliographic source");
            Ok(Arc::new(MockSource::empty()))
        }
        other => Err(AppError::Configuration {
            message: format!("Unknown bibliographic source provider: {}", other),
        }),
    }
}

fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| AppError::Internal {
            message: format!("Failed to create HTTP client: {}", e),
        })
}

/// Send a provider request and decode its JSON body.
///
/// Transport failures, timeouts and non-success statuses all become upstream
/// errors; every call is recorded in the upstream metrics.
pub(crate) async fn fetch_json<T>(
    request: reqwest::RequestBuilder,
    provider: &str,
    operation: &'static str,
) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let start = Instant::now();
    let result = send_and_decode(request, provider).await;
    let elapsed = start.elapsed();

    metrics::record_upstream(provider, operation, elapsed.as_secs_f64(), result.is_ok());

    match &result {
        Ok(_) => tracing::debug!(
            provider = provider,
            operation = operation,
            latency_ms = elapsed.as_millis() as u64,
            "Upstream call completed"
        ),
        Err(e) => tracing::warn!(
            provider = provider,
            operation = operation,
            error = %e,
            "Upstream call failed"
        ),
    }

    result
}

async fn send_and_decode<T>(request: reqwest::RequestBuilder, provider: &str) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let response = request.send().await.map_err(|e| classify(e, provider))?;

    let status = response.status();
    if status.as_u16() == 429 {
        return Err(AppError::upstream(provider, "Rate limited (429)"));
    }
    if !status.is_success() {
        return Err(AppError::upstream(provider, format!("HTTP {}", status)));
    }

    let body = response.bytes().await.map_err(|e| classify(e, provider))?;
    serde_json::from_slice(&body).map_err(|e| {
        AppError::upstream(provider, format!("Failed to parse response: {}", e))
    })
}

fn classify(err: reqwest::Error, provider: &str) -> AppError {
    if err.is_timeout() {
        AppError::UpstreamTimeout {
            service: provider.to_string(),
        }
    } else {
        AppError::upstream(provider, format!("Request failed: {}", err))
    }
}
