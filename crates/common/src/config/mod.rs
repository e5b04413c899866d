//! Configuration management for PaperScope services
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config/default, config/{APP_ENV}, config/local)
//! - Default values
//!
//! Provider API keys may also come from their conventional variables
//! (`OPENAI_API_KEY`, `GEMINI_API_KEY`, `OPENALEX_API_KEY`, `S2_API_KEY`).

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Bibliographic source configuration
    #[serde(default)]
    pub source: SourceConfig,

    /// Chat collaborator configuration
    #[serde(default)]
    pub chat: ChatConfig,

    /// Candidate ranking thresholds
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Similarity graph thresholds
    #[serde(default)]
    pub graph: GraphConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Directory holding the search page and its assets
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Provider: openalex, semantic_scholar, mock
    #[serde(default = "default_source_provider")]
    pub provider: String,

    /// API base URL (for custom endpoints)
    pub base_url: Option<String>,

    /// API key, optional for both public providers
    pub api_key: Option<String>,

    /// Contact address for the OpenAlex polite pool
    pub mailto: Option<String>,

    /// Per-call timeout in seconds
    #[serde(default = "default_source_timeout")]
    pub timeout_secs: u64,

    /// Maximum references fetched for a seed
    #[serde(default = "default_reference_limit")]
    pub reference_limit: usize,

    /// Maximum citing works fetched for a seed
    #[serde(default = "default_citing_limit")]
    pub citing_limit: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatConfig {
    /// Provider: openai, gemini, mock
    #[serde(default = "default_chat_provider")]
    pub provider: String,

    /// API endpoint override
    pub endpoint: Option<String>,

    /// API key
    pub api_key: Option<String>,

    /// Model to use (provider default when unset)
    pub model: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_chat_timeout")]
    pub timeout_secs: u64,

    /// Optional system instruction prepended to every exchange
    pub system_prompt: Option<String>,
}

/// Thresholds for the candidate ranking pipeline
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Minimum citation count to pass the quality filter
    #[serde(default = "default_min_citations")]
    pub min_citations: u64,

    /// A work this many years old or newer counts as recent
    #[serde(default = "default_recent_window_years")]
    pub recent_window_years: i32,

    /// Citation count that qualifies a work regardless of its age
    #[serde(default = "default_influential_citations")]
    pub influential_citations: u64,

    /// Weight of the log-citation term
    #[serde(default = "default_citation_weight")]
    pub citation_weight: f64,

    /// Weight of the recency boost term
    #[serde(default = "default_recency_weight")]
    pub recency_weight: f64,

    /// Boost for works from the current or previous year
    #[serde(default = "default_latest_boost")]
    pub latest_boost: f64,

    /// Boost for works from two years ago
    #[serde(default = "default_recent_boost")]
    pub recent_boost: f64,

    /// Boost for everything older, including works without a year
    #[serde(default = "default_base_boost")]
    pub base_boost: f64,

    /// Citation counts above this are clamped before the logarithm; None disables
    #[serde(default)]
    pub citation_cap: Option<u64>,

    /// Maximum candidates returned
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
}

/// Thresholds for the similarity graph
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GraphConfig {
    /// Minimum Jaccard overlap for a candidate-candidate edge
    #[serde(default = "default_overlap_threshold")]
    pub overlap_threshold: f64,

    /// Node labels longer than this many characters are truncated
    #[serde(default = "default_label_max_chars")]
    pub label_max_chars: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (debug, info, warn, error) or a full EnvFilter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default = "default_json_logging")]
    pub json_logging: bool,

    /// Prometheus exporter port (0 to disable)
    #[serde(default)]
    pub metrics_port: u16,

    /// Service name for tracing
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

// Default value functions
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 3000 }
fn default_request_timeout() -> u64 { 60 }
fn default_static_dir() -> String { "static".to_string() }
fn default_source_provider() -> String { "openalex".to_string() }
fn default_source_timeout() -> u64 { 15 }
fn default_reference_limit() -> usize { 15 }
fn default_citing_limit() -> usize { 15 }
fn default_chat_provider() -> String { "openai".to_string() }
fn default_chat_timeout() -> u64 { 30 }
fn default_min_citations() -> u64 { 5 }
fn default_recent_window_years() -> i32 { 5 }
fn default_influential_citations() -> u64 { 50 }
fn default_citation_weight() -> f64 { 0.3 }
fn default_recency_weight() -> f64 { 0.2 }
fn default_latest_boost() -> f64 { 1.0 }
fn default_recent_boost() -> f64 { 0.5 }
fn default_base_boost() -> f64 { 0.2 }
fn default_max_candidates() -> usize { 40 }
fn default_overlap_threshold() -> f64 { 0.15 }
fn default_label_max_chars() -> usize { 50 }
fn default_log_level() -> String { "info".to_string() }
fn default_json_logging() -> bool { true }
fn default_service_name() -> String { "paperscope".to_string() }

impl AppConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Load base config file
            .add_source(File::with_name("config/default").required(false))

            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))

            // Load local overrides
            .add_source(File::with_name("config/local").required(false))

            // Load from environment variables with APP__ prefix
            // e.g., APP__SERVER__PORT=8081
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
            )

            .build()?;

        let mut config: AppConfig = config.try_deserialize()?;
        config.apply_key_fallbacks(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Fill unset provider keys from their conventional variables
    pub fn apply_key_fallbacks<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.source.api_key.is_none() {
            let var = match self.source.provider.as_str() {
                "semantic_scholar" => "S2_API_KEY",
                _ => "OPENALEX_API_KEY",
            };
            self.source.api_key = lookup(var).filter(|k| !k.is_empty());
        }

        if self.chat.api_key.is_none() {
            let var = match self.chat.provider.as_str() {
                "gemini" => "GEMINI_API_KEY",
                _ => "OPENAI_API_KEY",
            };
            self.chat.api_key = lookup(var).filter(|k| !k.is_empty());
        }
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ChatConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            provider: default_source_provider(),
            base_url: None,
            api_key: None,
            mailto: None,
            timeout_secs: default_source_timeout(),
            reference_limit: default_reference_limit(),
            citing_limit: default_citing_limit(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            provider: default_chat_provider(),
            endpoint: None,
            api_key: None,
            model: None,
            timeout_secs: default_chat_timeout(),
            system_prompt: None,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_citations: default_min_citations(),
            recent_window_years: default_recent_window_years(),
            influential_citations: default_influential_citations(),
            citation_weight: default_citation_weight(),
            recency_weight: default_recency_weight(),
            latest_boost: default_latest_boost(),
            recent_boost: default_recent_boost(),
            base_boost: default_base_boost(),
            citation_cap: None,
            max_candidates: default_max_candidates(),
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            overlap_threshold: default_overlap_threshold(),
            label_max_chars: default_label_max_chars(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: default_json_logging(),
            metrics_port: 0,
            service_name: default_service_name(),
        }
    }
}
