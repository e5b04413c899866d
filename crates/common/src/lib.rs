//! PaperScope Common Library
//!
//! Shared code for the PaperScope services including:
//! - The canonical work model
//! - Bibliographic source adapters (OpenAlex, Semantic Scholar)
//! - Chat completion clients
//! - Error types and handling
//! - Configuration management
//! - Metrics and observability

pub mod chat;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod sources;

// Re-export commonly used types
pub use chat::ChatCompleter;
pub use config::AppConfig;
pub use errors::{AppError, Result};
pub use models::{SeedWork, SourceRecord, Work};
pub use sources::BibliographicSource;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
