//! PaperScope Search
//!
//! The request-scoped logic behind a search:
//! - Candidate ranking pipeline (dedupe, quality and relevance filters, scoring)
//! - Lexical similarity graph over the ranked candidates
//! - Explore service fanning out to a bibliographic source

pub mod explore;
pub mod ranking;
pub mod similarity;

pub use explore::{ExploreService, Exploration};
pub use paperscope_common::config::{GraphConfig, PipelineConfig};
pub use ranking::{CandidatePipeline, ScoredCandidate};
pub use similarity::{build_graph, SimilarityGraph};
