//! Explore service
//!
//! One search: resolve the seed, fetch its references and citing works
//! concurrently, then run the ranking pipeline over the combined pool.
//! Either fetch failing fails the whole search; no partial results.

use crate::ranking::CandidatePipeline;
use chrono::Datelike;
use paperscope_common::config::{PipelineConfig, SourceConfig};
use paperscope_common::errors::Result;
use paperscope_common::metrics;
use paperscope_common::models::Work;
use paperscope_common::sources::BibliographicSource;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument};

/// Result of exploring a query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Exploration {
    /// Best match for the query; `None` when the source found nothing
    pub seed: Option<Work>,
    pub candidates: Vec<Work>,
}

impl Exploration {
    /// The legitimate empty result
    pub fn not_found() -> Self {
        Self::default()
    }
}

/// Orchestrates source lookups and the candidate pipeline
pub struct ExploreService {
    source: Arc<dyn BibliographicSource>,
    pipeline: CandidatePipeline,
    reference_limit: usize,
    citing_limit: usize,
}

impl ExploreService {
    /// Create a new explore service
    pub fn new(
        source: Arc<dyn BibliographicSource>,
        pipeline: PipelineConfig,
        source_config: &SourceConfig,
    ) -> Self {
        Self {
            source,
            pipeline: CandidatePipeline::new(pipeline),
            reference_limit: source_config.reference_limit,
            citing_limit: source_config.citing_limit,
        }
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub fn pipeline(&self) -> &CandidatePipeline {
        &self.pipeline
    }

    /// Explore `query` against the current calendar year
    pub async fn explore(&self, query: &str) -> Result<Exploration> {
        self.explore_at(query, chrono::Utc::now().year()).await
    }

    /// Explore `query` with recency judged against `current_year`
    #[instrument(skip(self), fields(source = %self.source.name()))]
    pub async fn explore_at(&self, query: &str, current_year: i32) -> Result<Exploration> {
        let start = Instant::now();

        let Some(seed) = self.source.search_by_query(query).await? else {
            info!("No seed found");
            metrics::record_search(start.elapsed().as_secs_f64(), false, 0, 0);
            return Ok(Exploration::not_found());
        };

        let (references, citers) = tokio::try_join!(
            self.source.references_of(&seed, self.reference_limit),
            self.source.citers_of(&seed, self.citing_limit),
        )?;

        let reference_count = references.len();
        let citer_count = citers.len();

        // References first, then citing works: encounter order breaks score ties
        let mut pool = references;
        pool.extend(citers);
        let pool_size = pool.len();

        let candidates = self.pipeline.rank_works(&seed.id, pool, current_year);

        let elapsed = start.elapsed();
        metrics::record_search(elapsed.as_secs_f64(), true, pool_size, candidates.len());

        info!(
            seed_id = %seed.id,
            references = reference_count,
            citers = citer_count,
            candidates = candidates.len(),
            duration_ms = elapsed.as_millis() as u64,
            "Exploration complete"
        );

        Ok(Exploration {
            seed: Some(seed.work),
            candidates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paperscope_common::models::{SeedWork, SourceRecord};
    use paperscope_common::sources::MockSource;

    const YEAR: i32 = 2025;

    fn work(title: &str, year: i32, citations: u64) -> Work {
        Work {
            title: title.to_string(),
            authors: "A. Author".to_string(),
            year: Some(year),
            citations,
            abstract_text: format!("Abstract of {}", title),
            doi: None,
        }
    }

    fn seed() -> SeedWork {
        SeedWork {
            id: "W-attention".into(),
            work: work("Attention Is All You Need", 2017, 45231),
            reference_ids: vec![],
        }
    }

    fn service(source: MockSource) -> ExploreService {
        ExploreService::new(
            Arc::new(source),
            PipelineConfig::default(),
            &SourceConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_no_seed_is_empty_result() {
        let result = service(MockSource::empty())
            .explore_at("transformer", YEAR)
            .await
            .unwrap();

        assert_eq!(result, Exploration::not_found());
        let json = serde_json::to_value(&result).unwrap();
        assert!(json["seed"].is_null());
        assert_eq!(json["candidates"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_ranks_combined_pool() {
        let references = vec![SourceRecord::new("R1", work("Neural machine translation", 2014, 30000))];
        let citers = vec![
            SourceRecord::new("C1", work("BERT", 2018, 38492)),
            SourceRecord::new("C2", work("Weak follow-up", 2019, 3)),
        ];
        let result = service(MockSource::new(seed(), references, citers))
            .explore_at("attention", YEAR)
            .await
            .unwrap();

        assert_eq!(result.seed.unwrap().title, "Attention Is All You Need");
        let titles: Vec<&str> = result.candidates.iter().map(|w| w.title.as_str()).collect();
        assert_eq!(titles, vec!["BERT", "Neural machine translation"]);
    }

    #[tokio::test]
    async fn test_seed_never_in_candidates() {
        let citers = vec![
            SourceRecord::new("W-attention", seed().work),
            SourceRecord::new("C1", work("BERT", 2018, 38492)),
        ];
        let result = service(MockSource::new(seed(), vec![], citers))
            .explore_at("attention", YEAR)
            .await
            .unwrap();

        assert_eq!(result.candidates.len(), 1);
        assert_eq!(result.candidates[0].title, "BERT");
    }

    #[tokio::test]
    async fn test_duplicate_across_references_and_citers() {
        let shared = work("Layer normalization", 2016, 9000);
        let references = vec![SourceRecord::new("X", shared.clone())];
        let citers = vec![SourceRecord::new("X", shared)];
        let result = service(MockSource::new(seed(), references, citers))
            .explore_at("attention", YEAR)
            .await
            .unwrap();

        assert_eq!(result.candidates.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_fails_search() {
        let references = vec![SourceRecord::new("R1", work("Neural machine translation", 2014, 30000))];
        let source = MockSource::new(seed(), references, vec![]).failing_citers();

        let result = service(source).explore_at("attention", YEAR).await;
        let err = tokio_test::assert_err!(result);
        assert!(err.is_server_error());
    }

    #[tokio::test]
    async fn test_source_limits_are_passed_through() {
        let citers: Vec<SourceRecord> = (0..30)
            .map(|i| SourceRecord::new(format!("C{}", i), work(&format!("Paper {}", i), 2024, 100)))
            .collect();
        let result = service(MockSource::new(seed(), vec![], citers))
            .explore_at("attention", YEAR)
            .await
            .unwrap();

        assert_eq!(result.candidates.len(), SourceConfig::default().citing_limit);
    }
}
