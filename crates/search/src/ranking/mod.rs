//! Candidate ranking pipeline
//!
//! Turns the raw related-work pool of a seed into the Ranked Candidate Set:
//! deduplicate -> quality filter -> relevance filter -> score -> stable sort -> truncate.
//! Every step is total; malformed records degrade to defaults and an empty pool
//! yields an empty result.

mod filters;
mod score;

pub use filters::{deduplicate, passes_quality, passes_relevance};
pub use score::{recency_boost, score};

use paperscope_common::config::PipelineConfig;
use paperscope_common::models::{SourceRecord, Work};

/// A candidate that survived filtering, with its computed score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub id: String,
    pub work: Work,
    pub score: f64,
}

/// Ranking pipeline parameterised by its thresholds
#[derive(Debug, Clone, Default)]
pub struct CandidatePipeline {
    config: PipelineConfig,
}

impl CandidatePipeline {
    /// Create a new pipeline
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Rank a raw pool against `current_year`.
    ///
    /// `seed_id` records are excluded so the seed never appears among its own
    /// candidates.
    pub fn rank(
        &self,
        seed_id: &str,
        pool: Vec<SourceRecord>,
        current_year: i32,
    ) -> Vec<ScoredCandidate> {
        let pool_size = pool.len();
        let unique = deduplicate(pool, seed_id);
        let unique_count = unique.len();

        let mut ranked: Vec<ScoredCandidate> = unique
            .into_iter()
            .filter(|(_, work)| passes_quality(work, &self.config))
            .filter(|(_, work)| passes_relevance(work, &self.config, current_year))
            .map(|(id, work)| {
                let score = score(&work, &self.config, current_year);
                ScoredCandidate { id, work, score }
            })
            .collect();

        // `sort_by` is stable: equal scores keep encounter order
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        let kept = ranked.len();
        ranked.truncate(self.config.max_candidates);

        tracing::debug!(
            pool = pool_size,
            unique = unique_count,
            filtered = kept,
            returned = ranked.len(),
            "Candidates ranked"
        );

        ranked
    }

    /// Rank and strip down to the works shown to the user
    pub fn rank_works(&self, seed_id: &str, pool: Vec<SourceRecord>, current_year: i32) -> Vec<Work> {
        self.rank(seed_id, pool, current_year)
            .into_iter()
            .map(|c| c.work)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const YEAR: i32 = 2025;

    fn record(id: &str, year: Option<i32>, citations: u64, abstract_text: &str) -> SourceRecord {
        SourceRecord::new(
            id,
            Work {
                title: format!("Paper {}", id),
                year,
                citations,
                abstract_text: abstract_text.to_string(),
                ..Default::default()
            },
        )
    }

    fn pipeline() -> CandidatePipeline {
        CandidatePipeline::new(PipelineConfig::default())
    }

    #[test]
    fn test_empty_pool() {
        assert!(pipeline().rank("S", vec![], YEAR).is_empty());
    }

    #[test]
    fn test_quality_scenario() {
        // Seed: "Attention Is All You Need"; one weak citer, one strong one
        let pool = vec![
            record("W-weak", Some(2019), 3, "A short note on transformers."),
            record("W-bert", Some(2018), 38492, "We introduce a new language representation model called BERT."),
        ];

        let ranked = pipeline().rank("W-attention", pool, YEAR);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].id, "W-bert");
    }

    #[test]
    fn test_all_filtered_is_empty() {
        let pool = vec![
            record("A", Some(2024), 100, ""),
            record("B", Some(2010), 10, "old and rarely cited"),
            record("C", None, 4, "no year"),
        ];
        assert!(pipeline().rank("S", pool, YEAR).is_empty());
    }

    #[test]
    fn test_first_duplicate_wins() {
        let mut second = record("dup", Some(2024), 500, "later copy");
        second.work.title = "Second".into();
        let mut first = record("dup", Some(2024), 10, "first copy");
        first.work.title = "First".into();

        let ranked = pipeline().rank("S", vec![first, second], YEAR);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].work.title, "First");
    }

    #[test]
    fn test_seed_is_excluded() {
        let pool = vec![
            record("S", Some(2024), 900, "the seed itself"),
            record("X", Some(2024), 900, "a citer"),
        ];
        let ranked = pipeline().rank("S", pool, YEAR);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].id, "X");
    }

    #[test]
    fn test_sorted_by_score_descending() {
        let pool = vec![
            record("low", Some(2015), 60, "abstract"),
            record("high", Some(2024), 10_000, "abstract"),
            record("mid", Some(2023), 200, "abstract"),
        ];
        let ids: Vec<String> = pipeline().rank("S", pool, YEAR).into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_equal_scores_keep_input_order() {
        let pool: Vec<SourceRecord> = (0..10)
            .map(|i| record(&format!("tie{}", i), Some(2021), 80, "same shape"))
            .collect();

        let ids: Vec<String> = pipeline().rank("S", pool, YEAR).into_iter().map(|c| c.id).collect();
        let expected: Vec<String> = (0..10).map(|i| format!("tie{}", i)).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_output_respects_invariants() {
        // Mixed pool with duplicates, missing ids, and every filter edge
        let mut pool = Vec::new();
        for i in 0..120u64 {
            let year = match i % 4 {
                0 => Some(YEAR - (i as i32 % 12)),
                1 => None,
                2 => Some(1990),
                _ => Some(YEAR),
            };
            let abstract_text = if i % 7 == 0 { "  " } else { "text" };
            let mut r = record(&format!("W{}", i % 90), year, i % 130, abstract_text);
            if i % 11 == 0 {
                r.id = None;
            }
            pool.push(r);
        }

        let config = PipelineConfig::default();
        let ranked = pipeline().rank("W3", pool, YEAR);

        assert!(ranked.len() <= 40);
        let mut seen = HashSet::new();
        for c in &ranked {
            assert!(seen.insert(c.id.clone()), "duplicate {}", c.id);
            assert_ne!(c.id, "W3");
            assert!(c.work.has_abstract());
            assert!(c.work.citations >= config.min_citations);
            let recent = c.work.year.map_or(false, |y| y >= YEAR - 5);
            assert!(recent || c.work.citations >= 50);
        }
        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_truncates_to_cap() {
        let pool: Vec<SourceRecord> = (0..100)
            .map(|i| record(&format!("W{}", i), Some(YEAR), 10 + i, "abstract"))
            .collect();

        let ranked = pipeline().rank("S", pool, YEAR);
        assert_eq!(ranked.len(), 40);
        // Highest citation counts survive the cut
        assert_eq!(ranked[0].id, "W99");
    }

    #[test]
    fn test_custom_cap() {
        let config = PipelineConfig {
            max_candidates: 2,
            ..PipelineConfig::default()
        };
        let pool: Vec<SourceRecord> = (0..5)
            .map(|i| record(&format!("W{}", i), Some(YEAR), 10, "abstract"))
            .collect();

        let works = CandidatePipeline::new(config).rank_works("S", pool, YEAR);
        assert_eq!(works.len(), 2);
        assert_eq!(works[0].title, "Paper W0");
    }
}
