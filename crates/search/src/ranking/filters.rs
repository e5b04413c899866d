//! Deduplication and filters

use paperscope_common::config::PipelineConfig;
use paperscope_common::models::{SourceRecord, Work};
use std::collections::HashSet;

/// Keep the first record per source id.
///
/// Records without an id are dropped, as are records carrying `seed_id`.
pub fn deduplicate(pool: Vec<SourceRecord>, seed_id: &str) -> Vec<(String, Work)> {
    let mut seen: HashSet<String> = HashSet::with_capacity(pool.len());

    pool.into_iter()
        .filter_map(|record| {
            let id = record.id?;
            if id == seed_id || !seen.insert(id.clone()) {
                return None;
            }
            Some((id, record.work))
        })
        .collect()
}

/// Has an abstract and enough citations to be worth showing
pub fn passes_quality(work: &Work, config: &PipelineConfig) -> bool {
    work.has_abstract() && work.citations >= config.min_citations
}

/// Recent, or influential regardless of age
pub fn passes_relevance(work: &Work, config: &PipelineConfig, current_year: i32) -> bool {
    let recent = work
        .year
        .map_or(false, |year| year >= current_year - config.recent_window_years);

    recent || work.citations >= config.influential_citations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn work(year: Option<i32>, citations: u64, abstract_text: &str) -> Work {
        Work {
            year,
            citations,
            abstract_text: abstract_text.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_deduplicate_drops_missing_ids() {
        let pool = vec![
            SourceRecord { id: None, work: Work::default() },
            SourceRecord::new("A", Work::default()),
            SourceRecord::new("A", Work { title: "again".into(), ..Default::default() }),
            SourceRecord::new("B", Work::default()),
        ];

        let unique = deduplicate(pool, "seed");
        let ids: Vec<&str> = unique.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
        assert_eq!(unique[0].1.title, "");
    }

    #[test]
    fn test_quality_thresholds() {
        let config = PipelineConfig::default();
        assert!(passes_quality(&work(None, 5, "text"), &config));
        assert!(!passes_quality(&work(None, 4, "text"), &config));
        assert!(!passes_quality(&work(None, 500, ""), &config));
        assert!(!passes_quality(&work(None, 500, " \n\t"), &config));
    }

    #[test]
    fn test_relevance_is_or() {
        let config = PipelineConfig::default();
        // Boundary year passes
        assert!(passes_relevance(&work(Some(2020), 0, ""), &config, 2025));
        assert!(!passes_relevance(&work(Some(2019), 49, ""), &config, 2025));
        // Old but influential passes
        assert!(passes_relevance(&work(Some(1998), 50, ""), &config, 2025));
        // Missing year only passes on citations
        assert!(!passes_relevance(&work(None, 10, ""), &config, 2025));
        assert!(passes_relevance(&work(None, 75, ""), &config, 2025));
    }
}
