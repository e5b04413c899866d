//! Two-term ranking score: weighted log-citations plus a recency boost

use paperscope_common::config::PipelineConfig;
use paperscope_common::models::Work;

/// Score a work; higher ranks first.
///
/// `citation_weight * log10(c + 1) + recency_weight * boost`, where `c` is the
/// citation count clamped to `citation_cap` when one is configured.
pub fn score(work: &Work, config: &PipelineConfig, current_year: i32) -> f64 {
    let citations = match config.citation_cap {
        Some(cap) => work.citations.min(cap),
        None => work.citations,
    };

    let citation_term = (citations as f64 + 1.0).log10();
    config.citation_weight * citation_term
        + config.recency_weight * recency_boost(work.year, config, current_year)
}

/// Boost for publication in the last one or two years; a missing year counts as old
pub fn recency_boost(year: Option<i32>, config: &PipelineConfig, current_year: i32) -> f64 {
    match year {
        Some(y) if y >= current_year - 1 => config.latest_boost,
        Some(y) if y >= current_year - 2 => config.recent_boost,
        _ => config.base_boost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn work(year: Option<i32>, citations: u64) -> Work {
        Work {
            year,
            citations,
            ..Default::default()
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_recency_tiers() {
        let config = PipelineConfig::default();
        assert_eq!(recency_boost(Some(2025), &config, 2025), 1.0);
        assert_eq!(recency_boost(Some(2024), &config, 2025), 1.0);
        assert_eq!(recency_boost(Some(2023), &config, 2025), 0.5);
        assert_eq!(recency_boost(Some(2022), &config, 2025), 0.2);
        assert_eq!(recency_boost(None, &config, 2025), 0.2);
        // Future-dated preprints count as latest
        assert_eq!(recency_boost(Some(2026), &config, 2025), 1.0);
    }

    #[test]
    fn test_score_formula() {
        let config = PipelineConfig::default();
        // 99 citations -> log10(100) = 2
        assert!(approx(score(&work(Some(2010), 99), &config, 2025), 0.3 * 2.0 + 0.2 * 0.2));
        // No citations, this year
        assert!(approx(score(&work(Some(2025), 0), &config, 2025), 0.2));
    }

    #[test]
    fn test_uncapped_by_default() {
        let config = PipelineConfig::default();
        let a = score(&work(Some(2010), 100), &config, 2025);
        let b = score(&work(Some(2010), 100_000), &config, 2025);
        assert!(b > a);
    }

    #[test]
    fn test_citation_cap() {
        let config = PipelineConfig {
            citation_cap: Some(100),
            ..PipelineConfig::default()
        };
        let a = score(&work(Some(2010), 100), &config, 2025);
        let b = score(&work(Some(2010), 100_000), &config, 2025);
        assert!(approx(a, b));
    }

    #[test]
    fn test_score_is_finite_for_extremes() {
        let config = PipelineConfig::default();
        assert!(score(&work(None, u64::MAX), &config, 2025).is_finite());
        assert!(score(&work(Some(i32::MIN), 0), &config, 2025).is_finite());
    }
}
