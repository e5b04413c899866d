//! In-memory bibliographic source

use super::BibliographicSource;
use crate::errors::{AppError, Result};
use crate::models::{SeedWork, SourceRecord};
use async_trait::async_trait;

/// Mock source for testing; serves fixed records for any query
#[derive(Debug, Clone, Default)]
pub struct MockSource {
    seed: Option<SeedWork>,
    references: Vec<SourceRecord>,
    citers: Vec<SourceRecord>,
    fail_citers: bool,
}

impl MockSource {
    /// A source that never finds a seed
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(seed: SeedWork, references: Vec<SourceRecord>, citers: Vec<SourceRecord>) -> Self {
        Self {
            seed: Some(seed),
            references,
            citers,
            fail_citers: false,
        }
    }

    /// Make the citing-works lookup fail, to exercise the all-or-nothing join
    pub fn failing_citers(mut self) -> Self {
        self.fail_citers = true;
        self
    }
}

#[async_trait]
impl BibliographicSource for MockSource {
    async fn search_by_query(&self, _query: &str) -> Result<Option<SeedWork>> {
        Ok(self.seed.clone())
    }

    async fn references_of(&self, _seed: &SeedWork, limit: usize) -> Result<Vec<SourceRecord>> {
        Ok(self.references.iter().take(limit).cloned().collect())
    }

    async fn citers_of(&self, _seed: &SeedWork, limit: usize) -> Result<Vec<SourceRecord>> {
        if self.fail_citers {
            return Err(AppError::upstream("mock", "citing works unavailable"));
        }
        Ok(self.citers.iter().take(limit).cloned().collect())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Work;

    #[tokio::test]
    async fn test_empty_source_has_no_seed() {
        let source = MockSource::empty();
        assert!(source.search_by_query("transformer").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_limits_are_applied() {
        let seed = SeedWork {
            id: "S".into(),
            work: Work::default(),
            reference_ids: vec![],
        };
        let refs = (0..5)
            .map(|i| SourceRecord::new(format!("R{}", i), Work::default()))
            .collect();
        let source = MockSource::new(seed.clone(), refs, vec![]);

        assert_eq!(source.references_of(&seed, 3).await.unwrap().len(), 3);
        tokio_test::assert_ok!(source.citers_of(&seed, 3).await);
        tokio_test::assert_err!(source.clone().failing_citers().citers_of(&seed, 3).await);
    }
}
