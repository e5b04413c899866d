//! Work records
//!
//! Provider adapters translate their JSON into these shapes; nothing past the
//! adapter boundary sees provider field names.

use serde::{Deserialize, Serialize};

/// A paper as shown to the user (seed or candidate)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Work {
    #[serde(default)]
    pub title: String,

    /// Display names joined with ", " in source order
    #[serde(default)]
    pub authors: String,

    #[serde(default)]
    pub year: Option<i32>,

    #[serde(default)]
    pub citations: u64,

    /// Plain-text abstract, empty when the source has none
    #[serde(default, rename = "abstract")]
    pub abstract_text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
}

impl Work {
    /// Text used for lexical overlap: title and abstract separated by a space
    pub fn similarity_text(&self) -> String {
        format!("{} {}", self.title, self.abstract_text)
    }

    pub fn has_abstract(&self) -> bool {
        !self.abstract_text.trim().is_empty()
    }
}

/// A related-work record as returned by a bibliographic source
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRecord {
    /// Opaque provider id; records without one cannot be deduplicated
    pub id: Option<String>,
    pub work: Work,
}

impl SourceRecord {
    pub fn new(id: impl Into<String>, work: Work) -> Self {
        Self {
            id: Some(id.into()),
            work,
        }
    }
}

/// The best match for a search query
#[derive(Debug, Clone, PartialEq)]
pub struct SeedWork {
    pub id: String,
    pub work: Work,

    /// Referenced work ids when the provider embeds them in the work itself
    pub reference_ids: Vec<String>,
}

/// Join author display names the way the list view shows them
pub fn join_authors<I, S>(names: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|n| n.as_ref().trim().to_string())
        .filter(|n| !n.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_serializes_abstract_field() {
        let work = Work {
            title: "Attention Is All You Need".into(),
            abstract_text: "The dominant sequence transduction models".into(),
            citations: 45231,
            year: Some(2017),
            ..Default::default()
        };

        let json = serde_json::to_value(&work).unwrap();
        assert_eq!(json["abstract"], "The dominant sequence transduction models");
        assert_eq!(json["citations"], 45231);
        assert!(json.get("doi").is_none());
    }

    #[test]
    fn test_work_deserializes_with_missing_fields() {
        let work: Work = serde_json::from_str(r#"{"title": "Only a title"}"#).unwrap();
        assert_eq!(work.title, "Only a title");
        assert_eq!(work.citations, 0);
        assert_eq!(work.year, None);
        assert!(!work.has_abstract());
    }

    #[test]
    fn test_join_authors() {
        let joined = join_authors(["Ashish Vaswani", " Noam Shazeer ", ""]);
        assert_eq!(joined, "Ashish Vaswani, Noam Shazeer");
    }

    #[test]
    fn test_similarity_text() {
        let work = Work {
            title: "BERT".into(),
            abstract_text: "deep bidirectional".into(),
            ..Default::default()
        };
        assert_eq!(work.similarity_text(), "BERT deep bidirectional");
    }
}
