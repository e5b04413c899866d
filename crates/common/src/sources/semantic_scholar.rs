//! Semantic Scholar Graph API adapter

use super::{fetch_json, BibliographicSource};
use crate::errors::Result;
use crate::models::{join_authors, SeedWork, SourceRecord, Work};
use async_trait::async_trait;
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://api.semanticscholar.org/graph/v1";
const PROVIDER: &str = "Semantic Scholar";
const FIELDS: &str = "paperId,title,authors,year,citationCount,abstract,externalIds";

pub struct SemanticScholarSource {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchPage {
    data: Option<Vec<S2Paper>>,
}

#[derive(Debug, Deserialize)]
struct ReferencePage {
    data: Option<Vec<ReferenceEdge>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReferenceEdge {
    cited_paper: Option<S2Paper>,
}

#[derive(Debug, Deserialize)]
struct CitationPage {
    data: Option<Vec<CitationEdge>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CitationEdge {
    citing_paper: Option<S2Paper>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct S2Paper {
    paper_id: Option<String>,
    title: Option<String>,
    authors: Option<Vec<S2Author>>,
    year: Option<i32>,
    citation_count: Option<u64>,
    #[serde(rename = "abstract")]
    abstract_text: Option<String>,
    external_ids: Option<ExternalIds>,
}

#[derive(Debug, Deserialize)]
struct S2Author {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExternalIds {
    #[serde(rename = "DOI")]
    doi: Option<String>,
}

impl SemanticScholarSource {
    /// Create a new Semantic Scholar source
    pub fn new(client: reqwest::Client, base_url: Option<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            api_key,
        }
    }

    fn request(&self, path: &str, params: &[(&str, String)]) -> reqwest::RequestBuilder {
        let mut request = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(params)
            .query(&[("fields", FIELDS)]);

        if let Some(ref key) = self.api_key {
            request = request.header("x-api-key", key);
        }
        request
    }
}

#[async_trait]
impl BibliographicSource for SemanticScholarSource {
    async fn search_by_query(&self, query: &str) -> Result<Option<SeedWork>> {
        let page: SearchPage = fetch_json(
            self.request(
                "/paper/search",
                &[("query", query.to_string()), ("limit", "1".to_string())],
            ),
            PROVIDER,
            "search",
        )
        .await?;

        Ok(page
            .data
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(to_seed))
    }

    async fn references_of(&self, seed: &SeedWork, limit: usize) -> Result<Vec<SourceRecord>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let page: ReferencePage = fetch_json(
            self.request(
                &format!("/paper/{}/references", seed.id),
                &[("limit", limit.to_string())],
            ),
            PROVIDER,
            "references",
        )
        .await?;

        Ok(page
            .data
            .unwrap_or_default()
            .into_iter()
            .filter_map(|edge| edge.cited_paper)
            .map(to_record)
            .collect())
    }

    async fn citers_of(&self, seed: &SeedWork, limit: usize) -> Result<Vec<SourceRecord>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let page: CitationPage = fetch_json(
            self.request(
                &format!("/paper/{}/citations", seed.id),
                &[("limit", limit.to_string())],
            ),
            PROVIDER,
            "citers",
        )
        .await?;

        Ok(page
            .data
            .unwrap_or_default()
            .into_iter()
            .filter_map(|edge| edge.citing_paper)
            .map(to_record)
            .collect())
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}

fn to_work(paper: S2Paper) -> (Option<String>, Work) {
    let authors = paper.authors.unwrap_or_default();
    let work = Work {
        title: paper.title.unwrap_or_default(),
        authors: join_authors(authors.iter().filter_map(|a| a.name.as_deref())),
        year: paper.year,
        citations: paper.citation_count.unwrap_or(0),
        abstract_text: paper.abstract_text.unwrap_or_default(),
        doi: paper.external_ids.and_then(|ids| ids.doi),
    };
    (paper.paper_id.filter(|id| !id.is_empty()), work)
}

fn to_record(paper: S2Paper) -> SourceRecord {
    let (id, work) = to_work(paper);
    SourceRecord { id, work }
}

fn to_seed(paper: S2Paper) -> Option<SeedWork> {
    let (id, work) = to_work(paper);
    Some(SeedWork {
        id: id?,
        work,
        reference_ids: Vec::new(),
    })
}
