//! OpenAlex adapter
//!
//! Seed lookup uses `search=`; references are listed on the seed as work URLs and
//! batch-fetched through an `openalex_id:` filter; citing works come from `cites:`.

use super::{fetch_json, BibliographicSource};
use crate::errors::Result;
use crate::models::{join_authors, SeedWork, SourceRecord, Work};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;

const DEFAULT_BASE_URL: &str = "https://api.openalex.org";
const PROVIDER: &str = "OpenAlex";

/// Fields requested for related works
const CANDIDATE_FIELDS: &str =
    "id,title,authorships,publication_year,cited_by_count,abstract_inverted_index,doi";

/// The seed also needs its reference list
const SEED_FIELDS: &str =
    "id,title,authorships,publication_year,cited_by_count,abstract_inverted_index,doi,referenced_works";

pub struct OpenAlexSource {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    mailto: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WorksPage {
    #[serde(default)]
    results: Option<Vec<OpenAlexWork>>,
}

#[derive(Debug, Deserialize)]
struct OpenAlexWork {
    id: Option<String>,
    title: Option<String>,
    authorships: Option<Vec<Authorship>>,
    publication_year: Option<i32>,
    cited_by_count: Option<u64>,
    abstract_inverted_index: Option<BTreeMap<String, Vec<usize>>>,
    doi: Option<String>,
    referenced_works: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct Authorship {
    author: Option<Author>,
}

#[derive(Debug, Deserialize)]
struct Author {
    display_name: Option<String>,
}

impl OpenAlexSource {
    /// Create a new OpenAlex source
    pub fn new(
        client: reqwest::Client,
        base_url: Option<String>,
        api_key: Option<String>,
        mailto: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            api_key,
            mailto,
        }
    }

    fn works_request(&self, params: &[(&str, String)], select: &str) -> reqwest::RequestBuilder {
        let mut request = self
            .client
            .get(format!("{}/works", self.base_url))
            .query(params)
            .query(&[("select", select)]);

        if let Some(ref key) = self.api_key {
            request = request.query(&[("api_key", key)]);
        }
        if let Some(ref mailto) = self.mailto {
            request = request.query(&[("mailto", mailto)]);
        }
        request
    }

    async fn fetch_works(
        &self,
        params: &[(&str, String)],
        select: &str,
        operation: &'static str,
    ) -> Result<Vec<OpenAlexWork>> {
        let request = self.works_request(params, select);
        let page: WorksPage = fetch_json(request, PROVIDER, operation).await?;
        Ok(page.results.unwrap_or_default())
    }
}

#[async_trait]
impl BibliographicSource for OpenAlexSource {
    async fn search_by_query(&self, query: &str) -> Result<Option<SeedWork>> {
        let results = self
            .fetch_works(
                &[("search", query.to_string()), ("per-page", "1".to_string())],
                SEED_FIELDS,
                "search",
            )
            .await?;

        Ok(results.into_iter().next().and_then(to_seed))
    }

    async fn references_of(&self, seed: &SeedWork, limit: usize) -> Result<Vec<SourceRecord>> {
        let ids: Vec<&str> = seed
            .reference_ids
            .iter()
            .map(String::as_str)
            .take(limit)
            .collect();

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = self
            .fetch_works(
                &[
                    ("filter", format!("openalex_id:{}", ids.join("|"))),
                    ("per-page", ids.len().to_string()),
                ],
                CANDIDATE_FIELDS,
                "references",
            )
            .await?;

        Ok(results.into_iter().map(to_record).collect())
    }

    async fn citers_of(&self, seed: &SeedWork, limit: usize) -> Result<Vec<SourceRecord>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let results = self
            .fetch_works(
                &[
                    ("filter", format!("cites:{}", seed.id)),
                    ("per-page", limit.to_string()),
                ],
                CANDIDATE_FIELDS,
                "citers",
            )
            .await?;

        Ok(results.into_iter().map(to_record).collect())
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}

/// Rebuild plain text from OpenAlex's word -> positions map
pub fn abstract_from_inverted_index(index: &BTreeMap<String, Vec<usize>>) -> String {
    let mut positioned: Vec<(usize, &str)> = index
        .iter()
        .flat_map(|(word, positions)| positions.iter().map(move |&p| (p, word.as_str())))
        .collect();

    positioned.sort_by_key(|&(pos, _)| pos);

    positioned
        .into_iter()
        .map(|(_, word)| word)
        .collect::<Vec<_>>()
        .join(" ")
}

/// `https://openalex.org/W2741809807` -> `W2741809807`
fn short_id(id: &str) -> &str {
    id.rsplit('/').next().unwrap_or(id)
}

fn to_work(raw: &OpenAlexWork) -> Work {
    let authors = raw
        .authorships
        .as_deref()
        .unwrap_or_default()
        .iter()
        .filter_map(|a| a.author.as_ref()?.display_name.as_deref());

    Work {
        title: raw.title.clone().unwrap_or_default(),
        authors: join_authors(authors),
        year: raw.publication_year,
        citations: raw.cited_by_count.unwrap_or(0),
        abstract_text: raw
            .abstract_inverted_index
            .as_ref()
            .map(abstract_from_inverted_index)
            .unwrap_or_default(),
        doi: raw
            .doi
            .as_deref()
            .map(|d| d.trim_start_matches("https://doi.org/").to_string())
            .filter(|d| !d.is_empty()),
    }
}

fn to_record(raw: OpenAlexWork) -> SourceRecord {
    SourceRecord {
        id: raw
            .id
            .as_deref()
            .map(short_id)
            .filter(|id| !id.is_empty())
            .map(String::from),
        work: to_work(&raw),
    }
}

fn to_seed(raw: OpenAlexWork) -> Option<SeedWork> {
    let id = short_id(raw.id.as_deref()?).to_string();
    if id.is_empty() {
        return None;
    }

    let reference_ids = raw
        .referenced_works
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|r| short_id(r).to_string())
        .filter(|r| !r.is_empty())
        .collect();

    Some(SeedWork {
        id,
        work: to_work(&raw),
        reference_ids,
    })
}
