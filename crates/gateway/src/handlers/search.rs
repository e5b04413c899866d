//! Search handler

use axum::extract::{rejection::QueryRejection, Query, State};
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use super::validation_error;
use crate::AppState;
use paperscope_common::errors::{AppError, Result};
use paperscope_search::Exploration;

/// Raw query string; `q` is optional here so a missing value maps to our own 400
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Validate)]
struct SearchQuery {
    #[validate(length(min = 1, max = 500))]
    q: String,
}

impl SearchParams {
    fn into_query(self) -> Result<SearchQuery> {
        let q = self
            .q
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .ok_or_else(|| AppError::MissingField { field: "q".into() })?;

        let query = SearchQuery { q };
        query.validate().map_err(validation_error)?;
        Ok(query)
    }
}

/// `GET /api/search?q=` - seed plus ranked candidates, or `{seed: null, candidates: []}`
pub async fn search(
    State(state): State<AppState>,
    params: std::result::Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Exploration>> {
    let Query(params) = params.map_err(|e| AppError::InvalidFormat {
        message: e.body_text(),
    })?;
    let query = params.into_query()?;

    tracing::info!(query = %query.q, "Search request");

    let exploration = state.explorer.explore(&query.q).await?;
    Ok(Json(exploration))
}
