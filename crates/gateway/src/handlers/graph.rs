//! Similarity graph handler

use axum::extract::{rejection::JsonRejection, State};
use axum::Json;
use serde::Deserialize;

use crate::AppState;
use paperscope_common::errors::{AppError, Result};
use paperscope_common::models::Work;
use paperscope_search::similarity::{build_graph, SimilarityGraph};

/// Seed and ranked candidates as returned by `/api/search`
#[derive(Debug, Deserialize)]
pub struct GraphRequest {
    pub seed: Option<Work>,
    #[serde(default)]
    pub candidates: Vec<Work>,
}

/// `POST /api/graph` - nodes and edges for the force-directed view
pub async fn graph(
    State(state): State<AppState>,
    payload: std::result::Result<Json<GraphRequest>, JsonRejection>,
) -> Result<Json<SimilarityGraph>> {
    let Json(request) = payload.map_err(|e| AppError::InvalidFormat {
        message: e.body_text(),
    })?;

    let seed = request.seed.ok_or_else(|| AppError::MissingField {
        field: "seed".into(),
    })?;

    let max = state.explorer.pipeline().config().max_candidates;
    if request.candidates.len() > max {
        return Err(AppError::Validation {
            message: format!("at most {} candidates can be graphed", max),
            field: Some("candidates".into()),
        });
    }

    let graph = build_graph(&seed, &request.candidates, &state.config.graph);
    Ok(Json(graph))
}
