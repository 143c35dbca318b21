use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::api::state::AppState;
use crate::api::{ApiError, QueryParams};
use crate::calculate::{build_overlap_graph, university_rosters};
use crate::models::{GRAPH_FIRST_YEAR, GRAPH_LAST_YEAR};

/// Roster overlap graph for one university, as JSON or Graphviz DOT (`format=dot`).
pub async fn overlap_graph(
    State(state): State<AppState>,
    Path(university): Path<String>,
    Query(params): Query<QueryParams>,
) -> Result<Response, ApiError> {
    let known = state
        .dataset
        .editions()
        .values()
        .any(|e| e.teams.iter().any(|t| t.university == university));
    if !known {
        return Err(ApiError::NotFound(format!(
            "No teams for university: {}",
            university
        )));
    }

    let editions = state
        .dataset
        .filter_by_period(GRAPH_FIRST_YEAR, GRAPH_LAST_YEAR);
    let rosters = university_rosters(&editions, &university);
    let graph = build_overlap_graph(&university, &rosters);

    match params.format.as_deref() {
        None | Some("json") => Ok(Json(graph).into_response()),
        Some("dot") => {
            let dot = graph
                .to_dot()
                .map_err(|e| ApiError::Internal(e.to_string()))?;
            Ok(([(header::CONTENT_TYPE, "text/vnd.graphviz; charset=utf-8")], dot).into_response())
        }
        Some(other) => Err(ApiError::BadRequest(format!(
            "unknown format '{}' (expected: json, dot)",
            other
        ))),
    }
}
