use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::{ApiError, QueryParams};
use crate::calculate::accumulate_solved;
use crate::models::AccumulatedSolved;

#[derive(Debug, Serialize)]
pub struct AccumulatedResponse {
    pub years: Vec<u16>,
    pub by_solved: Vec<AccumulatedSolved>,
    pub by_percent: Vec<AccumulatedSolved>,
}

pub async fn accumulated(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<AccumulatedResponse>, ApiError> {
    let scope = state.scope(&params);
    let limit = state.display_limit(&params);
    let ranking = accumulate_solved(&scope.editions, &scope.regions);

    Ok(Json(AccumulatedResponse {
        years: scope.years(),
        by_solved: ranking.by_solved(Some(limit)),
        by_percent: ranking.by_percent(Some(limit)),
    }))
}
