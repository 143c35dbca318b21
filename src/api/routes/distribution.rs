use std::collections::BTreeMap;

use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::{ApiError, QueryParams};
use crate::calculate::{
    per_edition_solve_stats, per_entity_place_and_solved_series, quartile_boundaries,
    quartile_solved_values, EntityKind,
};
use crate::models::{EntitySeries, QuartileBoundaries, QuartileSolved, SolveStats};

#[derive(Debug, Serialize)]
pub struct SolvedResponse {
    pub years: Vec<u16>,
    pub rows: Vec<SolveStats>,
}

pub async fn solved(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<SolvedResponse>, ApiError> {
    let scope = state.scope(&params);
    Ok(Json(SolvedResponse {
        years: scope.years(),
        rows: per_edition_solve_stats(&scope.editions, &scope.regions),
    }))
}

#[derive(Debug, Serialize)]
pub struct QuartilesResponse {
    pub years: Vec<u16>,
    pub rows: Vec<QuartileBoundaries>,
}

pub async fn quartiles(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<QuartilesResponse>, ApiError> {
    let scope = state.scope(&params);
    Ok(Json(QuartilesResponse {
        years: scope.years(),
        rows: quartile_boundaries(&scope.editions, &scope.regions),
    }))
}

#[derive(Debug, Serialize)]
pub struct QuartileSolvedResponse {
    pub years: Vec<u16>,
    pub rows: Vec<QuartileSolved>,
}

pub async fn quartile_solved(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<QuartileSolvedResponse>, ApiError> {
    let scope = state.scope(&params);
    Ok(Json(QuartileSolvedResponse {
        years: scope.years(),
        rows: quartile_solved_values(&scope.editions, &scope.regions),
    }))
}

#[derive(Debug, Serialize)]
pub struct SeriesResponse {
    /// One slot per year, in the same order as every series
    pub years: Vec<u16>,
    pub kind: EntityKind,
    pub series: BTreeMap<String, EntitySeries>,
}

pub async fn series(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<SeriesResponse>, ApiError> {
    let kind = params.entity_kind()?;
    let entities = params.entity_list();
    let scope = state.scope(&params);

    Ok(Json(SeriesResponse {
        years: scope.years(),
        kind,
        series: per_entity_place_and_solved_series(
            &scope.editions,
            &entities,
            kind,
            &scope.regions,
        ),
    }))
}
