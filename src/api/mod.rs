//! REST API endpoints.
//!
//! Axum-based read-only HTTP API that hands computed tables and series to a
//! rendering front end. Every handler slices the in-memory dataset, runs one
//! aggregator and serializes the result.

pub mod routes;
pub mod state;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::calculate::EntityKind;
use crate::models::RepeatMetric;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Query parameters shared by every aggregate endpoint.
///
/// Lists (`regions`, `entities`) are comma-separated. An absent `regions`
/// parameter means every region; a present but empty one selects nothing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryParams {
    pub first: Option<u16>,
    pub last: Option<u16>,
    pub regions: Option<String>,
    pub min: Option<u32>,
    pub kind: Option<String>,
    pub entities: Option<String>,
    pub limit: Option<usize>,
    pub metric: Option<String>,
    pub format: Option<String>,
}

/// Split a comma-separated parameter, dropping blank items.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl QueryParams {
    pub fn region_selection(&self) -> Option<Vec<String>> {
        self.regions.as_deref().map(split_list)
    }

    pub fn entity_list(&self) -> Vec<String> {
        self.entities.as_deref().map(split_list).unwrap_or_default()
    }

    pub fn entity_kind(&self) -> Result<EntityKind, ApiError> {
        match self.kind.as_deref() {
            None => Ok(EntityKind::default()),
            Some(raw) => raw.parse().map_err(ApiError::BadRequest),
        }
    }

    pub fn repeat_metric(&self) -> Result<RepeatMetric, ApiError> {
        match self.metric.as_deref() {
            None => Ok(RepeatMetric::default()),
            Some(raw) => raw.parse().map_err(ApiError::BadRequest),
        }
    }
}

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    let cors = match state.cors_origin.as_deref() {
        None | Some("*") => CorsLayer::new().allow_origin(Any),
        Some(origin) => match origin.parse::<axum::http::HeaderValue>() {
            Ok(value) => CorsLayer::new().allow_origin(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                CorsLayer::new()
            }
        },
    };

    Router::new()
        .route("/api/dataset", get(routes::dataset::dataset_info))
        .route("/api/universities", get(routes::dataset::universities))
        .route(
            "/api/participations/countries",
            get(routes::participation::country_participations),
        )
        .route(
            "/api/participations/universities",
            get(routes::participation::university_participations),
        )
        .route("/api/finalists", get(routes::participation::finalists))
        .route("/api/teams/repeats", get(routes::participation::team_repeats))
        .route("/api/rankings/places", get(routes::rankings::places))
        .route("/api/rankings/medals", get(routes::rankings::medals))
        .route("/api/distribution/solved", get(routes::distribution::solved))
        .route(
            "/api/distribution/quartiles",
            get(routes::distribution::quartiles),
        )
        .route(
            "/api/distribution/quartile-solved",
            get(routes::distribution::quartile_solved),
        )
        .route("/api/distribution/series", get(routes::distribution::series))
        .route("/api/accumulated", get(routes::accumulated::accumulated))
        .route("/api/overlap/:university", get(routes::overlap::overlap_graph))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
