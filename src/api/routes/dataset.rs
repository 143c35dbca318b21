use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::{ApiError, QueryParams};
use crate::calculate::{observed_universities, region_options};

#[derive(Debug, Serialize)]
pub struct DatasetInfoResponse {
    /// Selectable year range
    pub first_year: u16,
    pub last_year: u16,
    pub editions: usize,
    pub teams: usize,
    /// Region selector options, "all" sentinel first
    pub regions: Vec<String>,
}

pub async fn dataset_info(State(state): State<AppState>) -> Json<DatasetInfoResponse> {
    let (first_year, last_year) = state.year_bounds();
    Json(DatasetInfoResponse {
        first_year,
        last_year,
        editions: state.dataset.editions().len(),
        teams: state.dataset.team_count(),
        regions: region_options(&state.dataset),
    })
}

#[derive(Debug, Serialize)]
pub struct UniversitiesResponse {
    pub universities: Vec<String>,
}

pub async fn universities(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<UniversitiesResponse>, ApiError> {
    let scope = state.scope(&params);
    Ok(Json(UniversitiesResponse {
        universities: observed_universities(&scope.editions, &scope.regions),
    }))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::test_support::{get_json, sample_state};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_dataset_info() {
        let app = build_router(sample_state());
        let (status, json) = get_json(app, "/api/dataset").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["first_year"], 2014);
        assert_eq!(json["last_year"], 2016);
        assert_eq!(json["editions"], 3);
        assert_eq!(json["teams"], 9);
        assert_eq!(json["regions"][0], "Todas");
        assert_eq!(json["regions"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_universities_by_region() {
        let app = build_router(sample_state());
        let (status, json) =
            get_json(app, "/api/universities?regions=Latinoam%C3%A9rica").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["universities"], serde_json::json!(["UH", "UO"]));
    }

    #[tokio::test]
    async fn test_universities_period() {
        let app = build_router(sample_state());
        let (_, json) = get_json(app, "/api/universities?first=2014&last=2014").await;
        assert_eq!(json["universities"], serde_json::json!(["MIT", "SPb", "UH"]));
    }
}
