use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::{ApiError, QueryParams};
use crate::calculate::{
    count_country_finalists, count_country_participations, count_team_overlaps,
    count_university_participations, participation_ranking, rank_team_repeats,
};
use crate::models::{FinalistRow, ParticipationRow, RepeatMetric, RepeatRow};

#[derive(Debug, Serialize)]
pub struct ParticipationResponse {
    pub years: Vec<u16>,
    pub min: u32,
    pub rows: Vec<ParticipationRow>,
}

pub async fn country_participations(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<ParticipationResponse>, ApiError> {
    let scope = state.scope(&params);
    let min = state.min_participations(&params, &scope);

    let counts = count_country_participations(&scope.editions, &scope.regions);
    let rows = participation_ranking(counts.iter().map(|(c, n)| (c.as_str(), *n)), min);

    Ok(Json(ParticipationResponse {
        years: scope.years(),
        min,
        rows,
    }))
}

pub async fn university_participations(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<ParticipationResponse>, ApiError> {
    let scope = state.scope(&params);
    let min = state.min_participations(&params, &scope);

    let counts = count_university_participations(&scope.editions, &scope.regions);
    let rows = participation_ranking(counts.iter().map(|(u, p)| (u.as_str(), p.count)), min);

    Ok(Json(ParticipationResponse {
        years: scope.years(),
        min,
        rows,
    }))
}

#[derive(Debug, Serialize)]
pub struct FinalistsResponse {
    pub years: Vec<u16>,
    pub min: u32,
    pub rows: Vec<FinalistRow>,
}

pub async fn finalists(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<FinalistsResponse>, ApiError> {
    let scope = state.scope(&params);
    let min = params.min.unwrap_or(state.defaults.min_finalists);

    Ok(Json(FinalistsResponse {
        years: scope.years(),
        min,
        rows: count_country_finalists(&scope.editions, &scope.regions, min),
    }))
}

#[derive(Debug, Serialize)]
pub struct RepeatsResponse {
    pub years: Vec<u16>,
    pub metric: RepeatMetric,
    pub rows: Vec<RepeatRow>,
}

pub async fn team_repeats(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<RepeatsResponse>, ApiError> {
    let metric = params.repeat_metric()?;
    let scope = state.scope(&params);
    let limit = state.display_limit(&params);

    let overlaps = count_team_overlaps(&scope.editions, &scope.regions);

    Ok(Json(RepeatsResponse {
        years: scope.years(),
        metric,
        rows: rank_team_repeats(&overlaps, metric, Some(limit)),
    }))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::test_support::{get_json, sample_state};
    use axum::http::StatusCode;
    use serde_json::Value;

    fn names(rows: &Value, field: &str) -> Vec<String> {
        rows.as_array()
            .unwrap()
            .iter()
            .map(|r| r[field].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_country_participations() {
        let app = build_router(sample_state());
        let (status, json) = get_json(app, "/api/participations/countries").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["years"], serde_json::json!([2014, 2015, 2016]));
        assert_eq!(names(&json["rows"], "name"), vec!["CU", "RU", "US"]);
        assert_eq!(json["rows"][2]["count"], 2);
    }

    #[tokio::test]
    async fn test_university_participations_threshold() {
        let app = build_router(sample_state());
        let (_, json) = get_json(app, "/api/participations/universities?min=2").await;

        assert_eq!(json["min"], 2);
        assert_eq!(names(&json["rows"], "name"), vec!["SPb", "UH", "MIT"]);
    }

    #[tokio::test]
    async fn test_min_clamped_to_editions_in_range() {
        let app = build_router(sample_state());
        let (_, json) = get_json(
            app,
            "/api/participations/universities?first=2015&last=2016&min=10",
        )
        .await;

        assert_eq!(json["min"], 2);
        assert_eq!(names(&json["rows"], "name"), vec!["SPb", "UH"]);
    }

    #[tokio::test]
    async fn test_empty_region_selection_shows_nothing() {
        let app = build_router(sample_state());
        let (status, json) = get_json(app, "/api/participations/countries?regions=").await;

        assert_eq!(status, StatusCode::OK);
        assert!(json["rows"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_finalists() {
        let app = build_router(sample_state());
        let (_, json) = get_json(app, "/api/finalists").await;

        assert_eq!(names(&json["rows"], "country"), vec!["CU", "RU", "US"]);
        assert_eq!(json["rows"][0]["universities"], 2);
    }

    #[tokio::test]
    async fn test_team_repeats() {
        let app = build_router(sample_state());
        let (status, json) = get_json(app, "/api/teams/repeats?metric=teams").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["metric"], "repeated_teams");
        assert_eq!(names(&json["rows"], "university"), vec!["UH", "MIT", "SPb"]);
        assert_eq!(json["rows"][0]["value"], 2.0);
    }

    #[tokio::test]
    async fn test_team_repeats_unknown_metric() {
        let app = build_router(sample_state());
        let (status, json) = get_json(app, "/api/teams/repeats?metric=coaches").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }
}
