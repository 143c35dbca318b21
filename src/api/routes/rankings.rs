use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::{ApiError, QueryParams};
use crate::calculate::{build_place_table, medal_table, EntityKind};
use crate::models::{MedalRow, PlaceRow, PlaceTable};

fn place_table_for(state: &AppState, params: &QueryParams) -> Result<(PlaceTable, Meta), ApiError> {
    let kind = params.entity_kind()?;
    let scope = state.scope(params);
    let min = state.min_participations(params, &scope);

    let mut table = build_place_table(&scope.editions, kind, &scope.regions, min);
    let entities = params.entity_list();
    if !entities.is_empty() {
        table = table.select(&entities);
    }

    let meta = Meta {
        years: scope.years(),
        kind,
        min,
    };
    Ok((table, meta))
}

struct Meta {
    years: Vec<u16>,
    kind: EntityKind,
    min: u32,
}

#[derive(Debug, Serialize)]
pub struct PlacesResponse {
    pub years: Vec<u16>,
    pub kind: EntityKind,
    pub min: u32,
    pub rows: Vec<PlaceRow>,
}

pub async fn places(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<PlacesResponse>, ApiError> {
    let (table, meta) = place_table_for(&state, &params)?;
    let mut rows = table.rows;
    if let Some(limit) = params.limit {
        rows.truncate(limit);
    }

    Ok(Json(PlacesResponse {
        years: meta.years,
        kind: meta.kind,
        min: meta.min,
        rows,
    }))
}

#[derive(Debug, Serialize)]
pub struct MedalsResponse {
    pub years: Vec<u16>,
    pub kind: EntityKind,
    pub min: u32,
    pub rows: Vec<MedalRow>,
}

pub async fn medals(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<MedalsResponse>, ApiError> {
    let (table, meta) = place_table_for(&state, &params)?;
    let mut rows = medal_table(&table);
    if let Some(limit) = params.limit {
        rows.truncate(limit);
    }

    Ok(Json(MedalsResponse {
        years: meta.years,
        kind: meta.kind,
        min: meta.min,
        rows,
    }))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::test_support::{get_json, sample_state};
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    fn entities(rows: &Value) -> Vec<String> {
        rows.as_array()
            .unwrap()
            .iter()
            .map(|r| r["entity"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_places_by_university() {
        let app = build_router(sample_state());
        let (status, json) = get_json(app, "/api/rankings/places").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["kind"], "university");
        assert_eq!(entities(&json["rows"]), vec!["SPb", "MIT", "UH", "UO"]);
        assert_eq!(
            json["rows"][0]["places"],
            json!([2, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0])
        );
        // Unranked 2015 finish still counts as a participation
        assert_eq!(json["rows"][2]["participations"], 3);
        assert_eq!(json["rows"][2]["total"], 2);
    }

    #[tokio::test]
    async fn test_places_region_restricted_renumbers() {
        let app = build_router(sample_state());
        let (_, json) = get_json(
            app,
            "/api/rankings/places?regions=Latinoam%C3%A9rica",
        )
        .await;

        assert_eq!(entities(&json["rows"]), vec!["UH", "UO"]);
        assert_eq!(
            json["rows"][0]["places"],
            json!([2, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0])
        );
        assert_eq!(
            json["rows"][1]["places"],
            json!([1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0])
        );
    }

    #[tokio::test]
    async fn test_places_by_country_with_selection() {
        let app = build_router(sample_state());
        let (_, json) = get_json(app, "/api/rankings/places?kind=country&entities=US,ZZ").await;

        assert_eq!(json["kind"], "country");
        assert_eq!(entities(&json["rows"]), vec!["US"]);
    }

    #[tokio::test]
    async fn test_medals() {
        let app = build_router(sample_state());
        let (status, json) = get_json(app, "/api/rankings/medals").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(entities(&json["rows"]), vec!["SPb", "UH", "MIT", "UO"]);
        assert_eq!(json["rows"][0]["gold"], 3);
        assert_eq!(json["rows"][0]["silver"], 0);
    }

    #[tokio::test]
    async fn test_medals_inverted_range_is_empty() {
        let app = build_router(sample_state());
        let (status, json) =
            get_json(app, "/api/rankings/medals?first=2016&last=2014").await;

        assert_eq!(status, StatusCode::OK);
        assert!(json["rows"].as_array().unwrap().is_empty());
        assert_eq!(json["years"], json!([]));
    }
}
