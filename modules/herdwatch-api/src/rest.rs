use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::NaiveDate;
use serde::Deserialize;

use herdwatch_common::{OutbreakRecord, ScenarioParams};
use herdwatch_engine::{filter_and_score, monthly_counts};

use crate::AppState;

// --- Query structs ---

/// Shared query shape for every scenario endpoint. `cutoff` defaults to
/// the dataset's max date; an absent `regions` means the dashboard's
/// default selection, while a present-but-empty one means none.
#[derive(Deserialize)]
pub struct ScenarioQuery {
    cutoff: Option<String>,
    regions: Option<String>,
    enhanced: Option<bool>,
}

// --- Helpers ---

pub fn parse_regions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

fn scenario_from_query(
    state: &AppState,
    params: &ScenarioQuery,
) -> Result<ScenarioParams, (StatusCode, &'static str)> {
    let cutoff = match params.cutoff.as_deref() {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                "invalid cutoff date (expected YYYY-MM-DD)",
            )
        })?,
        None => match state.dataset.date_range() {
            Some((_, max_date)) => max_date,
            None => return Err((StatusCode::SERVICE_UNAVAILABLE, "no outbreak data loaded")),
        },
    };

    let regions = match params.regions.as_deref() {
        Some(raw) => parse_regions(raw),
        None => state.dataset.default_regions(),
    };

    Ok(ScenarioParams {
        cutoff,
        regions,
        enhanced: params.enhanced.unwrap_or(true),
    })
}

pub fn records_to_geojson(records: &[OutbreakRecord]) -> serde_json::Value {
    let features: Vec<serde_json::Value> = records
        .iter()
        .map(|record| {
            serde_json::json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [record.longitude, record.latitude]
                },
                "properties": {
                    "occurred_on": record.occurred_on.to_string(),
                    "region": record.region,
                    "country": record.country,
                    "locality": record.locality,
                    "species": record.species,
                    "cases": record.cases,
                }
            })
        })
        .collect();

    serde_json::json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

// --- Handlers ---

pub async fn api_summary(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let dataset = &state.dataset;
    let (min_date, max_date) = match dataset.date_range() {
        Some(range) => range,
        None => return StatusCode::SERVICE_UNAVAILABLE.into_response(),
    };

    Json(serde_json::json!({
        "record_count": dataset.len(),
        "min_date": min_date.to_string(),
        "max_date": max_date.to_string(),
        "regions": dataset.regions(),
        "default_scenario": {
            "cutoff": max_date.to_string(),
            "regions": dataset.default_regions(),
            "enhanced": true,
        },
    }))
    .into_response()
}

pub async fn api_assess(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ScenarioQuery>,
) -> Response {
    let scenario = match scenario_from_query(&state, &params) {
        Ok(scenario) => scenario,
        Err(reject) => return reject.into_response(),
    };

    let (subset, assessment) = filter_and_score(&state.dataset, &scenario);

    Json(serde_json::json!({
        "scenario": scenario,
        "subset_size": subset.len(),
        "improvement": assessment.improvement(),
        "assessment": assessment,
    }))
    .into_response()
}

pub async fn api_records(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ScenarioQuery>,
) -> Response {
    let scenario = match scenario_from_query(&state, &params) {
        Ok(scenario) => scenario,
        Err(reject) => return reject.into_response(),
    };

    let (subset, _) = filter_and_score(&state.dataset, &scenario);
    Json(records_to_geojson(&subset)).into_response()
}

pub async fn api_monthly(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ScenarioQuery>,
) -> Response {
    let scenario = match scenario_from_query(&state, &params) {
        Ok(scenario) => scenario,
        Err(reject) => return reject.into_response(),
    };

    let (subset, _) = filter_and_score(&state.dataset, &scenario);
    let months: Vec<serde_json::Value> = monthly_counts(&subset)
        .iter()
        .map(|bucket| {
            serde_json::json!({
                "month": bucket.month.to_string(),
                "count": bucket.count,
            })
        })
        .collect();

    Json(serde_json::json!({ "months": months })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use herdwatch_common::MonthKey;

    #[test]
    fn parse_regions_trims_and_drops_empties() {
        assert_eq!(
            parse_regions(" Asia , Europe ,,Africa"),
            ["Asia", "Europe", "Africa"]
        );
        assert!(parse_regions("").is_empty());
        assert!(parse_regions(" , ").is_empty());
    }

    #[test]
    fn geojson_features_carry_lng_lat_order() {
        let occurred_on = NaiveDate::parse_from_str("2025-03-01", "%Y-%m-%d").unwrap();
        let record = OutbreakRecord {
            occurred_on,
            latitude: 37.5,
            longitude: 127.0,
            region: "Asia".to_string(),
            country: Some("South Korea".to_string()),
            locality: None,
            species: Some("Cattle".to_string()),
            cases: Some(3),
            month: MonthKey::from_date(occurred_on),
        };

        let geojson = records_to_geojson(&[record]);
        assert_eq!(geojson["type"], "FeatureCollection");
        let feature = &geojson["features"][0];
        assert_eq!(feature["geometry"]["coordinates"][0], 127.0);
        assert_eq!(feature["geometry"]["coordinates"][1], 37.5);
        assert_eq!(feature["properties"]["region"], "Asia");
        assert_eq!(feature["properties"]["occurred_on"], "2025-03-01");
    }

    #[test]
    fn empty_subset_is_an_empty_feature_collection() {
        let geojson = records_to_geojson(&[]);
        assert_eq!(geojson["features"].as_array().unwrap().len(), 0);
    }
}
