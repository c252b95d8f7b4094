use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path as AxumPath, State};
use axum::http::HeaderMap;
use axum::Json;
use catalog::{
    cheapest_offer, parse_price, AlertId, CityDirectory, FlightOffer, FlightSearch, PriceAlert,
    SearchRequest, TravelStore, Trip, DEFAULT_ORIGIN,
};
use chrono::{Days, NaiveDate, Utc};
use foundation::math::GeoPoint;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::users::{anonymous_user_id, user_id};
use crate::AppState;

fn caller(headers: &HeaderMap) -> String {
    user_id(headers).unwrap_or_else(anonymous_user_id)
}

pub async fn get_data(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user = caller(&headers);
    let (trips, alerts) = state
        .users
        .with_store(&user, |store| (store.snapshot().trips.clone(), store.alerts()));
    let alerts = alerts?;
    info!(user = %user, trips = trips.len(), alerts = alerts.len(), "data loaded");
    Ok(Json(json!({
        "trips": trips,
        "alerts": alerts,
        "isAuthenticated": false,
    })))
}

#[derive(Debug, Deserialize)]
pub struct SaveTripBody {
    pub id: String,
    pub data: Trip,
}

pub async fn save_trip(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<SaveTripBody>,
) -> Result<Json<Value>, ApiError> {
    let user = caller(&headers);
    let mut trip = body.data;
    trip.id = body.id.trim().to_string();
    let id = trip.id.clone();
    state.users.with_store(&user, |store| store.upsert_trip(trip))?;
    info!(user = %user, trip = %id, "trip saved");
    Ok(Json(json!({ "status": "success", "isAuthenticated": false })))
}

pub async fn delete_trip(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(trip_id): AxumPath<String>,
) -> Result<Json<Value>, ApiError> {
    let user = caller(&headers);
    let removed = state
        .users
        .with_store(&user, |store| store.delete_trip(&trip_id))?;
    info!(user = %user, trip = %trip_id, removed, "trip deleted");
    Ok(Json(json!({ "status": "success", "removed": removed })))
}

/// Alert ids arrive as numbers from the web client and as strings from
/// older payloads.
#[derive(Debug, Deserialize)]
pub struct SaveAlertBody {
    pub id: Value,
    pub data: Value,
}

fn alert_id(raw: &Value) -> Result<AlertId, ApiError> {
    let parsed = match raw {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| ApiError::InvalidPayload(format!("alert id {raw} is not a number")))
}

pub async fn save_alert(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<SaveAlertBody>,
) -> Result<Json<Value>, ApiError> {
    let user = caller(&headers);
    let id = alert_id(&body.id)?;
    let mut data = body.data;
    let Some(fields) = data.as_object_mut() else {
        return Err(ApiError::InvalidPayload("alert data must be an object".to_string()));
    };
    fields.insert("id".to_string(), json!(id));
    let alert: PriceAlert =
        serde_json::from_value(data).map_err(|e| ApiError::InvalidPayload(e.to_string()))?;

    state.users.with_store(&user, |store| store.upsert_alert(alert))?;
    info!(user = %user, alert = id, "alert saved");
    Ok(Json(json!({ "status": "success" })))
}

pub async fn delete_alert(
    State(state): State<AppState>,
    headers: HeaderMap,
    AxumPath(alert_id): AxumPath<AlertId>,
) -> Result<Json<Value>, ApiError> {
    let user = caller(&headers);
    let removed = state
        .users
        .with_store(&user, |store| store.delete_alert(alert_id))?;
    info!(user = %user, alert = alert_id, removed, "alert deleted");
    Ok(Json(json!({ "status": "success", "removed": removed })))
}

/// Alert as the client holds it. Everything is optional; unusable entries
/// are skipped.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlertProbe {
    pub id: Value,
    pub dest: Option<String>,
    pub target_price: Option<Value>,
    pub origin: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CheckAlertsBody {
    pub alerts: Vec<AlertProbe>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertCheck {
    pub id: Value,
    pub dest: String,
    pub current_price: f64,
    pub target_price: f64,
    pub triggered: bool,
}

fn price_from_value(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_price(s),
        _ => None,
    }
}

fn non_empty(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Quote one client-side alert. `None` when it is incomplete or unpriced.
pub fn check_probe(
    provider: &dyn FlightSearch,
    probe: &AlertProbe,
    today: NaiveDate,
) -> Option<AlertCheck> {
    let dest = non_empty(&probe.dest)?;
    let target = probe
        .target_price
        .as_ref()
        .and_then(price_from_value)
        .filter(|p| *p > 0.0)?;
    let origin = non_empty(&probe.origin).unwrap_or(DEFAULT_ORIGIN);
    let date = match non_empty(&probe.date) {
        Some(date) => date.to_string(),
        None => today
            .checked_add_days(Days::new(1))
            .unwrap_or(today)
            .format("%Y-%m-%d")
            .to_string(),
    };

    let request = SearchRequest::new(origin, dest, &date).normalized().ok()?;
    let offers = match provider.search(&request) {
        Ok(offers) => offers,
        Err(err) => {
            warn!(origin = %request.origin, dest = %request.destination, "alert check failed: {err}");
            return None;
        }
    };
    let Some((current, _)) = cheapest_offer(&offers) else {
        debug!(origin = %request.origin, dest = %request.destination, "no flights found");
        return None;
    };

    Some(AlertCheck {
        id: probe.id.clone(),
        dest: dest.to_string(),
        current_price: current,
        target_price: target,
        triggered: current <= target,
    })
}

pub async fn check_alerts(
    State(state): State<AppState>,
    Json(body): Json<CheckAlertsBody>,
) -> Result<Json<Value>, ApiError> {
    let today = Utc::now().date_naive();
    let requested = body.alerts.len();
    let provider = Arc::clone(&state.provider);
    let results: Vec<AlertCheck> = tokio::task::spawn_blocking(move || {
        body.alerts
            .iter()
            .filter_map(|probe| check_probe(provider.as_ref(), probe, today))
            .collect::<Vec<_>>()
    })
    .await?;
    info!(requested, priced = results.len(), "alerts checked");
    Ok(Json(json!({ "success": true, "results": results })))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub origin: String,
    pub destination: String,
    pub flights: Vec<FlightOffer>,
    pub coords: BTreeMap<String, GeoPoint>,
}

/// Codes stay as given; longer input is looked up by city name.
fn resolve_code(cities: &CityDirectory, query: &str) -> String {
    cities.resolve(query).unwrap_or_else(|| query.to_string())
}

pub async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let request = request.normalized()?;
    let request = SearchRequest {
        origin: resolve_code(&state.cities, &request.origin),
        destination: resolve_code(&state.cities, &request.destination),
        ..request
    };

    let provider = Arc::clone(&state.provider);
    let query = request.clone();
    let flights = tokio::task::spawn_blocking(move || provider.search(&query)).await??;
    let coords: BTreeMap<String, GeoPoint> = [&request.origin, &request.destination]
        .into_iter()
        .filter_map(|code| state.cities.get(code).map(|point| (code.clone(), point)))
        .collect();

    info!(
        origin = %request.origin,
        destination = %request.destination,
        flights = flights.len(),
        known = coords.len(),
        "search served"
    );
    Ok(Json(SearchResponse {
        success: true,
        origin: request.origin,
        destination: request.destination,
        flights,
        coords,
    }))
}
