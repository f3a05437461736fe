use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use seatlock_core::{CoreError, GeoEntry, GeoStatus, UnlockTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetUnlockRequest {
    unlocks_at: Value,
}

#[derive(Debug, Deserialize)]
struct StatusRequest {
    keys: Vec<String>,
}

#[derive(Debug, Serialize)]
struct BulkResponse {
    updated: usize,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/geo", get(list_all).put(set_many))
        .route("/v1/geo/status", post(status_for_many))
        .route("/v1/geo/{key}", get(status).put(set_one))
}

async fn status(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GeoStatus>, AppError> {
    Ok(Json(state.geo.is_unlocked(&key).await?))
}

async fn set_one(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<SetUnlockRequest>,
) -> Result<Json<GeoStatus>, AppError> {
    let time = UnlockTime::from(req.unlocks_at);
    let epoch_seconds = time.epoch_seconds().ok_or_else(|| CoreError::InvalidUnlockTime {
        partition: key.clone(),
        raw: time.raw(),
    })?;

    state.geo.set_unlock_time(&key, epoch_seconds).await?;
    Ok(Json(state.geo.is_unlocked(&key).await?))
}

async fn status_for_many(
    State(state): State<AppState>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<HashMap<String, GeoStatus>>, AppError> {
    Ok(Json(state.geo.status_for_many(&req.keys).await?))
}

async fn list_all(State(state): State<AppState>) -> Result<Json<BTreeMap<String, GeoEntry>>, AppError> {
    Ok(Json(state.geo.list_all().await?))
}

/// Body is an object of partition -> time, applied in document order.
async fn set_many(
    State(state): State<AppState>,
    Json(body): Json<Map<String, Value>>,
) -> Result<Json<BulkResponse>, AppError> {
    let entries = body
        .into_iter()
        .map(|(key, value)| (key, UnlockTime::from(value)))
        .collect();
    let updated = state.geo.set_many_unlock_times(entries).await?;
    Ok(Json(BulkResponse { updated }))
}
