use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use seatlock_core::{ClaimStatus, SeatView};
use serde::Deserialize;
use std::collections::HashMap;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusRequest {
    seat_ids: Vec<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/seats", get(seat_map))
        .route("/v1/seats/status", post(statuses))
        .route("/v1/seats/{seat_id}/booked", post(mark_booked))
}

/// Seats missing from the response are available.
async fn statuses(
    State(state): State<AppState>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<HashMap<String, ClaimStatus>>, AppError> {
    Ok(Json(state.resolver.resolve_many(&req.seat_ids).await?))
}

async fn mark_booked(
    State(state): State<AppState>,
    Path(seat_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.holds.set_seat_booked(&seat_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn seat_map(State(state): State<AppState>) -> Result<Json<Vec<SeatView>>, AppError> {
    let inventory = state
        .inventory
        .as_ref()
        .ok_or_else(|| AppError::StoreUnavailable("inventory source not configured".to_string()))?;
    Ok(Json(state.resolver.seat_map(inventory.as_ref()).await?))
}
