use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use seatlock_core::{BookingHold, Hold, SeatRequest};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateHoldRequest {
    seat_id: String,
    user_id: String,
    booking_id: String,
    #[serde(default)]
    section_id: String,
}

#[derive(Debug, Serialize)]
struct CreateHoldResponse {
    held: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateBatchRequest {
    user_id: String,
    booking_id: Option<String>,
    seats: Vec<SeatRequest>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateBatchResponse {
    booking_id: String,
    seat_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReleaseQuery {
    user_id: String,
}

#[derive(Debug, Serialize)]
struct ReleaseResponse {
    released: bool,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/holds", post(create_hold))
        .route("/v1/holds/batch", post(create_batch))
        .route("/v1/holds/{seat_id}", get(get_hold).delete(release_hold))
        .route("/v1/bookings/{booking_id}", get(get_booking))
}

async fn create_hold(
    State(state): State<AppState>,
    Json(req): Json<CreateHoldRequest>,
) -> Result<(StatusCode, Json<CreateHoldResponse>), AppError> {
    let held = state
        .holds
        .create_hold(&req.seat_id, &req.user_id, &req.booking_id, &req.section_id)
        .await?;

    if !held {
        return Err(AppError::Conflict(format!("Seat {} is already held", req.seat_id)));
    }
    Ok((StatusCode::CREATED, Json(CreateHoldResponse { held })))
}

async fn create_batch(
    State(state): State<AppState>,
    Json(req): Json<CreateBatchRequest>,
) -> Result<(StatusCode, Json<CreateBatchResponse>), AppError> {
    let booking_id = req
        .booking_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let held = state
        .holds
        .create_multiple_holds(&req.seats, &req.user_id, &booking_id)
        .await?;

    if !held {
        return Err(AppError::Conflict(
            "One or more seats are already held".to_string(),
        ));
    }

    let seat_ids = req.seats.into_iter().map(|s| s.seat_id.trim().to_string()).collect();
    Ok((StatusCode::CREATED, Json(CreateBatchResponse { booking_id, seat_ids })))
}

async fn get_hold(
    State(state): State<AppState>,
    Path(seat_id): Path<String>,
) -> Result<Json<Hold>, AppError> {
    state
        .holds
        .get_hold(&seat_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No hold on seat {}", seat_id)))
}

async fn release_hold(
    State(state): State<AppState>,
    Path(seat_id): Path<String>,
    Query(query): Query<ReleaseQuery>,
) -> Result<Json<ReleaseResponse>, AppError> {
    if !state.holds.release_hold(&seat_id, &query.user_id).await? {
        return Err(AppError::Conflict(format!(
            "Seat {} is not held by this user",
            seat_id
        )));
    }
    Ok(Json(ReleaseResponse { released: true }))
}

async fn get_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
) -> Result<Json<BookingHold>, AppError> {
    state
        .holds
        .get_hold_by_booking_id(&booking_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No live holds for booking {}", booking_id)))
}
