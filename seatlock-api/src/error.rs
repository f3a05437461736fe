use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use seatlock_core::CoreError;
use serde_json::json;

/// User-facing failure: a coarse category plus a message.
#[derive(Debug)]
pub enum AppError {
    InvalidRequest(String),
    Conflict(String),
    NotFound(String),
    StoreUnavailable(String),
    Internal(String),
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidRequest(msg) => AppError::InvalidRequest(msg),
            CoreError::InvalidUnlockTime { partition, raw } => AppError::InvalidRequest(format!(
                "invalid unlock time for partition '{}': {}",
                partition, raw
            )),
            CoreError::StoreUnavailable(detail) => AppError::StoreUnavailable(detail),
            other @ CoreError::CorruptRecord { .. } => AppError::Internal(other.to_string()),
            CoreError::Internal(detail) => AppError::Internal(detail),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, category, message) = match self {
            AppError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, "invalid_request", msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            // store topology stays in the logs
            AppError::StoreUnavailable(detail) => {
                tracing::error!("Lease store unavailable: {}", detail);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "store_unavailable",
                    "Seat store temporarily unavailable".to_string(),
                )
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal Server Error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal",
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": category,
            "message": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_detail_not_echoed() {
        let response = AppError::from(CoreError::StoreUnavailable("10.0.0.7:6379 refused".to_string()))
            .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_internal_fault_is_not_a_bad_request() {
        let err = AppError::from(CoreError::Internal("key must be a string".to_string()));
        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_unlock_time_maps_to_bad_request() {
        let err = AppError::from(CoreError::InvalidUnlockTime {
            partition: "delhi".to_string(),
            raw: "not-a-date".to_string(),
        });
        match err {
            AppError::InvalidRequest(msg) => {
                assert!(msg.contains("delhi"));
                assert!(msg.contains("not-a-date"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
