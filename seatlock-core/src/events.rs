use serde::{Deserialize, Serialize};

use crate::status::SeatStatus;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SeatStatusChanged {
    pub seat_id: String,
    pub status: SeatStatus,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

impl SeatStatusChanged {
    pub fn now(seat_id: &str, status: SeatStatus) -> Self {
        Self {
            seat_id: seat_id.to_string(),
            status,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}
