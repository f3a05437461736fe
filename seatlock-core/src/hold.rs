use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

/// Payload stored under `hold:seat:{seatId}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldRecord {
    pub user_id: String,
    pub booking_id: String,
    pub section_id: String,
    /// Epoch milliseconds.
    pub expires_at: i64,
}

impl HoldRecord {
    pub fn encode(&self) -> CoreResult<String> {
        serde_json::to_string(self).map_err(|e| CoreError::Internal(e.to_string()))
    }

    pub fn decode(key: &str, raw: &str) -> CoreResult<Self> {
        serde_json::from_str(raw).map_err(|e| CoreError::CorruptRecord {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }

    pub fn is_expired(&self, now_ms: i64) -> bool {
        self.expires_at <= now_ms
    }

    pub fn into_hold(self, seat_id: &str) -> Hold {
        Hold {
            seat_id: seat_id.to_string(),
            user_id: self.user_id,
            booking_id: self.booking_id,
            section_id: self.section_id,
            expires_at: self.expires_at,
        }
    }
}

/// A live, TTL-bounded claim on one seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hold {
    pub seat_id: String,
    pub user_id: String,
    pub booking_id: String,
    pub section_id: String,
    pub expires_at: i64,
}

/// One seat of a multi-seat acquisition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatRequest {
    pub seat_id: String,
    pub section_id: String,
}

impl SeatRequest {
    pub fn new(seat_id: impl Into<String>, section_id: impl Into<String>) -> Self {
        Self {
            seat_id: seat_id.into(),
            section_id: section_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_wire_format() {
        let record = HoldRecord {
            user_id: "u1".to_string(),
            booking_id: "bk1".to_string(),
            section_id: "s1".to_string(),
            expires_at: 1_700_000_120_000,
        };
        let raw = record.encode().unwrap();
        assert_eq!(
            raw,
            r#"{"userId":"u1","bookingId":"bk1","sectionId":"s1","expiresAt":1700000120000}"#
        );

        let hold = HoldRecord::decode("hold:seat:A1", &raw).unwrap().into_hold("A1");
        assert_eq!(hold.seat_id, "A1");
        assert_eq!(hold.user_id, "u1");
    }

    #[test]
    fn test_corrupt_payload() {
        let err = HoldRecord::decode("hold:seat:A1", "{not json").unwrap_err();
        assert!(matches!(err, CoreError::CorruptRecord { ref key, .. } if key == "hold:seat:A1"));
    }

    #[test]
    fn test_expiry_boundary() {
        let record = HoldRecord {
            user_id: "u1".to_string(),
            booking_id: "bk1".to_string(),
            section_id: "s1".to_string(),
            expires_at: 1_000,
        };
        assert!(!record.is_expired(999));
        assert!(record.is_expired(1_000));
    }
}
