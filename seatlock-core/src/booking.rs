use serde::Serialize;

use crate::hold::Hold;
use crate::{CoreError, CoreResult};

/// Value stored under `booking:{bookingId}`.
///
/// Older writers stored a bare seat id; current writers store a JSON list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingIndex {
    Legacy(String),
    Seats(Vec<String>),
}

impl BookingIndex {
    pub fn decode(key: &str, raw: &str) -> CoreResult<Self> {
        let corrupt = |reason: String| CoreError::CorruptRecord {
            key: key.to_string(),
            reason,
        };

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(corrupt("empty booking index".to_string()));
        }

        match trimmed.as_bytes()[0] {
            b'[' => serde_json::from_str::<Vec<String>>(trimmed)
                .map(BookingIndex::Seats)
                .map_err(|e| corrupt(e.to_string())),
            b'"' => serde_json::from_str::<String>(trimmed)
                .map(BookingIndex::Legacy)
                .map_err(|e| corrupt(e.to_string())),
            _ => Ok(BookingIndex::Legacy(trimmed.to_string())),
        }
    }

    /// Always writes the list form.
    pub fn encode(seat_ids: &[String]) -> CoreResult<String> {
        serde_json::to_string(seat_ids).map_err(|e| CoreError::Internal(e.to_string()))
    }

    pub fn seat_ids(&self) -> Vec<&str> {
        match self {
            BookingIndex::Legacy(seat_id) => vec![seat_id.as_str()],
            BookingIndex::Seats(seat_ids) => seat_ids.iter().map(String::as_str).collect(),
        }
    }
}

/// Live holds reachable from a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BookingHold {
    Single(Hold),
    #[serde(rename_all = "camelCase")]
    Group {
        booking_id: String,
        user_id: String,
        seats: Vec<Hold>,
    },
}

impl BookingHold {
    /// `None` when no live hold remains.
    pub fn from_live(booking_id: &str, mut holds: Vec<Hold>) -> Option<Self> {
        match holds.len() {
            0 => None,
            1 => holds.pop().map(BookingHold::Single),
            _ => Some(BookingHold::Group {
                booking_id: booking_id.to_string(),
                user_id: holds[0].user_id.clone(),
                seats: holds,
            }),
        }
    }

    pub fn seat_ids(&self) -> Vec<&str> {
        match self {
            BookingHold::Single(hold) => vec![hold.seat_id.as_str()],
            BookingHold::Group { seats, .. } => seats.iter().map(|h| h.seat_id.as_str()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hold(seat_id: &str) -> Hold {
        Hold {
            seat_id: seat_id.to_string(),
            user_id: "u1".to_string(),
            booking_id: "bk9".to_string(),
            section_id: "s1".to_string(),
            expires_at: 0,
        }
    }

    #[test]
    fn test_decode_both_generations() {
        let current = BookingIndex::decode("booking:bk9", r#"["A1","A2"]"#).unwrap();
        assert_eq!(current.seat_ids(), vec!["A1", "A2"]);

        let bare = BookingIndex::decode("booking:bk1", "A1").unwrap();
        assert_eq!(bare, BookingIndex::Legacy("A1".to_string()));

        let quoted = BookingIndex::decode("booking:bk1", r#""A1""#).unwrap();
        assert_eq!(quoted.seat_ids(), vec!["A1"]);
    }

    #[test]
    fn test_decode_rejects_malformed_list() {
        assert!(matches!(
            BookingIndex::decode("booking:bk1", r#"["A1", 7"#),
            Err(CoreError::CorruptRecord { .. })
        ));
        assert!(BookingIndex::decode("booking:bk1", "  ").is_err());
    }

    #[test]
    fn test_encode_is_list() {
        let raw = BookingIndex::encode(&["A1".to_string()]).unwrap();
        assert_eq!(raw, r#"["A1"]"#);
        assert_eq!(
            BookingIndex::decode("booking:x", &raw).unwrap(),
            BookingIndex::Seats(vec!["A1".to_string()])
        );
    }

    #[test]
    fn test_grouping() {
        assert!(BookingHold::from_live("bk9", vec![]).is_none());

        let single = BookingHold::from_live("bk9", vec![hold("A1")]).unwrap();
        assert!(matches!(single, BookingHold::Single(_)));
        let json = serde_json::to_value(&single).unwrap();
        assert_eq!(json["seatId"], "A1");

        let group = BookingHold::from_live("bk9", vec![hold("A1"), hold("A2")]).unwrap();
        assert_eq!(group.seat_ids(), vec!["A1", "A2"]);
        let json = serde_json::to_value(&group).unwrap();
        assert_eq!(json["bookingId"], "bk9");
        assert_eq!(json["seats"].as_array().unwrap().len(), 2);
    }
}
