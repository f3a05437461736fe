use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Claim reported by the lease store. Absence means available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimStatus {
    Booked,
    Hold,
}

/// Full seat state as seen by clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatStatus {
    Available,
    Hold,
    Booked,
}

impl From<ClaimStatus> for SeatStatus {
    fn from(claim: ClaimStatus) -> Self {
        match claim {
            ClaimStatus::Booked => SeatStatus::Booked,
            ClaimStatus::Hold => SeatStatus::Hold,
        }
    }
}

impl fmt::Display for SeatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SeatStatus::Available => "AVAILABLE",
            SeatStatus::Hold => "HOLD",
            SeatStatus::Booked => "BOOKED",
        };
        f.write_str(s)
    }
}

impl FromStr for SeatStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AVAILABLE" => Ok(SeatStatus::Available),
            "HOLD" | "HELD" => Ok(SeatStatus::Hold),
            "BOOKED" => Ok(SeatStatus::Booked),
            other => Err(format!("unknown seat status: {}", other)),
        }
    }
}

/// One row of the merged seat map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatView {
    pub seat_id: String,
    pub section_id: String,
    pub status: SeatStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing() {
        assert_eq!("booked".parse::<SeatStatus>().unwrap(), SeatStatus::Booked);
        assert_eq!(" HELD ".parse::<SeatStatus>().unwrap(), SeatStatus::Hold);
        assert!("sold".parse::<SeatStatus>().is_err());
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&ClaimStatus::Hold).unwrap(), "\"HOLD\"");
        assert_eq!(SeatStatus::from(ClaimStatus::Booked).to_string(), "BOOKED");
    }
}
