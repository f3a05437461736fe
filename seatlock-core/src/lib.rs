pub mod booking;
pub mod events;
pub mod geo;
pub mod hold;
pub mod keys;
pub mod repository;
pub mod status;

pub use booking::{BookingHold, BookingIndex};
pub use events::SeatStatusChanged;
pub use geo::{GeoEntry, GeoStatus, UnlockTime};
pub use hold::{Hold, HoldRecord, SeatRequest};
pub use repository::{InventorySeat, InventorySource, LeaseStore, NotificationSink};
pub use status::{ClaimStatus, SeatStatus, SeatView};

/// Failure taxonomy shared by every layer.
///
/// Contention is not represented here: a denied lock is a plain `false` or
/// `None` from the operation that attempted it.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Lease store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("Corrupt record at {key}: {reason}")]
    CorruptRecord { key: String, reason: String },
    #[error("Invalid unlock time for partition '{partition}': {raw}")]
    InvalidUnlockTime { partition: String, raw: String },
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

/// Rejects empty or whitespace-only identifiers.
pub fn require_id<'a>(field: &str, value: &'a str) -> CoreResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidRequest(format!("{} is required", field)));
    }
    Ok(trimmed)
}
