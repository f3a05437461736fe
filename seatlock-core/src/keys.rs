//! Lease-store key space.

pub const HOLD_PREFIX: &str = "hold:seat:";
pub const BOOKING_PREFIX: &str = "booking:";
pub const STATUS_PREFIX: &str = "seat:status:";
pub const GEO_PREFIX: &str = "geo:unlock:";

/// Value of a permanent status marker.
pub const BOOKED_MARKER: &str = "BOOKED";

pub fn hold_key(seat_id: &str) -> String {
    format!("{}{}", HOLD_PREFIX, seat_id)
}

pub fn booking_key(booking_id: &str) -> String {
    format!("{}{}", BOOKING_PREFIX, booking_id)
}

pub fn status_key(seat_id: &str) -> String {
    format!("{}{}", STATUS_PREFIX, seat_id)
}

/// Expects an already-normalized partition key.
pub fn geo_key(partition: &str) -> String {
    format!("{}{}", GEO_PREFIX, partition)
}
