pub mod geo_gate;
pub mod manager;
pub mod notify;
pub mod status;

pub use geo_gate::GeoGate;
pub use manager::{SeatHoldManager, DEFAULT_HOLD_TTL};
pub use notify::{LoggingSink, StatusNotifier};
pub use status::StatusResolver;
