use seatlock_core::{InventorySource, LeaseStore};
use seatlock_holds::{GeoGate, SeatHoldManager, StatusNotifier, StatusResolver};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub holds: SeatHoldManager,
    pub resolver: StatusResolver,
    pub geo: GeoGate,
    pub inventory: Option<Arc<dyn InventorySource>>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn LeaseStore>,
        hold_ttl: Duration,
        notifier: Option<StatusNotifier>,
        inventory: Option<Arc<dyn InventorySource>>,
    ) -> Self {
        let mut holds = SeatHoldManager::new(store.clone()).with_hold_ttl(hold_ttl);
        if let Some(notifier) = notifier {
            holds = holds.with_notifier(notifier);
        }

        Self {
            resolver: StatusResolver::new(holds.clone()),
            geo: GeoGate::new(store),
            holds,
            inventory,
        }
    }
}
