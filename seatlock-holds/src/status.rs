use seatlock_core::keys::{status_key, BOOKED_MARKER};
use seatlock_core::{require_id, ClaimStatus, CoreResult, InventorySource, SeatView};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

use crate::manager::SeatHoldManager;

/// Merges permanent and temporary claims. BOOKED wins over HOLD.
#[derive(Clone)]
pub struct StatusResolver {
    holds: SeatHoldManager,
}

impl StatusResolver {
    pub fn new(holds: SeatHoldManager) -> Self {
        Self { holds }
    }

    /// `None` means available.
    pub async fn resolve_one(&self, seat_id: &str) -> CoreResult<Option<ClaimStatus>> {
        let seat_id = require_id("seatId", seat_id)?;
        let marker = self.holds.store().get(&status_key(seat_id)).await?;
        if is_booked(seat_id, marker.as_deref()) {
            return Ok(Some(ClaimStatus::Booked));
        }
        if self.holds.is_held(seat_id).await? {
            return Ok(Some(ClaimStatus::Hold));
        }
        Ok(None)
    }

    /// Same answers as `resolve_one` per seat, in two batched reads.
    /// Available seats are absent from the result.
    pub async fn resolve_many(&self, seat_ids: &[String]) -> CoreResult<HashMap<String, ClaimStatus>> {
        let mut seen = HashSet::with_capacity(seat_ids.len());
        let mut ids: Vec<String> = Vec::with_capacity(seat_ids.len());
        for seat_id in seat_ids {
            let seat_id = require_id("seatId", seat_id)?;
            if seen.insert(seat_id) {
                ids.push(seat_id.to_string());
            }
        }
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let status_keys: Vec<String> = ids.iter().map(|id| status_key(id)).collect();
        let markers = self.holds.store().batch_get(&status_keys).await?;
        let holds = self.holds.get_holds(&ids).await?;

        let mut statuses = HashMap::new();
        for ((seat_id, marker), hold) in ids.into_iter().zip(markers).zip(holds) {
            if is_booked(&seat_id, marker.as_deref()) {
                statuses.insert(seat_id, ClaimStatus::Booked);
            } else if hold.is_some() {
                statuses.insert(seat_id, ClaimStatus::Hold);
            }
        }
        debug!("Resolved {} claimed seats", statuses.len());
        Ok(statuses)
    }

    /// Inventory order, with lease-store claims overriding baseline status.
    pub async fn seat_map(&self, inventory: &dyn InventorySource) -> CoreResult<Vec<SeatView>> {
        let seats = inventory.list_seats().await?;
        let ids: Vec<String> = seats.iter().map(|s| s.seat_id.clone()).collect();
        let claims = self.resolve_many(&ids).await?;

        Ok(seats
            .into_iter()
            .map(|seat| {
                let status = claims
                    .get(seat.seat_id.as_str())
                    .map(|claim| (*claim).into())
                    .unwrap_or(seat.baseline_status);
                SeatView {
                    seat_id: seat.seat_id,
                    section_id: seat.section_id,
                    status,
                }
            })
            .collect())
    }
}

fn is_booked(seat_id: &str, marker: Option<&str>) -> bool {
    match marker {
        Some(BOOKED_MARKER) => true,
        Some(other) => {
            warn!("Ignoring unexpected status marker {:?} on seat {}", other, seat_id);
            false
        }
        None => false,
    }
}
