use chrono::Utc;
use seatlock_core::keys::{booking_key, hold_key, status_key, BOOKED_MARKER};
use seatlock_core::{
    require_id, BookingHold, BookingIndex, CoreError, CoreResult, Hold, HoldRecord, LeaseStore,
    SeatRequest, SeatStatus,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::notify::StatusNotifier;

pub const DEFAULT_HOLD_TTL: Duration = Duration::from_secs(120);

/// Creates, inspects and releases seat holds.
///
/// Owns the `hold:seat:*` and `booking:*` key spaces. Exclusion comes
/// entirely from the store's conditional create; nothing here locks
/// in-process, so any number of handlers may share one manager or run
/// their own.
#[derive(Clone)]
pub struct SeatHoldManager {
    store: Arc<dyn LeaseStore>,
    hold_ttl: Duration,
    notifier: Option<StatusNotifier>,
}

impl SeatHoldManager {
    pub fn new(store: Arc<dyn LeaseStore>) -> Self {
        Self {
            store,
            hold_ttl: DEFAULT_HOLD_TTL,
            notifier: None,
        }
    }

    pub fn with_hold_ttl(mut self, hold_ttl: Duration) -> Self {
        self.hold_ttl = hold_ttl;
        self
    }

    pub fn with_notifier(mut self, notifier: StatusNotifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn store(&self) -> &Arc<dyn LeaseStore> {
        &self.store
    }

    pub fn hold_ttl(&self) -> Duration {
        self.hold_ttl
    }

    /// Holds one seat. `Ok(false)` if someone else already holds it.
    pub async fn create_hold(
        &self,
        seat_id: &str,
        user_id: &str,
        booking_id: &str,
        section_id: &str,
    ) -> CoreResult<bool> {
        let seat_id = require_id("seatId", seat_id)?;
        let user_id = require_id("userId", user_id)?;
        let booking_id = require_id("bookingId", booking_id)?;

        let key = hold_key(seat_id);
        let record = self.record(user_id, booking_id, section_id.trim());
        if !self.store.try_create(&key, &record.encode()?, self.hold_ttl).await? {
            debug!("Seat {} already held, denying {}", seat_id, user_id);
            return Ok(false);
        }

        let written = match BookingIndex::encode(&[seat_id.to_string()]) {
            Ok(index) => self.store.put(&booking_key(booking_id), &index, Some(self.hold_ttl)).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            error!("Booking index write failed for {}: {}", booking_id, e);
            self.discard(&[key]).await;
            return Err(e);
        }

        info!("Seat {} held by {} under booking {}", seat_id, user_id, booking_id);
        self.notify(seat_id, SeatStatus::Hold);
        Ok(true)
    }

    /// Holds every seat in `seats` under one booking, or none of them.
    ///
    /// Seats are attempted in the given order. The first denied or failed
    /// attempt deletes the holds taken so far; a contended seat yields
    /// `Ok(false)`, a store failure is returned after the same cleanup.
    /// The booking index is only written once every seat is held, so an
    /// index already stored under `booking_id` is never touched by a failed
    /// call. A crash between acquire and cleanup leaves holds that lapse
    /// with their TTL.
    pub async fn create_multiple_holds(
        &self,
        seats: &[SeatRequest],
        user_id: &str,
        booking_id: &str,
    ) -> CoreResult<bool> {
        let user_id = require_id("userId", user_id)?;
        let booking_id = require_id("bookingId", booking_id)?;
        let seats = validate_seats(seats)?;

        let index_key = booking_key(booking_id);
        let mut acquired: Vec<String> = Vec::with_capacity(seats.len());

        for (seat_id, section_id) in &seats {
            let key = hold_key(seat_id);
            let record = self.record(user_id, booking_id, section_id);
            match self.store.try_create(&key, &record.encode()?, self.hold_ttl).await {
                Ok(true) => acquired.push(key),
                Ok(false) => {
                    debug!(
                        "Seat {} contended, rolling back {} holds of booking {}",
                        seat_id,
                        acquired.len(),
                        booking_id
                    );
                    self.rollback(&acquired).await?;
                    return Ok(false);
                }
                Err(e) => {
                    error!("Hold on seat {} failed for booking {}: {}", seat_id, booking_id, e);
                    if let Err(rollback_err) = self.rollback(&acquired).await {
                        warn!("Rollback of booking {} incomplete: {}", booking_id, rollback_err);
                    }
                    return Err(e);
                }
            }
        }

        let seat_ids: Vec<String> = seats.iter().map(|(seat_id, _)| seat_id.to_string()).collect();
        let written = match BookingIndex::encode(&seat_ids) {
            Ok(index) => self.store.put(&index_key, &index, Some(self.hold_ttl)).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            error!("Booking index write failed for {}: {}", booking_id, e);
            if let Err(rollback_err) = self.rollback(&acquired).await {
                warn!("Rollback of booking {} incomplete: {}", booking_id, rollback_err);
            }
            return Err(e);
        }

        info!("Booking {} holds {} seats for {}", booking_id, seat_ids.len(), user_id);
        for seat_id in &seat_ids {
            self.notify(seat_id, SeatStatus::Hold);
        }
        Ok(true)
    }

    /// The live hold on a seat, if any.
    pub async fn get_hold(&self, seat_id: &str) -> CoreResult<Option<Hold>> {
        let seat_id = require_id("seatId", seat_id)?;
        let key = hold_key(seat_id);
        match self.store.get(&key).await? {
            Some(raw) => self.live_hold(seat_id, &key, &raw, now_ms()).await,
            None => Ok(None),
        }
    }

    /// Live holds for many seats in one round trip, in `seat_ids` order.
    pub async fn get_holds(&self, seat_ids: &[String]) -> CoreResult<Vec<Option<Hold>>> {
        let keys: Vec<String> = seat_ids.iter().map(|id| hold_key(id)).collect();
        let values = self.store.batch_get(&keys).await?;
        let now = now_ms();

        let mut holds = Vec::with_capacity(seat_ids.len());
        for ((seat_id, key), raw) in seat_ids.iter().zip(&keys).zip(values) {
            let hold = match raw {
                Some(raw) => self.live_hold(seat_id, key, &raw, now).await?,
                None => None,
            };
            holds.push(hold);
        }
        Ok(holds)
    }

    pub async fn get_hold_by_booking_id(&self, booking_id: &str) -> CoreResult<Option<BookingHold>> {
        let booking_id = require_id("bookingId", booking_id)?;
        let key = booking_key(booking_id);
        let Some(raw) = self.store.get(&key).await? else {
            return Ok(None);
        };

        let index = match BookingIndex::decode(&key, &raw) {
            Ok(index) => index,
            Err(e) => {
                warn!("{}", e);
                return Ok(None);
            }
        };

        let seat_ids: Vec<String> = index.seat_ids().into_iter().map(String::from).collect();
        let live: Vec<Hold> = self
            .get_holds(&seat_ids)
            .await?
            .into_iter()
            .flatten()
            // a seat released and re-held elsewhere no longer belongs here
            .filter(|hold| hold.booking_id == booking_id)
            .collect();

        Ok(BookingHold::from_live(booking_id, live))
    }

    /// Releases a hold owned by `user_id`. `Ok(false)` without mutation otherwise.
    pub async fn release_hold(&self, seat_id: &str, user_id: &str) -> CoreResult<bool> {
        let seat_id = require_id("seatId", seat_id)?;
        let user_id = require_id("userId", user_id)?;

        let key = hold_key(seat_id);
        let Some(raw) = self.store.get(&key).await? else {
            return Ok(false);
        };
        let Some(hold) = self.live_hold(seat_id, &key, &raw, now_ms()).await? else {
            return Ok(false);
        };
        if hold.user_id != user_id {
            debug!("Release of seat {} by {} denied, held by {}", seat_id, user_id, hold.user_id);
            return Ok(false);
        }

        if !self.store.delete_if_equals(&key, &raw).await? {
            debug!("Hold on seat {} changed during release", seat_id);
            return Ok(false);
        }
        self.store.delete(&booking_key(&hold.booking_id)).await?;

        info!("Seat {} released by {}", seat_id, user_id);
        self.notify(seat_id, SeatStatus::Available);
        Ok(true)
    }

    pub async fn is_held(&self, seat_id: &str) -> CoreResult<bool> {
        Ok(self.get_hold(seat_id).await?.is_some())
    }

    /// Marks a seat permanently booked. Any live hold is left to lapse.
    pub async fn set_seat_booked(&self, seat_id: &str) -> CoreResult<()> {
        let seat_id = require_id("seatId", seat_id)?;
        self.store.put(&status_key(seat_id), BOOKED_MARKER, None).await?;
        info!("Seat {} booked", seat_id);
        self.notify(seat_id, SeatStatus::Booked);
        Ok(())
    }

    fn record(&self, user_id: &str, booking_id: &str, section_id: &str) -> HoldRecord {
        let ttl_ms = i64::try_from(self.hold_ttl.as_millis()).unwrap_or(i64::MAX);
        HoldRecord {
            user_id: user_id.to_string(),
            booking_id: booking_id.to_string(),
            section_id: section_id.to_string(),
            expires_at: now_ms().saturating_add(ttl_ms),
        }
    }

    /// Decodes a stored hold. Corrupt payloads read as absent; lapsed ones
    /// are evicted if still unchanged.
    async fn live_hold(&self, seat_id: &str, key: &str, raw: &str, now_ms: i64) -> CoreResult<Option<Hold>> {
        let record = match HoldRecord::decode(key, raw) {
            Ok(record) => record,
            Err(e) => {
                warn!("{}", e);
                return Ok(None);
            }
        };

        if record.is_expired(now_ms) {
            debug!("Evicting lapsed hold on seat {}", seat_id);
            self.store.delete_if_equals(key, raw).await?;
            return Ok(None);
        }

        Ok(Some(record.into_hold(seat_id)))
    }

    async fn rollback(&self, acquired: &[String]) -> CoreResult<()> {
        if acquired.is_empty() {
            return Ok(());
        }
        self.store.delete_many(acquired).await
    }

    /// Best-effort cleanup; anything left behind lapses with its TTL.
    async fn discard(&self, keys: &[String]) {
        if let Err(e) = self.store.delete_many(keys).await {
            warn!("Cleanup of {:?} failed: {}", keys, e);
        }
    }

    fn notify(&self, seat_id: &str, status: SeatStatus) {
        if let Some(notifier) = &self.notifier {
            notifier.notify(seat_id, status);
        }
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

fn validate_seats(seats: &[SeatRequest]) -> CoreResult<Vec<(&str, &str)>> {
    if seats.is_empty() {
        return Err(CoreError::InvalidRequest("at least one seat is required".to_string()));
    }

    let mut seen = HashSet::with_capacity(seats.len());
    seats
        .iter()
        .map(|seat| {
            let seat_id = require_id("seatId", &seat.seat_id)?;
            if !seen.insert(seat_id) {
                return Err(CoreError::InvalidRequest(format!("seat {} requested twice", seat_id)));
            }
            Ok((seat_id, seat.section_id.trim()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_seats() {
        assert!(validate_seats(&[]).is_err());

        let dup = [SeatRequest::new("A1", "s1"), SeatRequest::new(" A1", "s1")];
        match validate_seats(&dup) {
            Err(CoreError::InvalidRequest(msg)) => assert!(msg.contains("A1")),
            other => panic!("unexpected: {:?}", other),
        }

        let ok = [SeatRequest::new("A1", " s1 "), SeatRequest::new("A2", "s2")];
        assert_eq!(validate_seats(&ok).unwrap(), vec![("A1", "s1"), ("A2", "s2")]);
    }
}
