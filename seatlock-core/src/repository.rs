use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::events::SeatStatusChanged;
use crate::status::SeatStatus;
use crate::CoreResult;

/// Shared expiring key-value store.
///
/// Every method is a single non-retrying call; an unreachable or erroring
/// backend surfaces as `CoreError::StoreUnavailable`.
#[async_trait]
pub trait LeaseStore: Send + Sync {
    /// Creates `key` only if absent. `Ok(false)` on contention.
    async fn try_create(&self, key: &str, value: &str, ttl: Duration) -> CoreResult<bool>;

    async fn get(&self, key: &str) -> CoreResult<Option<String>>;

    /// Unconditional write; `None` keeps the key until overwritten or deleted.
    async fn put(&self, key: &str, value: &str, ttl: Option<Duration>) -> CoreResult<()>;

    async fn delete(&self, key: &str) -> CoreResult<()>;

    async fn delete_many(&self, keys: &[String]) -> CoreResult<()>;

    /// Deletes `key` only while it still holds `expected`.
    async fn delete_if_equals(&self, key: &str, expected: &str) -> CoreResult<bool>;

    /// Results are in `keys` order, fetched in one round trip.
    async fn batch_get(&self, keys: &[String]) -> CoreResult<Vec<Option<String>>>;

    async fn keys_by_prefix(&self, prefix: &str) -> CoreResult<Vec<String>>;

    async fn ping(&self) -> CoreResult<()>;
}

/// Row of the primary seat inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySeat {
    pub seat_id: String,
    pub section_id: String,
    pub baseline_status: SeatStatus,
}

/// Read-only view of the primary inventory database.
#[async_trait]
pub trait InventorySource: Send + Sync {
    async fn list_seats(&self) -> CoreResult<Vec<InventorySeat>>;
}

/// Live-update broadcast. Delivery is best effort.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn publish(&self, event: &SeatStatusChanged) -> CoreResult<()>;
}
