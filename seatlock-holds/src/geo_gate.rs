use chrono::Utc;
use seatlock_core::geo::normalize_partition;
use seatlock_core::keys::{geo_key, GEO_PREFIX};
use seatlock_core::{CoreError, CoreResult, GeoEntry, GeoStatus, LeaseStore, UnlockTime};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{info, warn};

/// Per-partition time gate. Partitions without an entry are open.
#[derive(Clone)]
pub struct GeoGate {
    store: Arc<dyn LeaseStore>,
}

impl GeoGate {
    pub fn new(store: Arc<dyn LeaseStore>) -> Self {
        Self { store }
    }

    pub async fn set_unlock_time(&self, partition: &str, epoch_seconds: i64) -> CoreResult<()> {
        let key = normalize_partition(partition)?;
        if epoch_seconds < 0 {
            return Err(CoreError::InvalidUnlockTime {
                partition: partition.to_string(),
                raw: epoch_seconds.to_string(),
            });
        }
        self.store.put(&geo_key(&key), &epoch_seconds.to_string(), None).await?;
        info!("Partition {} unlocks at {}", key, epoch_seconds);
        Ok(())
    }

    pub async fn is_unlocked(&self, partition: &str) -> CoreResult<GeoStatus> {
        self.is_unlocked_at(partition, Utc::now().timestamp()).await
    }

    /// As `is_unlocked`, against an explicit clock reading.
    pub async fn is_unlocked_at(&self, partition: &str, now: i64) -> CoreResult<GeoStatus> {
        let key = geo_key(&normalize_partition(partition)?);
        let raw = self.store.get(&key).await?;
        Ok(status_from(&key, raw.as_deref(), now))
    }

    /// Keyed by the partition names as given.
    pub async fn status_for_many(&self, partitions: &[String]) -> CoreResult<HashMap<String, GeoStatus>> {
        self.status_for_many_at(partitions, Utc::now().timestamp()).await
    }

    pub async fn status_for_many_at(
        &self,
        partitions: &[String],
        now: i64,
    ) -> CoreResult<HashMap<String, GeoStatus>> {
        let keys = partitions
            .iter()
            .map(|p| normalize_partition(p).map(|k| geo_key(&k)))
            .collect::<CoreResult<Vec<String>>>()?;
        let values = self.store.batch_get(&keys).await?;

        Ok(partitions
            .iter()
            .zip(&keys)
            .zip(values)
            .map(|((partition, key), raw)| (partition.clone(), status_from(key, raw.as_deref(), now)))
            .collect())
    }

    /// Every configured partition with its unlock time.
    pub async fn list_all(&self) -> CoreResult<BTreeMap<String, GeoEntry>> {
        let keys = self.store.keys_by_prefix(GEO_PREFIX).await?;
        let values = self.store.batch_get(&keys).await?;

        let mut entries = BTreeMap::new();
        for (key, raw) in keys.iter().zip(values) {
            // deleted between scan and read
            let Some(raw) = raw else { continue };
            let Some(entry) = parse_stored(key, &raw).and_then(GeoEntry::from_seconds) else {
                continue;
            };
            let partition = key.strip_prefix(GEO_PREFIX).unwrap_or(key);
            entries.insert(partition.to_string(), entry);
        }
        Ok(entries)
    }

    /// Writes entries in order, validating each before its write.
    ///
    /// Stops at the first invalid entry and reports its partition and raw
    /// value. Entries written before it stay written.
    pub async fn set_many_unlock_times(&self, entries: Vec<(String, UnlockTime)>) -> CoreResult<usize> {
        let mut written = 0;
        for (partition, time) in entries {
            let Some(epoch_seconds) = time.epoch_seconds() else {
                warn!("Bulk unlock update stopped at {} after {} writes", partition, written);
                return Err(CoreError::InvalidUnlockTime {
                    partition,
                    raw: time.raw(),
                });
            };
            self.set_unlock_time(&partition, epoch_seconds).await?;
            written += 1;
        }
        Ok(written)
    }
}

fn parse_stored(key: &str, raw: &str) -> Option<i64> {
    match raw.trim().parse::<i64>() {
        Ok(seconds) => Some(seconds),
        Err(e) => {
            let corrupt = CoreError::CorruptRecord {
                key: key.to_string(),
                reason: e.to_string(),
            };
            warn!("{}", corrupt);
            None
        }
    }
}

fn status_from(key: &str, raw: Option<&str>, now: i64) -> GeoStatus {
    raw.and_then(|raw| parse_stored(key, raw))
        .map_or_else(GeoStatus::open, |unlocks_at| GeoStatus::at(unlocks_at, now))
}
