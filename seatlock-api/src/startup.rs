//! One-time startup, run by the binary before the listener is bound.

use seatlock_core::{InventorySource, LeaseStore, NotificationSink};
use seatlock_holds::{LoggingSink, StatusNotifier};
use seatlock_store::app_config::Config;
use seatlock_store::{DbClient, PostgresInventory, RedisLeaseStore};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::state::AppState;

pub struct Services {
    pub state: AppState,
    /// Status event dispatcher; finishes once `state` and its clones are dropped.
    pub dispatcher: JoinHandle<()>,
}

pub async fn bootstrap(config: &Config) -> anyhow::Result<Services> {
    let store = RedisLeaseStore::connect(&config.redis.url).await?;
    store.ping().await?;
    let store: Arc<dyn LeaseStore> = Arc::new(store);

    let inventory: Option<Arc<dyn InventorySource>> = match &config.database {
        Some(db) => {
            let client = DbClient::new(&db.url).await?;
            Some(Arc::new(PostgresInventory::new(client)))
        }
        None => {
            info!("No inventory database configured, seat map disabled");
            None
        }
    };

    let (notifier, dispatcher) = StatusNotifier::spawn(notification_sink(config)?);
    let state = AppState::new(store, config.holds.hold_ttl(), Some(notifier), inventory);

    info!("Seat holds expire after {}s", config.holds.hold_seconds);
    Ok(Services { state, dispatcher })
}

#[cfg(feature = "kafka")]
fn notification_sink(config: &Config) -> anyhow::Result<Arc<dyn NotificationSink>> {
    match &config.kafka {
        Some(kafka) => {
            info!("Publishing seat status to Kafka topic {}", kafka.topic);
            Ok(Arc::new(seatlock_store::EventProducer::new(&kafka.brokers, &kafka.topic)?))
        }
        None => Ok(Arc::new(LoggingSink)),
    }
}

#[cfg(not(feature = "kafka"))]
fn notification_sink(config: &Config) -> anyhow::Result<Arc<dyn NotificationSink>> {
    if config.kafka.is_some() {
        tracing::warn!("Kafka configured but built without the `kafka` feature, logging events instead");
    }
    Ok(Arc::new(LoggingSink))
}
