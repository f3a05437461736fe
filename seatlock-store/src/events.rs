use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;
use seatlock_core::{CoreError, CoreResult, NotificationSink, SeatStatusChanged};
use std::time::Duration;
use tracing::{debug, error};

/// Publishes seat status changes to a Kafka topic, keyed by seat id.
#[derive(Clone)]
pub struct EventProducer {
    producer: FutureProducer,
    topic: String,
}

impl EventProducer {
    pub fn new(brokers: &str, topic: &str) -> Result<Self, rdkafka::error::KafkaError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .create()?;

        Ok(Self {
            producer,
            topic: topic.to_string(),
        })
    }
}

#[async_trait]
impl NotificationSink for EventProducer {
    async fn publish(&self, event: &SeatStatusChanged) -> CoreResult<()> {
        let payload = serde_json::to_string(event)
            .map_err(|e| CoreError::Internal(e.to_string()))?;
        let record = FutureRecord::to(&self.topic)
            .key(&event.seat_id)
            .payload(&payload);

        match self.producer.send(record, Timeout::After(Duration::from_secs(0))).await {
            Ok(delivery) => {
                debug!(
                    "Sent {} for seat {}: partition {} offset {}",
                    event.status, event.seat_id, delivery.partition, delivery.offset
                );
                Ok(())
            }
            Err((e, _msg)) => {
                error!("Failed to send message to {}: {}", self.topic, e);
                Err(CoreError::StoreUnavailable(e.to_string()))
            }
        }
    }
}
