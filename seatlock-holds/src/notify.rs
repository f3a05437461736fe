//! Outbound seat status events.
//!
//! Mutations enqueue an event after their state change has succeeded; a
//! separate dispatcher task hands events to the sink. Delivery failures are
//! logged and dropped and never feed back into the mutation's result.

use async_trait::async_trait;
use seatlock_core::{CoreResult, NotificationSink, SeatStatus, SeatStatusChanged};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct StatusNotifier {
    tx: mpsc::UnboundedSender<SeatStatusChanged>,
}

impl StatusNotifier {
    /// Starts the dispatcher. It exits once every notifier clone is dropped.
    pub fn spawn(sink: Arc<dyn NotificationSink>) -> (Self, JoinHandle<()>) {
        let (notifier, rx) = Self::channel();
        let handle = tokio::spawn(dispatch(rx, sink));
        (notifier, handle)
    }

    /// Notifier plus the raw receiving end, for callers that drain it themselves.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SeatStatusChanged>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn notify(&self, seat_id: &str, status: SeatStatus) {
        if self.tx.send(SeatStatusChanged::now(seat_id, status)).is_err() {
            debug!("Status dispatcher gone, dropping {} for seat {}", status, seat_id);
        }
    }
}

async fn dispatch(mut rx: mpsc::UnboundedReceiver<SeatStatusChanged>, sink: Arc<dyn NotificationSink>) {
    while let Some(event) = rx.recv().await {
        if let Err(e) = sink.publish(&event).await {
            warn!("Dropping status event for seat {}: {}", event.seat_id, e);
        }
    }
    debug!("Status dispatcher stopped");
}

/// Sink used when no broker is configured.
pub struct LoggingSink;

#[async_trait]
impl NotificationSink for LoggingSink {
    async fn publish(&self, event: &SeatStatusChanged) -> CoreResult<()> {
        info!("Seat {} is now {} (at {})", event.seat_id, event.status, event.timestamp);
        Ok(())
    }
}
