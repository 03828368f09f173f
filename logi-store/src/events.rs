use logi_core::EventPublisher;
use logi_shared::models::LogisticsEvent;
use tokio::sync::broadcast;
use tracing::{info, warn};

/// Publishes events to the log and to live subscribers (the SSE feed).
#[derive(Clone)]
pub struct EventBroadcaster {
    tx: broadcast::Sender<LogisticsEvent>,
}

impl EventBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LogisticsEvent> {
        self.tx.subscribe()
    }
}

impl EventPublisher for EventBroadcaster {
    fn publish(&self, event: LogisticsEvent) {
        match serde_json::to_string(&event) {
            Ok(payload) => info!(target: "logi_events", kind = event.kind(), %payload, "Event published"),
            Err(e) => warn!(target: "logi_events", kind = event.kind(), "Failed to serialize event: {}", e),
        }
        // No subscribers is fine
        let _ = self.tx.send(event);
    }
}
