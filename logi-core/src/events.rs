use logi_shared::models::LogisticsEvent;

/// Sink for committed domain events. Publishing never fails the caller.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: LogisticsEvent);
}

/// Discards every event.
pub struct NoopPublisher;

impl EventPublisher for NoopPublisher {
    fn publish(&self, _event: LogisticsEvent) {}
}
