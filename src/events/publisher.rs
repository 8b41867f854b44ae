use serde_json::Value;
use tokio::sync::broadcast;

/// Broadcast fan-out for depot lifecycle events.
///
/// The engine emits one event per state-changing operation (see
/// [`crate::constants::events`] for the names). Hosts subscribe to feed
/// EDI notifications, billing, or audit trails; the engine never waits
/// on them.
#[derive(Debug, Clone)]
pub struct EventPublisher {
    sender: broadcast::Sender<WorkflowEvent>,
}

/// A single lifecycle event with its JSON payload
#[derive(Debug, Clone)]
pub struct WorkflowEvent {
    pub name: String,
    pub context: Value,
    pub published_at: chrono::DateTime<chrono::Utc>,
}

impl EventPublisher {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// Fire-and-forget: with no subscribers the event is dropped, and a
    /// lagging subscriber loses old events rather than stalling the
    /// workflow.
    pub fn publish(&self, event_name: impl Into<String>, context: Value) {
        let event = WorkflowEvent {
            name: event_name.into(),
            context,
            published_at: chrono::Utc::now(),
        };
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WorkflowEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
