use tokio::sync::broadcast;
use tracing::{debug, warn};
use daidi_shared::models::DomainEvent;

const DEFAULT_CAPACITY: usize = 256;

/// Fan-out of domain events to in-process consumers.
#[derive(Clone)]
pub struct EventPublisher {
    sender: broadcast::Sender<DomainEvent>,
}

impl EventPublisher {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishing never fails the caller. Events with no live subscriber are dropped.
    pub fn publish(&self, event: DomainEvent) {
        let name = event.name();
        match self.sender.send(event) {
            Ok(receivers) => debug!("Published {} to {} subscriber(s)", name, receivers),
            Err(_) => warn!("Dropped {}: no subscribers", name),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use daidi_shared::models::ContactReceivedEvent;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_subscriber_receives_event() {
        let publisher = EventPublisher::default();
        let mut rx = publisher.subscribe();

        let id = Uuid::new_v4();
        publisher.publish(DomainEvent::ContactReceived(ContactReceivedEvent {
            message_id: id,
            subject: "Quote request".to_string(),
            timestamp: 0,
        }));

        match rx.recv().await.unwrap() {
            DomainEvent::ContactReceived(event) => assert_eq!(event.message_id, id),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_publish_without_subscribers_is_harmless() {
        let publisher = EventPublisher::new(4);
        publisher.publish(DomainEvent::ContactReceived(ContactReceivedEvent {
            message_id: Uuid::new_v4(),
            subject: String::new(),
            timestamp: 0,
        }));
    }
}
