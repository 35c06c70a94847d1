use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{error, info, warn};
use daidi_shared::models::DomainEvent;

/// Drain domain events into the log until every publisher is gone.
pub async fn start_event_logger(mut rx: broadcast::Receiver<DomainEvent>) {
    info!("Event worker started, listening for domain events...");

    loop {
        match rx.recv().await {
            Ok(event) => handle_event(&event),
            Err(RecvError::Lagged(skipped)) => warn!("Event worker lagged, skipped {} event(s)", skipped),
            Err(RecvError::Closed) => {
                info!("Event channel closed, stopping worker");
                break;
            }
        }
    }
}

fn handle_event(event: &DomainEvent) {
    match event {
        DomainEvent::OrderPlaced(e) if e.urgent => {
            warn!(order_number = %e.order_number, total = %e.total_amount, "Urgent order placed");
        }
        DomainEvent::OrderPlaced(e) => {
            info!(order_number = %e.order_number, items = e.item_count, total = %e.total_amount, "Order placed");
        }
        DomainEvent::OrderStatusChanged(e) => {
            info!(order_number = %e.order_number, from = %e.from, to = %e.to, by = %e.changed_by, "Order status changed");
        }
        DomainEvent::ContactReceived(e) => {
            info!(message_id = %e.message_id, subject = %e.subject, "New contact message");
        }
    }

    match serde_json::to_string(event) {
        Ok(payload) => tracing::debug!(event = event.name(), %payload, "Event payload"),
        Err(e) => error!("Failed to serialize {}: {}", event.name(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use daidi_shared::models::ContactReceivedEvent;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_worker_stops_when_channel_closes() {
        let (tx, rx) = broadcast::channel(8);
        let handle = tokio::spawn(start_event_logger(rx));

        tx.send(DomainEvent::ContactReceived(ContactReceivedEvent {
            message_id: Uuid::new_v4(),
            subject: "Hello".to_string(),
            timestamp: 0,
        }))
        .unwrap();
        drop(tx);

        handle.await.unwrap();
    }
}
