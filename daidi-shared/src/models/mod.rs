pub mod events;

pub use events::{ContactReceivedEvent, DomainEvent, OrderPlacedEvent, OrderStatusChangedEvent};
