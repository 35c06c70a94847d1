pub mod models;
pub mod manager;

pub use models::{ContactInfo, DeliveryInfo, Order, OrderItem, OrderStatus};
pub use manager::{OrderError, OrderLine, OrderManager, OrderRequest};
