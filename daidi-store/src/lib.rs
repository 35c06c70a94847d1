pub mod app_config;
pub mod database;
pub mod catalog_repo;
pub mod order_repo;
pub mod contact_repo;
pub mod showcase_repo;
pub mod memory;
pub mod seed;
pub mod events;

pub use database::DbClient;
pub use events::EventPublisher;
pub use catalog_repo::StoreCatalogRepository;
pub use order_repo::StoreOrderRepository;
pub use contact_repo::StoreContactRepository;
pub use showcase_repo::StoreShowcaseRepository;
pub use memory::{MemoryCatalog, MemoryContacts, MemoryOrders, MemoryShowcase};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}
