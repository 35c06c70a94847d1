use std::sync::Arc;
use daidi_catalog::{PricingConfig, PricingEngine, PricingError};
use daidi_core::repository::{CatalogRepository, ContactRepository, OrderRepository, ShowcaseRepository};
use daidi_order::OrderManager;
use daidi_store::seed::{label_catalog, showcase};
use daidi_store::{EventPublisher, MemoryCatalog, MemoryContacts, MemoryOrders, MemoryShowcase};

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub contacts: Arc<dyn ContactRepository>,
    pub showcase: Arc<dyn ShowcaseRepository>,
    pub pricing: Arc<PricingEngine>,
    pub order_manager: Arc<OrderManager>,
    pub events: EventPublisher,
    pub auth: AuthConfig,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        orders: Arc<dyn OrderRepository>,
        contacts: Arc<dyn ContactRepository>,
        showcase: Arc<dyn ShowcaseRepository>,
        pricing: PricingConfig,
        auth: AuthConfig,
    ) -> Result<Self, PricingError> {
        let pricing = Arc::new(PricingEngine::new(pricing)?);

        Ok(Self {
            catalog,
            orders,
            contacts,
            showcase,
            order_manager: Arc::new(OrderManager::new(pricing.clone())),
            pricing,
            events: EventPublisher::default(),
            auth,
        })
    }

    /// Demo state backed by the seeded label catalogue
    pub fn in_memory(pricing: PricingConfig, auth: AuthConfig) -> Result<Self, PricingError> {
        Self::new(
            Arc::new(MemoryCatalog::new(label_catalog())),
            Arc::new(MemoryOrders::new()),
            Arc::new(MemoryContacts::new()),
            Arc::new(MemoryShowcase::new(showcase())),
            pricing,
            auth,
        )
    }
}
