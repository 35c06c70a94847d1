//! In-memory repositories, used when no database is configured and by tests.

use std::collections::HashMap;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;
use daidi_catalog::{PaperType, Product, ProductCategory};
use daidi_core::contact::{ContactMessage, NewsletterSubscriber};
use daidi_core::repository::{
    CatalogRepository, ContactRepository, OrderRepository, Page, PageRequest, ProductFilter, RepoResult,
    ShowcaseRepository,
};
use daidi_core::showcase::{PortfolioItem, PortfolioQuery, Service};
use daidi_order::{Order, OrderStatus};
use crate::seed::{SeedCatalog, SeedShowcase};
use crate::StoreError;

pub struct MemoryCatalog {
    categories: Vec<ProductCategory>,
    papers: Vec<PaperType>,
    products: Vec<Product>,
}

impl MemoryCatalog {
    pub fn new(seed: SeedCatalog) -> Self {
        Self {
            categories: seed.categories,
            papers: seed.papers,
            products: seed.products,
        }
    }
}

#[async_trait]
impl CatalogRepository for MemoryCatalog {
    async fn list_categories(&self) -> RepoResult<Vec<ProductCategory>> {
        let mut categories: Vec<_> = self.categories.iter().filter(|c| c.is_active).cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn get_category_by_slug(&self, slug: &str) -> RepoResult<Option<ProductCategory>> {
        Ok(self.categories.iter().find(|c| c.slug == slug && c.is_active).cloned())
    }

    async fn list_products(&self, filter: &ProductFilter, page: PageRequest) -> RepoResult<Page<Product>> {
        let mut matching: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| p.is_active)
            .filter(|p| filter.category_id.is_none_or(|id| p.category_id == id))
            .filter(|p| filter.featured.is_none_or(|featured| p.is_featured == featured))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.slug.cmp(&b.slug)));

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(usize::try_from(page.offset())?)
            .take(page.page_size as usize)
            .cloned()
            .collect();

        Ok(Page { items, total })
    }

    async fn get_product(&self, id: Uuid) -> RepoResult<Option<Product>> {
        Ok(self.products.iter().find(|p| p.id == id).cloned())
    }

    async fn get_product_by_slug(&self, slug: &str) -> RepoResult<Option<Product>> {
        Ok(self.products.iter().find(|p| p.slug == slug && p.is_active).cloned())
    }

    async fn list_papers(&self) -> RepoResult<Vec<PaperType>> {
        let mut papers: Vec<_> = self.papers.iter().filter(|p| p.is_active).cloned().collect();
        papers.sort_by(|a, b| a.gram_weight.cmp(&b.gram_weight).then_with(|| a.name.cmp(&b.name)));
        Ok(papers)
    }
}

#[derive(Default)]
pub struct MemoryOrders {
    orders: RwLock<HashMap<Uuid, Order>>,
}

impl MemoryOrders {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderRepository for MemoryOrders {
    async fn create_order(&self, order: &Order) -> RepoResult<()> {
        let mut orders = self.orders.write().await;
        if orders.contains_key(&order.id) {
            return Err(StoreError::Conflict(format!("order {} already exists", order.id)).into());
        }
        orders.insert(order.id, order.clone());
        Ok(())
    }

    async fn get_order(&self, id: Uuid) -> RepoResult<Option<Order>> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn list_orders(&self, customer_id: &str) -> RepoResult<Vec<Order>> {
        let mut orders: Vec<Order> = self
            .orders
            .read()
            .await
            .values()
            .filter(|o| o.is_owned_by(customer_id))
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn update_order_status(&self, id: Uuid, from: OrderStatus, to: OrderStatus) -> RepoResult<()> {
        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("order {}", id)))?;
        if order.status != from {
            return Err(StoreError::Conflict(format!("order {} is {}, not {}", id, order.status, from)).into());
        }
        order.status = to;
        order.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryContacts {
    messages: RwLock<Vec<ContactMessage>>,
    subscribers: RwLock<HashMap<String, NewsletterSubscriber>>,
}

impl MemoryContacts {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContactRepository for MemoryContacts {
    async fn save_message(&self, message: &ContactMessage) -> RepoResult<()> {
        self.messages.write().await.push(message.clone());
        Ok(())
    }

    async fn subscribe(&self, email: &str) -> RepoResult<NewsletterSubscriber> {
        let mut subscribers = self.subscribers.write().await;
        let subscriber = subscribers
            .entry(email.to_string())
            .and_modify(|s| s.is_active = true)
            .or_insert_with(|| NewsletterSubscriber {
                email: email.to_string(),
                is_active: true,
                subscribed_at: Utc::now(),
            });
        Ok(subscriber.clone())
    }

    async fn unsubscribe(&self, email: &str) -> RepoResult<bool> {
        match self.subscribers.write().await.get_mut(email) {
            Some(subscriber) => {
                subscriber.is_active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

pub struct MemoryShowcase {
    services: RwLock<Vec<Service>>,
    portfolio: RwLock<Vec<PortfolioItem>>,
}

impl MemoryShowcase {
    pub fn new(seed: SeedShowcase) -> Self {
        Self {
            services: RwLock::new(seed.services),
            portfolio: RwLock::new(seed.portfolio),
        }
    }
}

#[async_trait]
impl ShowcaseRepository for MemoryShowcase {
    async fn list_services(&self, is_active: Option<bool>) -> RepoResult<Vec<Service>> {
        let mut services: Vec<Service> = self
            .services
            .read()
            .await
            .iter()
            .filter(|s| is_active.is_none_or(|active| s.is_active == active))
            .cloned()
            .collect();
        services.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.slug.cmp(&b.slug)));
        Ok(services)
    }

    async fn get_service_by_slug(&self, slug: &str) -> RepoResult<Option<Service>> {
        Ok(self.services.read().await.iter().find(|s| s.slug == slug).cloned())
    }

    async fn create_service(&self, service: &Service) -> RepoResult<()> {
        let mut services = self.services.write().await;
        if services.iter().any(|s| s.slug == service.slug) {
            return Err(StoreError::Conflict(format!("service slug {} is taken", service.slug)).into());
        }
        services.push(service.clone());
        Ok(())
    }

    async fn list_portfolio(&self, query: &PortfolioQuery, page: PageRequest) -> RepoResult<Page<PortfolioItem>> {
        let mut items: Vec<PortfolioItem> = self
            .portfolio
            .read()
            .await
            .iter()
            .filter(|p| p.is_active)
            .filter(|p| query.featured.is_none_or(|featured| p.is_featured == featured))
            .filter(|p| query.search.as_deref().is_none_or(|search| p.matches(search)))
            .cloned()
            .collect();
        items.sort_by(|a, b| query.ordering.compare(a, b));
        Ok(Page::from_all(items, &page))
    }

    async fn get_portfolio_item(&self, slug: &str) -> RepoResult<Option<PortfolioItem>> {
        Ok(self.portfolio.read().await.iter().find(|p| p.slug == slug && p.is_active).cloned())
    }

    async fn create_portfolio_item(&self, item: &PortfolioItem) -> RepoResult<()> {
        let mut portfolio = self.portfolio.write().await;
        if portfolio.iter().any(|p| p.slug == item.slug) {
            return Err(StoreError::Conflict(format!("portfolio slug {} is taken", item.slug)).into());
        }
        portfolio.push(item.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::{label_catalog, showcase};
    use daidi_core::showcase::PortfolioOrdering;
    use chrono::Duration;
    use daidi_order::{ContactInfo, DeliveryInfo};

    fn order_for(customer: &str) -> Order {
        Order::new(
            customer.to_string(),
            ContactInfo {
                name: "Sara".to_string(),
                phone: "09121234567".to_string().into(),
                email: "sara@example.com".to_string().into(),
            },
            DeliveryInfo {
                address: "12 Valiasr St".to_string(),
                city: "Tehran".to_string(),
                postal_code: None,
                method: "courier".to_string(),
                delivery_date: None,
                urgent: false,
            },
        )
    }

    #[tokio::test]
    async fn test_catalog_filters_and_pages() {
        let catalog = MemoryCatalog::new(label_catalog());

        let featured = catalog
            .list_products(&ProductFilter { featured: Some(true), ..Default::default() }, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(featured.total, 3);

        let request = PageRequest::new(Some(2), Some(4));
        let page = catalog.list_products(&ProductFilter::default(), request).await.unwrap();
        assert_eq!(page.total, 10);
        assert_eq!(page.items.len(), 4);
        assert!(page.has_next(&request));

        let stickers = catalog.get_category_by_slug("stickers").await.unwrap().unwrap();
        let page = catalog
            .list_products(&ProductFilter { category_id: Some(stickers.id), ..Default::default() }, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total, 2);
    }

    #[tokio::test]
    async fn test_catalog_lists_newest_first() {
        let catalog = MemoryCatalog::new(label_catalog());
        let page = catalog.list_products(&ProductFilter::default(), PageRequest::default()).await.unwrap();

        assert_eq!(page.items[0].slug, "cd-label");
        assert_eq!(page.items[9].slug, "label-digital-normal");
        assert!(page.items.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }

    #[tokio::test]
    async fn test_catalog_lookup_by_slug() {
        let catalog = MemoryCatalog::new(label_catalog());
        let product = catalog.get_product_by_slug("cd-label").await.unwrap().unwrap();
        assert_eq!(product.min_quantity, 10);

        let by_id = catalog.get_product(product.id).await.unwrap().unwrap();
        assert_eq!(by_id.slug, "cd-label");

        assert!(catalog.get_product_by_slug("business-cards").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_orders_newest_first() {
        let repo = MemoryOrders::new();
        let mut older = order_for("alice");
        older.created_at = Utc::now() - Duration::hours(1);
        let newer = order_for("alice");
        let other = order_for("bob");

        repo.create_order(&older).await.unwrap();
        repo.create_order(&newer).await.unwrap();
        repo.create_order(&other).await.unwrap();

        let orders = repo.list_orders("alice").await.unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].id, newer.id);
        assert_eq!(orders[1].id, older.id);
    }

    #[tokio::test]
    async fn test_duplicate_order_rejected() {
        let repo = MemoryOrders::new();
        let order = order_for("alice");
        repo.create_order(&order).await.unwrap();
        assert!(repo.create_order(&order).await.is_err());
    }

    #[tokio::test]
    async fn test_update_status() {
        let repo = MemoryOrders::new();
        let order = order_for("alice");
        repo.create_order(&order).await.unwrap();

        repo.update_order_status(order.id, OrderStatus::Pending, OrderStatus::Confirmed).await.unwrap();
        let stored = repo.get_order(order.id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Confirmed);

        let missing = repo
            .update_order_status(Uuid::new_v4(), OrderStatus::Pending, OrderStatus::Confirmed)
            .await
            .unwrap_err();
        assert!(matches!(missing.downcast_ref::<StoreError>(), Some(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_stale_status_update_is_rejected() {
        let repo = MemoryOrders::new();
        let order = order_for("alice");
        repo.create_order(&order).await.unwrap();
        repo.update_order_status(order.id, OrderStatus::Pending, OrderStatus::Confirmed).await.unwrap();

        // Both requests read "confirmed"; only the first write wins
        repo.update_order_status(order.id, OrderStatus::Confirmed, OrderStatus::Processing).await.unwrap();
        let stale = repo
            .update_order_status(order.id, OrderStatus::Confirmed, OrderStatus::Cancelled)
            .await
            .unwrap_err();
        assert!(matches!(stale.downcast_ref::<StoreError>(), Some(StoreError::Conflict(_))));

        let stored = repo.get_order(order.id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Processing);
    }

    #[tokio::test]
    async fn test_newsletter_resubscribe() {
        let repo = MemoryContacts::new();
        let first = repo.subscribe("news@daidi.ir").await.unwrap();
        assert!(first.is_active);

        assert!(repo.unsubscribe("news@daidi.ir").await.unwrap());
        assert!(!repo.unsubscribe("nobody@daidi.ir").await.unwrap());

        let again = repo.subscribe("news@daidi.ir").await.unwrap();
        assert!(again.is_active);
        assert_eq!(again.subscribed_at, first.subscribed_at);
    }

    #[tokio::test]
    async fn test_services_filter_by_active() {
        let repo = MemoryShowcase::new(showcase());

        let all = repo.list_services(None).await.unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].slug, "packaging-design");

        let active = repo.list_services(Some(true)).await.unwrap();
        assert_eq!(active.len(), 3);
        assert!(active.iter().all(|s| s.is_active));
    }

    #[tokio::test]
    async fn test_portfolio_search_and_ordering() {
        let repo = MemoryShowcase::new(showcase());

        let query = PortfolioQuery { search: Some("LABELS".to_string()), ..Default::default() };
        let page = repo.list_portfolio(&query, PageRequest::default()).await.unwrap();
        assert_eq!(page.total, 2);

        let query = PortfolioQuery { ordering: PortfolioOrdering::YearDesc, ..Default::default() };
        let page = repo.list_portfolio(&query, PageRequest::default()).await.unwrap();
        let years: Vec<i32> = page.items.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2024, 2023, 2022]);

        assert!(repo.get_portfolio_item("tea-packaging").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_service_slug_rejected() {
        let repo = MemoryShowcase::new(showcase());
        let mut service = repo.get_service_by_slug("label-design").await.unwrap().unwrap();
        service.id = Uuid::new_v4();

        let err = repo.create_service(&service).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<StoreError>(), Some(StoreError::Conflict(_))));
    }
}
