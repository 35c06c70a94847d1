use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;
use daidi_catalog::{PaperType, Product, ProductCategory};
use daidi_order::{Order, OrderStatus};
use crate::contact::{ContactMessage, NewsletterSubscriber};
use crate::showcase::{PortfolioItem, PortfolioQuery, Service};

pub type RepoResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// 1-based page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub fn new(page: Option<u32>, page_size: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, 100),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Page<T> {
    /// Cut one page out of a complete, already ordered list
    pub fn from_all(items: Vec<T>, request: &PageRequest) -> Self {
        let total = items.len() as u64;
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let items = items.into_iter().skip(offset).take(request.page_size as usize).collect();
        Page { items, total }
    }

    pub fn has_next(&self, request: &PageRequest) -> bool {
        request.offset() + (self.items.len() as u64) < self.total
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub category_id: Option<Uuid>,
    pub featured: Option<bool>,
}

/// Read access to the product catalog. Listings and slug lookups skip inactive records.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn list_categories(&self) -> RepoResult<Vec<ProductCategory>>;

    async fn get_category_by_slug(&self, slug: &str) -> RepoResult<Option<ProductCategory>>;

    async fn list_products(&self, filter: &ProductFilter, page: PageRequest) -> RepoResult<Page<Product>>;

    async fn get_product(&self, id: Uuid) -> RepoResult<Option<Product>>;

    async fn get_product_by_slug(&self, slug: &str) -> RepoResult<Option<Product>>;

    async fn list_papers(&self) -> RepoResult<Vec<PaperType>>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn create_order(&self, order: &Order) -> RepoResult<()>;

    async fn get_order(&self, id: Uuid) -> RepoResult<Option<Order>>;

    /// Newest first
    async fn list_orders(&self, customer_id: &str) -> RepoResult<Vec<Order>>;

    /// Moves the order from `from` to `to`. Fails with a conflict when the
    /// stored status is no longer `from`.
    async fn update_order_status(&self, id: Uuid, from: OrderStatus, to: OrderStatus) -> RepoResult<()>;
}

#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn save_message(&self, message: &ContactMessage) -> RepoResult<()>;

    /// Creates the subscriber or re-activates an existing one
    async fn subscribe(&self, email: &str) -> RepoResult<NewsletterSubscriber>;

    /// `false` when the address was never subscribed
    async fn unsubscribe(&self, email: &str) -> RepoResult<bool>;
}

/// Service and portfolio pages. Both list newest first.
#[async_trait]
pub trait ShowcaseRepository: Send + Sync {
    /// All services, or only those whose `is_active` matches
    async fn list_services(&self, is_active: Option<bool>) -> RepoResult<Vec<Service>>;

    async fn get_service_by_slug(&self, slug: &str) -> RepoResult<Option<Service>>;

    /// Fails with a conflict when the slug is taken
    async fn create_service(&self, service: &Service) -> RepoResult<()>;

    /// Active items only
    async fn list_portfolio(&self, query: &PortfolioQuery, page: PageRequest) -> RepoResult<Page<PortfolioItem>>;

    /// Active items only
    async fn get_portfolio_item(&self, slug: &str) -> RepoResult<Option<PortfolioItem>>;

    /// Fails with a conflict when the slug is taken
    async fn create_portfolio_item(&self, item: &PortfolioItem) -> RepoResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_bounds() {
        let page = PageRequest::new(Some(0), Some(500));
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 100);

        let page = PageRequest::new(Some(3), None);
        assert_eq!(page.offset(), 40);
    }

    #[test]
    fn test_has_next() {
        let request = PageRequest::new(Some(1), Some(2));
        let page = Page { items: vec![1, 2], total: 3 };
        assert!(page.has_next(&request));

        let request = PageRequest::new(Some(2), Some(2));
        let page = Page { items: vec![3], total: 3 };
        assert!(!page.has_next(&request));
    }

    #[test]
    fn test_page_from_all() {
        let request = PageRequest::new(Some(2), Some(2));
        let page = Page::from_all(vec![1, 2, 3, 4, 5], &request);
        assert_eq!(page.items, vec![3, 4]);
        assert_eq!(page.total, 5);
        assert!(page.has_next(&request));

        let beyond = Page::from_all(vec![1, 2], &PageRequest::new(Some(9), Some(2)));
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total, 2);
    }
}
