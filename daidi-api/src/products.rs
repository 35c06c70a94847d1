use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use daidi_catalog::{PaperKind, PaperType, PriceBreakdown, PriceOptions, Product, ProductCategory};
use daidi_core::repository::{Page, PageRequest, ProductFilter};
use daidi_core::validators::validate_slug;
use daidi_shared::{Money, CURRENCY_CODE};
use crate::{error::AppError, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize, Default)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Page envelope shared by every list endpoint
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct CalculatePriceRequest {
    pub quantity: i64,
    #[serde(default)]
    pub include_design: bool,
    #[serde(default)]
    pub lamination: bool,
    #[serde(default)]
    pub uv_coating: bool,
    #[serde(default)]
    pub paper_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PriceResponse {
    pub product_id: Uuid,
    pub quantity: u32,
    pub currency: &'static str,
    pub unit_price: Money,
    pub total_price: Money,
    pub breakdown: PriceBreakdown,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/products", get(list_products))
        .route("/v1/products/{product}", get(get_product))
        .route("/v1/products/{product}/calculate_price", post(calculate_price))
        .route("/v1/categories", get(list_categories))
        .route("/v1/categories/{slug}", get(get_category))
        .route("/v1/categories/{slug}/products", get(list_category_products))
        .route("/v1/papers", get(list_papers))
}

// ============================================================================
// Helpers
// ============================================================================

impl ProductQuery {
    fn link_params(&self) -> Vec<String> {
        let mut params = Vec::new();
        if let Some(category) = &self.category {
            params.push(format!("category={}", query_value(category)));
        }
        if let Some(featured) = self.featured {
            params.push(format!("featured={}", featured));
        }
        if let Some(size) = self.page_size {
            params.push(format!("page_size={}", size));
        }
        params
    }
}

/// Percent-encode everything but unreserved characters
pub(crate) fn query_value(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => char::from(b).to_string(),
            _ => format!("%{:02X}", b),
        })
        .collect()
}

fn page_link(path: &str, params: &[String], page: u32) -> String {
    let mut params = params.to_vec();
    params.push(format!("page={}", page));
    format!("{}?{}", path, params.join("&"))
}

/// Wrap a page in the list envelope, links keep the other query parameters
pub(crate) fn paginate<T>(path: &str, params: &[String], request: PageRequest, page: Page<T>) -> Paginated<T> {
    Paginated {
        count: page.total,
        next: page.has_next(&request).then(|| page_link(path, params, request.page + 1)),
        previous: (request.page > 1).then(|| page_link(path, params, request.page - 1)),
        results: page.items,
    }
}

/// Look up an active product by id or slug.
pub(crate) async fn find_product(state: &AppState, key: &str) -> Result<Product, AppError> {
    let product = match Uuid::parse_str(key) {
        Ok(id) => state.catalog.get_product(id).await?,
        Err(_) => state.catalog.get_product_by_slug(key).await?,
    };

    product
        .filter(|p| p.is_active)
        .ok_or_else(|| AppError::NotFoundError(format!("Product {} not found", key)))
}

/// Turn the finishing flags of a request into typed pricing options.
pub(crate) async fn price_options(
    state: &AppState,
    product: &Product,
    include_design: bool,
    lamination: bool,
    uv_coating: bool,
    paper_type: Option<&str>,
) -> Result<PriceOptions, AppError> {
    let paper = match paper_type.filter(|tag| !tag.is_empty()) {
        Some(tag) => {
            let papers: Vec<PaperType> = state.catalog.list_papers().await?;
            product.paper_kind_for(tag, &papers)
        }
        None => PaperKind::Standard,
    };

    Ok(PriceOptions {
        include_design,
        lamination,
        uv_coating,
        paper,
    })
}

/// Negative quantities become 0 so the engine reports them as invalid.
pub(crate) fn requested_quantity(quantity: i64) -> u32 {
    u32::try_from(quantity.max(0)).unwrap_or(u32::MAX)
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /v1/products
async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Paginated<Product>>, AppError> {
    let request = PageRequest::new(query.page, query.page_size);

    if let Some(slug) = &query.category {
        validate_slug(slug)?;
    }

    let category_id = match &query.category {
        Some(slug) => match state.catalog.get_category_by_slug(slug).await? {
            Some(category) => Some(category.id),
            // Unknown category filters everything out
            None => {
                return Ok(Json(Paginated { count: 0, next: None, previous: None, results: Vec::new() }));
            }
        },
        None => None,
    };

    let filter = ProductFilter { category_id, featured: query.featured };
    let page = state.catalog.list_products(&filter, request).await?;

    Ok(Json(paginate("/v1/products", &query.link_params(), request, page)))
}

/// GET /v1/products/{product}
async fn get_product(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(find_product(&state, &key).await?))
}

/// POST /v1/products/{product}/calculate_price
async fn calculate_price(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<CalculatePriceRequest>,
) -> Result<Json<PriceResponse>, AppError> {
    let product = find_product(&state, &key).await?;
    let options = price_options(
        &state,
        &product,
        req.include_design,
        req.lamination,
        req.uv_coating,
        req.paper_type.as_deref(),
    )
    .await?;

    let quote = state.pricing.quote(&product, requested_quantity(req.quantity), &options)?;

    Ok(Json(PriceResponse {
        product_id: product.id,
        quantity: quote.quantity,
        currency: CURRENCY_CODE,
        unit_price: quote.unit_price,
        total_price: quote.total_price,
        breakdown: quote.breakdown,
    }))
}

/// GET /v1/categories
async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<ProductCategory>>, AppError> {
    Ok(Json(state.catalog.list_categories().await?))
}

/// GET /v1/categories/{slug}
async fn get_category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProductCategory>, AppError> {
    state
        .catalog
        .get_category_by_slug(&slug)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFoundError(format!("Category {} not found", slug)))
}

/// GET /v1/categories/{slug}/products
async fn list_category_products(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Paginated<Product>>, AppError> {
    let category = state
        .catalog
        .get_category_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFoundError(format!("Category {} not found", slug)))?;

    let request = PageRequest::new(query.page, query.page_size);
    let filter = ProductFilter { category_id: Some(category.id), featured: query.featured };
    let page = state.catalog.list_products(&filter, request).await?;

    let path = format!("/v1/categories/{}/products", slug);
    let query = ProductQuery { category: None, ..query };
    Ok(Json(paginate(&path, &query.link_params(), request, page)))
}

/// GET /v1/papers
async fn list_papers(State(state): State<AppState>) -> Result<Json<Vec<PaperType>>, AppError> {
    Ok(Json(state.catalog.list_papers().await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_links_keep_filters() {
        let query = ProductQuery { category: Some("stickers".to_string()), featured: Some(true), ..Default::default() };
        assert_eq!(
            page_link("/v1/products", &query.link_params(), 2),
            "/v1/products?category=stickers&featured=true&page=2"
        );
    }

    #[test]
    fn test_query_values_are_encoded() {
        assert_eq!(query_value("label-design"), "label-design");
        assert_eq!(query_value("dairy labels&x"), "dairy%20labels%26x");
        assert_eq!(query_value("چ"), "%DA%86");
    }

    #[test]
    fn test_requested_quantity_clamps() {
        assert_eq!(requested_quantity(-5), 0);
        assert_eq!(requested_quantity(250), 250);
        assert_eq!(requested_quantity(i64::MAX), u32::MAX);
    }
}
