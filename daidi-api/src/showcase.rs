use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use daidi_core::repository::{Page, PageRequest};
use daidi_core::showcase::{
    NewPortfolioItem, NewService, PortfolioItem, PortfolioOrdering, PortfolioQuery, PortfolioSummary, Service,
};
use daidi_core::{Permission, Principal};
use crate::products::{paginate, query_value, Paginated};
use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize, Default)]
pub struct ServiceListQuery {
    pub is_active: Option<bool>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl ServiceListQuery {
    fn link_params(&self) -> Vec<String> {
        let mut params = Vec::new();
        if let Some(active) = self.is_active {
            params.push(format!("is_active={}", active));
        }
        if let Some(size) = self.page_size {
            params.push(format!("page_size={}", size));
        }
        params
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct PortfolioListQuery {
    pub search: Option<String>,
    pub featured: Option<bool>,
    pub ordering: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl PortfolioListQuery {
    /// Blank searches are ignored, unknown orderings fall back to newest first
    fn filter(&self) -> PortfolioQuery {
        PortfolioQuery {
            search: self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string),
            featured: self.featured,
            ordering: self.ordering.as_deref().and_then(PortfolioOrdering::parse).unwrap_or_default(),
        }
    }

    fn link_params(&self) -> Vec<String> {
        let mut params = Vec::new();
        if let Some(search) = &self.search {
            params.push(format!("search={}", query_value(search)));
        }
        if let Some(featured) = self.featured {
            params.push(format!("featured={}", featured));
        }
        if let Some(ordering) = &self.ordering {
            params.push(format!("ordering={}", query_value(ordering)));
        }
        if let Some(size) = self.page_size {
            params.push(format!("page_size={}", size));
        }
        params
    }
}

/// Public pages
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/services", get(list_services))
        .route("/v1/services/active", get(list_active_services))
        .route("/v1/services/{slug}", get(get_service))
        .route("/v1/portfolio", get(list_portfolio))
        .route("/v1/portfolio/{slug}", get(get_portfolio_item))
}

/// Back-office writes, mounted behind the auth middleware
pub fn manage_routes() -> Router<AppState> {
    Router::new()
        .route("/v1/services", post(create_service))
        .route("/v1/portfolio", post(create_portfolio_item))
}

fn require(principal: &Principal, permission: Permission) -> Result<(), AppError> {
    if principal.has_permission(permission) {
        Ok(())
    } else {
        Err(AppError::AuthorizationError(format!("Missing permission {}", permission)))
    }
}

/// GET /v1/services
async fn list_services(
    State(state): State<AppState>,
    Query(query): Query<ServiceListQuery>,
) -> Result<Json<Paginated<Service>>, AppError> {
    let request = PageRequest::new(query.page, query.page_size);
    let services = state.showcase.list_services(query.is_active).await?;
    let page = Page::from_all(services, &request);

    Ok(Json(paginate("/v1/services", &query.link_params(), request, page)))
}

/// GET /v1/services/active
async fn list_active_services(State(state): State<AppState>) -> Result<Json<Vec<Service>>, AppError> {
    Ok(Json(state.showcase.list_services(Some(true)).await?))
}

/// GET /v1/services/{slug}
async fn get_service(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Service>, AppError> {
    state
        .showcase
        .get_service_by_slug(&slug)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFoundError(format!("Service {} not found", slug)))
}

/// POST /v1/services
async fn create_service(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<NewService>,
) -> Result<(StatusCode, Json<Service>), AppError> {
    require(&principal, Permission::CanManageServices)?;

    let service = req.into_service()?;
    state.showcase.create_service(&service).await?;

    tracing::info!(service = %service.slug, by = %principal.user_id, "Service created");
    Ok((StatusCode::CREATED, Json(service)))
}

/// GET /v1/portfolio
async fn list_portfolio(
    State(state): State<AppState>,
    Query(query): Query<PortfolioListQuery>,
) -> Result<Json<Paginated<PortfolioSummary>>, AppError> {
    let request = PageRequest::new(query.page, query.page_size);
    let page = state.showcase.list_portfolio(&query.filter(), request).await?;
    let page = Page {
        items: page.items.into_iter().map(PortfolioSummary::from).collect(),
        total: page.total,
    };

    Ok(Json(paginate("/v1/portfolio", &query.link_params(), request, page)))
}

/// GET /v1/portfolio/{slug}
async fn get_portfolio_item(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PortfolioItem>, AppError> {
    state
        .showcase
        .get_portfolio_item(&slug)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFoundError(format!("Portfolio item {} not found", slug)))
}

/// POST /v1/portfolio
async fn create_portfolio_item(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<NewPortfolioItem>,
) -> Result<(StatusCode, Json<PortfolioItem>), AppError> {
    require(&principal, Permission::CanManagePortfolio)?;

    let item = req.into_item()?;
    state.showcase.create_portfolio_item(&item).await?;

    tracing::info!(item = %item.slug, by = %principal.user_id, "Portfolio item created");
    Ok((StatusCode::CREATED, Json(item)))
}
