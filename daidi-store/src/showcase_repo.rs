use async_trait::async_trait;
use uuid::Uuid;
use sqlx::PgPool;
use sqlx::types::Json;
use chrono::{DateTime, Utc};
use daidi_core::repository::{Page, PageRequest, RepoResult, ShowcaseRepository};
use daidi_core::showcase::{search_terms, PortfolioItem, PortfolioQuery, Service};
use crate::StoreError;

pub struct StoreShowcaseRepository {
    pool: PgPool,
}

impl StoreShowcaseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Unique violations become conflicts, everything else passes through
fn conflict_on_duplicate(err: sqlx::Error, what: String) -> Box<dyn std::error::Error + Send + Sync> {
    match err {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => StoreError::Conflict(what).into(),
        other => other.into(),
    }
}

/// Escape `ILIKE` wildcards and wrap the term for a substring match
fn like_pattern(term: &str) -> String {
    let escaped = term.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
    format!("%{}%", escaped)
}

#[derive(sqlx::FromRow)]
struct ServiceRow {
    id: Uuid,
    title: String,
    slug: String,
    description: String,
    short_description: String,
    features: Json<Vec<String>>,
    gallery: Json<Vec<String>>,
    specifications: Json<Vec<String>>,
    is_active: bool,
    meta_title: String,
    meta_description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ServiceRow> for Service {
    fn from(row: ServiceRow) -> Self {
        Service {
            id: row.id,
            title: row.title,
            slug: row.slug,
            description: row.description,
            short_description: row.short_description,
            features: row.features.0,
            gallery: row.gallery.0,
            specifications: row.specifications.0,
            is_active: row.is_active,
            meta_title: row.meta_title,
            meta_description: row.meta_description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PortfolioRow {
    id: Uuid,
    title: String,
    slug: String,
    category: String,
    client: String,
    year: i32,
    description: String,
    challenge: String,
    solution: String,
    result: String,
    images: Json<Vec<String>>,
    tags: Json<Vec<String>>,
    is_featured: bool,
    is_active: bool,
    meta_title: String,
    meta_description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PortfolioRow> for PortfolioItem {
    fn from(row: PortfolioRow) -> Self {
        PortfolioItem {
            id: row.id,
            title: row.title,
            slug: row.slug,
            category: row.category,
            client: row.client,
            year: row.year,
            description: row.description,
            challenge: row.challenge,
            solution: row.solution,
            result: row.result,
            images: row.images.0,
            tags: row.tags.0,
            is_featured: row.is_featured,
            is_active: row.is_active,
            meta_title: row.meta_title,
            meta_description: row.meta_description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SERVICE_COLUMNS: &str = r#"
    id, title, slug, description, short_description, features, gallery, specifications,
    is_active, meta_title, meta_description, created_at, updated_at
"#;

const PORTFOLIO_COLUMNS: &str = r#"
    id, title, slug, category, client, year, description, challenge, solution, result,
    images, tags, is_featured, is_active, meta_title, meta_description, created_at, updated_at
"#;

// Every pattern in $2 has to hit at least one searchable column
const PORTFOLIO_FILTER: &str = r#"
    is_active = TRUE
    AND ($1::bool IS NULL OR is_featured = $1)
    AND NOT EXISTS (
        SELECT 1 FROM unnest($2::text[]) AS pattern
        WHERE NOT (title ILIKE pattern OR description ILIKE pattern OR client ILIKE pattern OR category ILIKE pattern)
    )
"#;

#[async_trait]
impl ShowcaseRepository for StoreShowcaseRepository {
    async fn list_services(&self, is_active: Option<bool>) -> RepoResult<Vec<Service>> {
        let sql = format!(
            "SELECT {} FROM services WHERE ($1::bool IS NULL OR is_active = $1) ORDER BY created_at DESC, slug",
            SERVICE_COLUMNS
        );
        let rows: Vec<ServiceRow> = sqlx::query_as(&sql)
            .bind(is_active)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Service::from).collect())
    }

    async fn get_service_by_slug(&self, slug: &str) -> RepoResult<Option<Service>> {
        let sql = format!("SELECT {} FROM services WHERE slug = $1", SERVICE_COLUMNS);
        let row: Option<ServiceRow> = sqlx::query_as(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Service::from))
    }

    async fn create_service(&self, service: &Service) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO services (
                id, title, slug, description, short_description, features, gallery, specifications,
                is_active, meta_title, meta_description, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(service.id)
        .bind(&service.title)
        .bind(&service.slug)
        .bind(&service.description)
        .bind(&service.short_description)
        .bind(Json(&service.features))
        .bind(Json(&service.gallery))
        .bind(Json(&service.specifications))
        .bind(service.is_active)
        .bind(&service.meta_title)
        .bind(&service.meta_description)
        .bind(service.created_at)
        .bind(service.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_duplicate(e, format!("service slug {} is taken", service.slug)))?;

        Ok(())
    }

    async fn list_portfolio(&self, query: &PortfolioQuery, page: PageRequest) -> RepoResult<Page<PortfolioItem>> {
        let patterns: Vec<String> = query
            .search
            .as_deref()
            .map(|search| search_terms(search).map(|term| like_pattern(&term)).collect())
            .unwrap_or_default();

        let count_sql = format!("SELECT COUNT(*) FROM portfolio_items WHERE {}", PORTFOLIO_FILTER);
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(query.featured)
            .bind(&patterns)
            .fetch_one(&self.pool)
            .await?;

        let list_sql = format!(
            "SELECT {} FROM portfolio_items WHERE {} ORDER BY {} LIMIT $3 OFFSET $4",
            PORTFOLIO_COLUMNS,
            PORTFOLIO_FILTER,
            query.ordering.order_by()
        );
        let rows: Vec<PortfolioRow> = sqlx::query_as(&list_sql)
            .bind(query.featured)
            .bind(&patterns)
            .bind(i64::from(page.page_size))
            .bind(i64::try_from(page.offset())?)
            .fetch_all(&self.pool)
            .await?;

        Ok(Page {
            items: rows.into_iter().map(PortfolioItem::from).collect(),
            total: u64::try_from(total)?,
        })
    }

    async fn get_portfolio_item(&self, slug: &str) -> RepoResult<Option<PortfolioItem>> {
        let sql = format!(
            "SELECT {} FROM portfolio_items WHERE slug = $1 AND is_active = TRUE",
            PORTFOLIO_COLUMNS
        );
        let row: Option<PortfolioRow> = sqlx::query_as(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(PortfolioItem::from))
    }

    async fn create_portfolio_item(&self, item: &PortfolioItem) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO portfolio_items (
                id, title, slug, category, client, year, description, challenge, solution, result,
                images, tags, is_featured, is_active, meta_title, meta_description, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            "#,
        )
        .bind(item.id)
        .bind(&item.title)
        .bind(&item.slug)
        .bind(&item.category)
        .bind(&item.client)
        .bind(item.year)
        .bind(&item.description)
        .bind(&item.challenge)
        .bind(&item.solution)
        .bind(&item.result)
        .bind(Json(&item.images))
        .bind(Json(&item.tags))
        .bind(item.is_featured)
        .bind(item.is_active)
        .bind(&item.meta_title)
        .bind(&item.meta_description)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_duplicate(e, format!("portfolio slug {} is taken", item.slug)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("labels"), "%labels%");
        assert_eq!(like_pattern("100%_off"), "%100\\%\\_off%");
    }
}
