use async_trait::async_trait;
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use rust_decimal::Decimal;
use daidi_catalog::{PaperType, PrintType, Product, ProductCategory};
use daidi_core::repository::{CatalogRepository, Page, PageRequest, ProductFilter, RepoResult};

pub struct StoreCatalogRepository {
    pool: PgPool,
}

impl StoreCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal structs for type-safe querying
#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: Uuid,
    name: String,
    slug: String,
    description: String,
    parent_id: Option<Uuid>,
    is_active: bool,
}

impl From<CategoryRow> for ProductCategory {
    fn from(row: CategoryRow) -> Self {
        ProductCategory {
            id: row.id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            parent_id: row.parent_id,
            is_active: row.is_active,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PaperRow {
    id: Uuid,
    name: String,
    slug: String,
    description: String,
    gram_weight: i32,
    price_per_sheet: Decimal,
    is_fancy: bool,
    texture: String,
    is_active: bool,
}

impl TryFrom<PaperRow> for PaperType {
    type Error = std::num::TryFromIntError;

    fn try_from(row: PaperRow) -> Result<Self, Self::Error> {
        Ok(PaperType {
            id: row.id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            gram_weight: u32::try_from(row.gram_weight)?,
            price_per_sheet: row.price_per_sheet,
            is_fancy: row.is_fancy,
            texture: row.texture,
            is_active: row.is_active,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    slug: String,
    category_id: Uuid,
    description: String,
    short_description: String,
    print_type: String,
    min_quantity: i32,
    max_quantity: i32,
    delivery_time_hours: i32,
    has_design_service: bool,
    has_online_calculator: bool,
    has_file_upload: bool,
    base_price: Decimal,
    price_per_extra: Option<Decimal>,
    paper_slugs: Vec<String>,
    is_active: bool,
    is_featured: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = std::num::TryFromIntError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Ok(Product {
            id: row.id,
            name: row.name,
            slug: row.slug,
            category_id: row.category_id,
            description: row.description,
            short_description: row.short_description,
            print_type: PrintType::parse(&row.print_type).unwrap_or_default(),
            min_quantity: u32::try_from(row.min_quantity)?,
            max_quantity: u32::try_from(row.max_quantity)?,
            delivery_time_hours: u32::try_from(row.delivery_time_hours)?,
            has_design_service: row.has_design_service,
            has_online_calculator: row.has_online_calculator,
            has_file_upload: row.has_file_upload,
            base_price: row.base_price,
            price_per_extra: row.price_per_extra,
            paper_slugs: row.paper_slugs,
            is_active: row.is_active,
            is_featured: row.is_featured,
            created_at: row.created_at,
        })
    }
}

const PRODUCT_COLUMNS: &str = r#"
    p.id, p.name, p.slug, p.category_id, p.description, p.short_description, p.print_type,
    p.min_quantity, p.max_quantity, p.delivery_time_hours,
    p.has_design_service, p.has_online_calculator, p.has_file_upload,
    p.base_price, p.price_per_extra,
    ARRAY(
        SELECT pt.slug FROM product_paper_types ppt
        JOIN paper_types pt ON pt.id = ppt.paper_type_id
        WHERE ppt.product_id = p.id
        ORDER BY ppt.is_default DESC, pt.slug
    ) AS paper_slugs,
    p.is_active, p.is_featured, p.created_at
"#;

const PRODUCT_FILTER: &str = r#"
    p.is_active = TRUE
    AND ($1::uuid IS NULL OR p.category_id = $1)
    AND ($2::bool IS NULL OR p.is_featured = $2)
"#;

#[async_trait]
impl CatalogRepository for StoreCatalogRepository {
    async fn list_categories(&self) -> RepoResult<Vec<ProductCategory>> {
        let rows: Vec<CategoryRow> = sqlx::query_as(
            "SELECT id, name, slug, description, parent_id, is_active FROM product_categories WHERE is_active = TRUE ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ProductCategory::from).collect())
    }

    async fn get_category_by_slug(&self, slug: &str) -> RepoResult<Option<ProductCategory>> {
        let row: Option<CategoryRow> = sqlx::query_as(
            "SELECT id, name, slug, description, parent_id, is_active FROM product_categories WHERE slug = $1 AND is_active = TRUE",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ProductCategory::from))
    }

    async fn list_products(&self, filter: &ProductFilter, page: PageRequest) -> RepoResult<Page<Product>> {
        let count_sql = format!("SELECT COUNT(*) FROM products p WHERE {}", PRODUCT_FILTER);
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(filter.category_id)
            .bind(filter.featured)
            .fetch_one(&self.pool)
            .await?;

        let list_sql = format!(
            "SELECT {} FROM products p WHERE {} ORDER BY p.created_at DESC, p.slug LIMIT $3 OFFSET $4",
            PRODUCT_COLUMNS, PRODUCT_FILTER
        );
        let rows: Vec<ProductRow> = sqlx::query_as(&list_sql)
            .bind(filter.category_id)
            .bind(filter.featured)
            .bind(i64::from(page.page_size))
            .bind(i64::try_from(page.offset())?)
            .fetch_all(&self.pool)
            .await?;

        let items = rows
            .into_iter()
            .map(Product::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page { items, total: u64::try_from(total)? })
    }

    async fn get_product(&self, id: Uuid) -> RepoResult<Option<Product>> {
        let sql = format!("SELECT {} FROM products p WHERE p.id = $1", PRODUCT_COLUMNS);
        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Product::try_from).transpose()?)
    }

    async fn get_product_by_slug(&self, slug: &str) -> RepoResult<Option<Product>> {
        let sql = format!("SELECT {} FROM products p WHERE p.slug = $1 AND p.is_active = TRUE", PRODUCT_COLUMNS);
        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Product::try_from).transpose()?)
    }

    async fn list_papers(&self) -> RepoResult<Vec<PaperType>> {
        let rows: Vec<PaperRow> = sqlx::query_as(
            "SELECT id, name, slug, description, gram_weight, price_per_sheet, is_fancy, texture, is_active FROM paper_types WHERE is_active = TRUE ORDER BY gram_weight, name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(PaperType::try_from)
            .collect::<Result<Vec<_>, _>>()?)
    }
}
