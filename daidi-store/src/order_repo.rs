use async_trait::async_trait;
use uuid::Uuid;
use sqlx::PgPool;
use sqlx::types::Json;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use daidi_catalog::PriceBreakdown;
use daidi_core::repository::{OrderRepository, RepoResult};
use daidi_order::{ContactInfo, DeliveryInfo, Order, OrderItem, OrderStatus};
use crate::StoreError;

pub struct StoreOrderRepository {
    pool: PgPool,
}

impl StoreOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_items(&self, order_id: Uuid) -> RepoResult<Vec<OrderItem>> {
        let rows: Vec<OrderItemRow> = sqlx::query_as(
            r#"
            SELECT id, product_id, product_name, quantity, unit_price, total_price, paper_type,
                   include_design, has_lamination, has_uv_coating, special_instructions, breakdown
            FROM order_items WHERE order_id = $1 ORDER BY position
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(OrderItem::try_from)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn hydrate(&self, row: OrderRow) -> RepoResult<Order> {
        let items = self.load_items(row.id).await?;
        let mut order = Order::try_from(row)?;
        order.items = items;
        Ok(order)
    }
}

// Internal structs for type-safe querying
#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    order_number: String,
    customer_id: String,
    status: String,
    contact_name: String,
    contact_phone: String,
    contact_email: String,
    delivery_address: String,
    delivery_city: String,
    delivery_postal_code: Option<String>,
    delivery_method: String,
    delivery_date: Option<NaiveDate>,
    urgent_order: bool,
    subtotal: Decimal,
    discount_amount: Decimal,
    delivery_cost: Decimal,
    total_amount: Decimal,
    customer_notes: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = StoreError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = OrderStatus::parse(&row.status)
            .ok_or_else(|| StoreError::Corrupt(format!("unknown order status '{}'", row.status)))?;

        Ok(Order {
            id: row.id,
            order_number: row.order_number,
            customer_id: row.customer_id,
            status,
            contact: ContactInfo {
                name: row.contact_name,
                phone: row.contact_phone.into(),
                email: row.contact_email.into(),
            },
            delivery: DeliveryInfo {
                address: row.delivery_address,
                city: row.delivery_city,
                postal_code: row.delivery_postal_code,
                method: row.delivery_method,
                delivery_date: row.delivery_date,
                urgent: row.urgent_order,
            },
            items: Vec::new(),
            subtotal: row.subtotal,
            discount_amount: row.discount_amount,
            delivery_cost: row.delivery_cost,
            total_amount: row.total_amount,
            customer_notes: row.customer_notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: Uuid,
    product_id: Uuid,
    product_name: String,
    quantity: i32,
    unit_price: Decimal,
    total_price: Decimal,
    paper_type: Option<String>,
    include_design: bool,
    has_lamination: bool,
    has_uv_coating: bool,
    special_instructions: String,
    breakdown: Json<PriceBreakdown>,
}

impl TryFrom<OrderItemRow> for OrderItem {
    type Error = StoreError;

    fn try_from(row: OrderItemRow) -> Result<Self, Self::Error> {
        let quantity = u32::try_from(row.quantity)
            .map_err(|_| StoreError::Corrupt(format!("negative quantity on item {}", row.id)))?;

        Ok(OrderItem {
            id: row.id,
            product_id: row.product_id,
            product_name: row.product_name,
            quantity,
            unit_price: row.unit_price,
            total_price: row.total_price,
            paper_type: row.paper_type,
            include_design: row.include_design,
            has_lamination: row.has_lamination,
            has_uv_coating: row.has_uv_coating,
            special_instructions: row.special_instructions,
            breakdown: row.breakdown.0,
        })
    }
}

const ORDER_COLUMNS: &str = r#"
    id, order_number, customer_id, status,
    contact_name, contact_phone, contact_email,
    delivery_address, delivery_city, delivery_postal_code, delivery_method, delivery_date, urgent_order,
    subtotal, discount_amount, delivery_cost, total_amount, customer_notes, created_at, updated_at
"#;

#[async_trait]
impl OrderRepository for StoreOrderRepository {
    async fn create_order(&self, order: &Order) -> RepoResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, order_number, customer_id, status,
                contact_name, contact_phone, contact_email,
                delivery_address, delivery_city, delivery_postal_code, delivery_method, delivery_date, urgent_order,
                subtotal, discount_amount, delivery_cost, total_amount, customer_notes, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
            "#,
        )
        .bind(order.id)
        .bind(&order.order_number)
        .bind(&order.customer_id)
        .bind(order.status.as_str())
        .bind(&order.contact.name)
        .bind(order.contact.phone.expose())
        .bind(order.contact.email.expose())
        .bind(&order.delivery.address)
        .bind(&order.delivery.city)
        .bind(&order.delivery.postal_code)
        .bind(&order.delivery.method)
        .bind(order.delivery.delivery_date)
        .bind(order.delivery.urgent)
        .bind(order.subtotal)
        .bind(order.discount_amount)
        .bind(order.delivery_cost)
        .bind(order.total_amount)
        .bind(&order.customer_notes)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await?;

        for (position, item) in order.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_items (
                    id, order_id, position, product_id, product_name, quantity, unit_price, total_price,
                    paper_type, include_design, has_lamination, has_uv_coating, special_instructions, breakdown
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
                "#,
            )
            .bind(item.id)
            .bind(order.id)
            .bind(i32::try_from(position)?)
            .bind(item.product_id)
            .bind(&item.product_name)
            .bind(i32::try_from(item.quantity)?)
            .bind(item.unit_price)
            .bind(item.total_price)
            .bind(&item.paper_type)
            .bind(item.include_design)
            .bind(item.has_lamination)
            .bind(item.has_uv_coating)
            .bind(&item.special_instructions)
            .bind(Json(&item.breakdown))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    async fn get_order(&self, id: Uuid) -> RepoResult<Option<Order>> {
        let sql = format!("SELECT {} FROM orders WHERE id = $1", ORDER_COLUMNS);
        let row: Option<OrderRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    async fn list_orders(&self, customer_id: &str) -> RepoResult<Vec<Order>> {
        let sql = format!(
            "SELECT {} FROM orders WHERE customer_id = $1 ORDER BY created_at DESC",
            ORDER_COLUMNS
        );
        let rows: Vec<OrderRow> = sqlx::query_as(&sql)
            .bind(customer_id)
            .fetch_all(&self.pool)
            .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            orders.push(self.hydrate(row).await?);
        }
        Ok(orders)
    }

    async fn update_order_status(&self, id: Uuid, from: OrderStatus, to: OrderStatus) -> RepoResult<()> {
        let result = sqlx::query(
            "UPDATE orders SET status = $1, updated_at = NOW() WHERE id = $2 AND status = $3",
        )
        .bind(to.as_str())
        .bind(id)
        .bind(from.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM orders WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
            if exists {
                return Err(StoreError::Conflict(format!("order {} is no longer {}", id, from)).into());
            }
            return Err(StoreError::NotFound(format!("order {}", id)).into());
        }
        Ok(())
    }
}
