use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;
use rust_decimal::Decimal;
use daidi_core::validators::{validate_email, validate_iranian_phone, validate_not_empty, validate_postal_code};
use daidi_core::{Permission, Principal};
use daidi_order::{ContactInfo, DeliveryInfo, Order, OrderLine, OrderRequest, OrderStatus};
use daidi_shared::models::DomainEvent;
use crate::products::{find_product, price_options, requested_quantity};
use crate::{error::AppError, state::AppState};

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ContactInput {
    pub name: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct OrderItemInput {
    pub product_id: Uuid,
    pub quantity: i64,
    #[serde(default)]
    pub include_design: bool,
    #[serde(default)]
    pub lamination: bool,
    #[serde(default)]
    pub uv_coating: bool,
    #[serde(default)]
    pub paper_type: Option<String>,
    #[serde(default)]
    pub special_instructions: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub contact: ContactInput,
    pub delivery: DeliveryInfo,
    #[serde(default)]
    pub customer_notes: String,
    pub items: Vec<OrderItemInput>,
}

#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    pub customer_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/orders", post(create_order).get(list_orders))
        .route("/v1/orders/{id}", get(get_order))
        .route("/v1/orders/{id}/cancel", post(cancel_order))
        .route("/v1/orders/{id}/status", post(update_status))
}

// ============================================================================
// Helpers
// ============================================================================

fn validate_contact(contact: &ContactInput, delivery: &DeliveryInfo) -> Result<(), AppError> {
    validate_not_empty("contact.name", &contact.name)?;
    validate_iranian_phone(&contact.phone)?;
    validate_email(&contact.email)?;
    validate_not_empty("delivery.address", &delivery.address)?;
    validate_not_empty("delivery.city", &delivery.city)?;
    if let Some(postal_code) = delivery.postal_code.as_deref().filter(|c| !c.is_empty()) {
        validate_postal_code(postal_code)?;
    }
    Ok(())
}

/// Staff permission needed to move an order into `status`
fn required_permission(status: OrderStatus) -> Option<Permission> {
    match status {
        OrderStatus::Confirmed => Some(Permission::CanApproveOrder),
        OrderStatus::Processing => Some(Permission::CanPackOrder),
        OrderStatus::Shipped => Some(Permission::CanShipOrder),
        OrderStatus::Delivered => Some(Permission::CanDeliverOrder),
        OrderStatus::Cancelled => Some(Permission::CanCancelOrder),
        OrderStatus::Pending => None,
    }
}

/// Load an order the caller may see. Other customers' orders read as missing.
async fn visible_order(state: &AppState, principal: &Principal, id: Uuid) -> Result<Order, AppError> {
    let not_found = || AppError::NotFoundError(format!("Order {} not found", id));

    let order = state.orders.get_order(id).await?.ok_or_else(not_found)?;
    if order.is_owned_by(&principal.user_id) || principal.has_permission(Permission::CanReadCustomer) {
        Ok(order)
    } else {
        Err(not_found())
    }
}

async fn apply_transition(
    state: &AppState,
    principal: &Principal,
    mut order: Order,
    next: OrderStatus,
) -> Result<Order, AppError> {
    let previous = order.transition(next)?;
    state.orders.update_order_status(order.id, previous, order.status).await?;

    tracing::info!(
        order_number = %order.order_number,
        from = %previous,
        to = %order.status,
        by = %principal.user_id,
        "Order status changed"
    );
    state.events.publish(DomainEvent::OrderStatusChanged(
        order.status_changed_event(previous, &principal.user_id),
    ));
    Ok(order)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /v1/orders
async fn create_order(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    validate_contact(&req.contact, &req.delivery)?;

    let mut lines = Vec::with_capacity(req.items.len());
    for item in req.items {
        let product = find_product(&state, &item.product_id.to_string()).await?;
        let options = price_options(
            &state,
            &product,
            item.include_design,
            item.lamination,
            item.uv_coating,
            item.paper_type.as_deref(),
        )
        .await?;

        lines.push(OrderLine {
            product,
            quantity: requested_quantity(item.quantity),
            options,
            paper_type: item.paper_type.filter(|p| !p.is_empty()),
            special_instructions: item.special_instructions,
        });
    }

    let request = OrderRequest {
        customer_id: principal.user_id.clone(),
        contact: ContactInfo {
            name: req.contact.name.trim().to_string(),
            phone: req.contact.phone.into(),
            email: req.contact.email.trim().to_lowercase().into(),
        },
        delivery: req.delivery,
        customer_notes: req.customer_notes,
        discount_amount: Decimal::ZERO,
        delivery_cost: Decimal::ZERO,
    };

    let order = state.order_manager.place_order(request, lines)?;
    state.orders.create_order(&order).await?;

    tracing::info!(order_number = %order.order_number, customer = %order.customer_id, "Order placed");
    state.events.publish(DomainEvent::OrderPlaced(order.placed_event()));

    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /v1/orders
async fn list_orders(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<Vec<Order>>, AppError> {
    let customer_id = match query.customer_id {
        Some(customer_id) if customer_id != principal.user_id => {
            if !principal.has_permission(Permission::CanReadCustomer) {
                return Err(AppError::AuthorizationError(format!("Missing permission {}", Permission::CanReadCustomer)));
            }
            customer_id
        }
        _ => principal.user_id.clone(),
    };

    Ok(Json(state.orders.list_orders(&customer_id).await?))
}

/// GET /v1/orders/{id}
async fn get_order(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, AppError> {
    Ok(Json(visible_order(&state, &principal, id).await?))
}

/// POST /v1/orders/{id}/cancel
async fn cancel_order(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, AppError> {
    let order = state
        .orders
        .get_order(id)
        .await?
        .filter(|o| o.is_owned_by(&principal.user_id) || principal.has_permission(Permission::CanCancelOrder))
        .ok_or_else(|| AppError::NotFoundError(format!("Order {} not found", id)))?;

    Ok(Json(apply_transition(&state, &principal, order, OrderStatus::Cancelled).await?))
}

/// POST /v1/orders/{id}/status
async fn update_status(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<Order>, AppError> {
    let next = OrderStatus::parse(&req.status)
        .ok_or_else(|| AppError::ValidationError(format!("Unknown order status '{}'", req.status)))?;

    let permission = required_permission(next)
        .ok_or_else(|| AppError::ValidationError("Orders cannot be moved back to pending".to_string()))?;
    if !principal.has_permission(permission) {
        return Err(AppError::AuthorizationError(format!("Missing permission {}", permission)));
    }

    let order = state
        .orders
        .get_order(id)
        .await?
        .ok_or_else(|| AppError::NotFoundError(format!("Order {} not found", id)))?;
    Ok(Json(apply_transition(&state, &principal, order, next).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact() -> ContactInput {
        ContactInput {
            name: "Sara".to_string(),
            phone: "09121234567".to_string(),
            email: "sara@example.com".to_string(),
        }
    }

    fn delivery(postal_code: Option<&str>) -> DeliveryInfo {
        DeliveryInfo {
            address: "12 Valiasr St".to_string(),
            city: "Tehran".to_string(),
            postal_code: postal_code.map(str::to_string),
            method: "courier".to_string(),
            delivery_date: None,
            urgent: false,
        }
    }

    #[test]
    fn test_contact_validation() {
        assert!(validate_contact(&contact(), &delivery(None)).is_ok());
        assert!(validate_contact(&contact(), &delivery(Some("1234567890"))).is_ok());
        assert!(validate_contact(&contact(), &delivery(Some("12345"))).is_err());

        let mut bad_phone = contact();
        bad_phone.phone = "02112345678".to_string();
        assert!(validate_contact(&bad_phone, &delivery(None)).is_err());
    }

    #[test]
    fn test_status_permissions() {
        assert_eq!(required_permission(OrderStatus::Shipped), Some(Permission::CanShipOrder));
        assert_eq!(required_permission(OrderStatus::Pending), None);
    }
}
