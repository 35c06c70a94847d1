use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use daidi_catalog::{PriceBreakdown, PriceOptions, PriceQuote, Product};
use daidi_shared::models::{OrderPlacedEvent, OrderStatusChangedEvent};
use daidi_shared::{Masked, Money};
use crate::manager::OrderError;

/// Order status in the lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(OrderStatus::Pending),
            "confirmed" => Some(OrderStatus::Confirmed),
            "processing" => Some(OrderStatus::Processing),
            "shipped" => Some(OrderStatus::Shipped),
            "delivered" => Some(OrderStatus::Delivered),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    /// Only orders nobody has started working on can be cancelled.
    pub fn is_cancellable(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Confirmed)
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        match (self, next) {
            (Pending, Confirmed)
            | (Confirmed, Processing)
            | (Processing, Shipped)
            | (Shipped, Delivered) => true,
            (from, Cancelled) => from.is_cancellable(),
            _ => false,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContactInfo {
    pub name: String,
    pub phone: Masked<String>,
    pub email: Masked<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeliveryInfo {
    pub address: String,
    pub city: String,
    pub postal_code: Option<String>,
    #[serde(default = "default_delivery_method")]
    pub method: String,
    pub delivery_date: Option<NaiveDate>,
    #[serde(default)]
    pub urgent: bool,
}

pub fn default_delivery_method() -> String {
    "courier".to_string()
}

/// A customer's print order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub customer_id: String,
    pub status: OrderStatus,
    pub contact: ContactInfo,
    pub delivery: DeliveryInfo,
    pub items: Vec<OrderItem>,
    pub subtotal: Money,
    pub discount_amount: Money,
    pub delivery_cost: Money,
    pub total_amount: Money,
    pub customer_notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `ORD-` followed by eight upper-case hex digits
pub fn generate_order_number() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("ORD-{}", hex[..8].to_uppercase())
}

impl Order {
    pub fn new(customer_id: String, contact: ContactInfo, delivery: DeliveryInfo) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            order_number: generate_order_number(),
            customer_id,
            status: OrderStatus::Pending,
            contact,
            delivery,
            items: Vec::new(),
            subtotal: Decimal::ZERO,
            discount_amount: Decimal::ZERO,
            delivery_cost: Decimal::ZERO,
            total_amount: Decimal::ZERO,
            customer_notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Add an item and refresh the totals
    pub fn add_item(&mut self, item: OrderItem) -> Result<(), OrderError> {
        self.items.push(item);
        self.recalculate_totals()
    }

    pub fn set_adjustments(&mut self, discount_amount: Money, delivery_cost: Money) -> Result<(), OrderError> {
        if discount_amount.is_sign_negative() || delivery_cost.is_sign_negative() {
            return Err(OrderError::InvalidAmount("discount and delivery cost must not be negative".to_string()));
        }
        self.discount_amount = discount_amount;
        self.delivery_cost = delivery_cost;
        self.recalculate_totals()
    }

    /// `total = subtotal - discount + delivery_cost`, never below zero
    pub fn recalculate_totals(&mut self) -> Result<(), OrderError> {
        let subtotal: Money = self.items.iter().map(|item| item.total_price).sum();
        let total = subtotal - self.discount_amount + self.delivery_cost;

        if total.is_sign_negative() {
            return Err(OrderError::InvalidAmount(format!(
                "discount {} exceeds order value {}",
                self.discount_amount,
                subtotal + self.delivery_cost
            )));
        }

        self.subtotal = subtotal;
        self.total_amount = total;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Move the order to `next`, returning the previous status.
    pub fn transition(&mut self, next: OrderStatus) -> Result<OrderStatus, OrderError> {
        if !self.status.can_transition_to(next) {
            return Err(OrderError::InvalidTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }

        let previous = self.status;
        self.status = next;
        self.updated_at = Utc::now();
        Ok(previous)
    }

    pub fn cancel(&mut self) -> Result<OrderStatus, OrderError> {
        self.transition(OrderStatus::Cancelled)
    }

    pub fn is_owned_by(&self, customer_id: &str) -> bool {
        self.customer_id == customer_id
    }

    pub fn placed_event(&self) -> OrderPlacedEvent {
        OrderPlacedEvent {
            order_id: self.id,
            order_number: self.order_number.clone(),
            customer_id: self.customer_id.clone(),
            item_count: self.items.len(),
            total_amount: self.total_amount,
            urgent: self.delivery.urgent,
            timestamp: self.created_at.timestamp(),
        }
    }

    pub fn status_changed_event(&self, from: OrderStatus, changed_by: &str) -> OrderStatusChangedEvent {
        OrderStatusChangedEvent {
            order_id: self.id,
            order_number: self.order_number.clone(),
            from: from.to_string(),
            to: self.status.to_string(),
            changed_by: changed_by.to_string(),
            timestamp: self.updated_at.timestamp(),
        }
    }
}

/// One priced product line of an order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub total_price: Money,
    pub paper_type: Option<String>,
    pub include_design: bool,
    pub has_lamination: bool,
    pub has_uv_coating: bool,
    pub special_instructions: String,
    pub breakdown: PriceBreakdown,
}

impl OrderItem {
    pub fn from_quote(
        product: &Product,
        quote: &PriceQuote,
        options: &PriceOptions,
        paper_type: Option<String>,
        special_instructions: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            product_id: product.id,
            product_name: product.name.clone(),
            quantity: quote.quantity,
            unit_price: quote.unit_price,
            total_price: quote.total_price,
            paper_type,
            include_design: options.include_design,
            has_lamination: options.lamination,
            has_uv_coating: options.uv_coating,
            special_instructions,
            breakdown: quote.breakdown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_number_format() {
        let number = generate_order_number();
        assert_eq!(number.len(), 12);
        assert!(number.starts_with("ORD-"));
        assert!(number[4..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
    }

    #[test]
    fn test_status_transitions() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(Processing));
        assert!(Shipped.can_transition_to(Delivered));
        assert!(!Pending.can_transition_to(Shipped));
        assert!(!Delivered.can_transition_to(Pending));

        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Cancelled));
        assert!(!Processing.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Cancelled));
    }

    #[test]
    fn test_status_names() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(serde_json::to_string(&OrderStatus::Processing).unwrap(), "\"processing\"");
    }
}
