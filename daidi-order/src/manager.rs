use std::sync::Arc;
use daidi_catalog::{PriceOptions, PricingEngine, PricingError, Product};
use daidi_shared::Money;
use crate::models::{ContactInfo, DeliveryInfo, Order, OrderItem};

/// A product line as requested by the customer, before pricing
#[derive(Debug, Clone)]
pub struct OrderLine {
    pub product: Product,
    pub quantity: u32,
    pub options: PriceOptions,
    /// The paper tag or slug as the customer sent it
    pub paper_type: Option<String>,
    pub special_instructions: String,
}

/// Everything needed to place an order besides the lines
#[derive(Debug, Clone)]
pub struct OrderRequest {
    pub customer_id: String,
    pub contact: ContactInfo,
    pub delivery: DeliveryInfo,
    pub customer_notes: String,
    pub discount_amount: Money,
    pub delivery_cost: Money,
}

/// Builds priced orders from customer requests
pub struct OrderManager {
    engine: Arc<PricingEngine>,
}

impl OrderManager {
    pub fn new(engine: Arc<PricingEngine>) -> Self {
        Self { engine }
    }

    /// Price every line and assemble a pending order.
    ///
    /// The order is all-or-nothing: one unpriceable line rejects the whole request.
    pub fn place_order(&self, request: OrderRequest, lines: Vec<OrderLine>) -> Result<Order, OrderError> {
        if lines.is_empty() {
            return Err(OrderError::EmptyOrder);
        }

        let mut order = Order::new(request.customer_id, request.contact, request.delivery);
        order.customer_notes = request.customer_notes;

        for line in lines {
            if !line.product.is_active {
                return Err(OrderError::InactiveProduct(line.product.slug.clone()));
            }

            let quote = self
                .engine
                .quote(&line.product, line.quantity, &line.options)
                .map_err(|source| OrderError::Pricing {
                    product: line.product.slug.clone(),
                    source,
                })?;

            order.add_item(OrderItem::from_quote(
                &line.product,
                &quote,
                &line.options,
                line.paper_type,
                line.special_instructions,
            ))?;
        }

        order.set_adjustments(request.discount_amount, request.delivery_cost)?;

        tracing::info!(
            order_number = %order.order_number,
            items = order.items.len(),
            total = %order.total_amount,
            "Order priced"
        );
        Ok(order)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition {
        from: String,
        to: String,
    },

    #[error("Order must contain at least one item")]
    EmptyOrder,

    #[error("Product is not available: {0}")]
    InactiveProduct(String),

    #[error("Cannot price {product}: {source}")]
    Pricing {
        product: String,
        #[source]
        source: PricingError,
    },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderStatus;
    use daidi_catalog::{PaperKind, PrintType};
    use daidi_shared::Masked;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn manager() -> OrderManager {
        OrderManager::new(Arc::new(PricingEngine::default()))
    }

    fn product(slug: &str, base: Money, min: u32, per_extra: Option<Money>) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: slug.replace('-', " "),
            slug: slug.to_string(),
            category_id: Uuid::new_v4(),
            description: String::new(),
            short_description: String::new(),
            print_type: PrintType::Digital,
            min_quantity: min,
            max_quantity: 5000,
            delivery_time_hours: 24,
            has_design_service: true,
            has_online_calculator: true,
            has_file_upload: true,
            base_price: base,
            price_per_extra: per_extra,
            paper_slugs: Vec::new(),
            is_active: true,
            is_featured: false,
            created_at: chrono::Utc::now(),
        }
    }

    fn request() -> OrderRequest {
        OrderRequest {
            customer_id: "customer-1".to_string(),
            contact: ContactInfo {
                name: "Sara Ahmadi".to_string(),
                phone: Masked::new("09121234567".to_string()),
                email: Masked::new("sara@example.com".to_string()),
            },
            delivery: DeliveryInfo {
                address: "Valiasr St. 12".to_string(),
                city: "Tehran".to_string(),
                postal_code: Some("1234567890".to_string()),
                method: "courier".to_string(),
                delivery_date: None,
                urgent: false,
            },
            customer_notes: String::new(),
            discount_amount: Decimal::ZERO,
            delivery_cost: Decimal::ZERO,
        }
    }

    fn line(product: Product, quantity: u32, options: PriceOptions) -> OrderLine {
        OrderLine {
            product,
            quantity,
            options,
            paper_type: None,
            special_instructions: String::new(),
        }
    }

    #[test]
    fn test_place_order_prices_each_line() {
        let labels = product("label-digital-normal", dec!(15000), 10, Some(dec!(1200)));
        let cards = product("business-card", dec!(1000), 100, None);
        let fancy = PriceOptions { paper: PaperKind::Fancy, ..PriceOptions::default() };

        let order = manager()
            .place_order(request(), vec![
                line(labels, 50, PriceOptions::default()),
                line(cards, 200, fancy),
            ])
            .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].total_price, dec!(63000));
        // 700 discounted + 200 * 150 fancy paper
        assert_eq!(order.items[1].total_price, dec!(30700));
        assert_eq!(order.subtotal, dec!(93700));
        assert_eq!(order.total_amount, dec!(93700));
    }

    #[test]
    fn test_totals_include_adjustments() {
        let labels = product("label-digital-normal", dec!(15000), 10, Some(dec!(1200)));
        let mut req = request();
        req.discount_amount = dec!(3000);
        req.delivery_cost = dec!(25000);

        let order = manager()
            .place_order(req, vec![line(labels, 10, PriceOptions::default())])
            .unwrap();

        assert_eq!(order.subtotal, dec!(15000));
        assert_eq!(order.total_amount, dec!(37000));
    }

    #[test]
    fn test_excessive_discount_is_rejected() {
        let labels = product("label-digital-normal", dec!(15000), 10, Some(dec!(1200)));
        let mut req = request();
        req.discount_amount = dec!(20000);

        let result = manager().place_order(req, vec![line(labels, 10, PriceOptions::default())]);
        assert!(matches!(result, Err(OrderError::InvalidAmount(_))));
    }

    #[test]
    fn test_rejects_empty_and_invalid_lines() {
        assert!(matches!(manager().place_order(request(), vec![]), Err(OrderError::EmptyOrder)));

        let labels = product("label-digital-normal", dec!(15000), 10, Some(dec!(1200)));
        let result = manager().place_order(request(), vec![line(labels.clone(), 5, PriceOptions::default())]);
        assert!(matches!(
            result,
            Err(OrderError::Pricing { source: PricingError::QuantityOutOfRange { .. }, .. })
        ));

        let mut retired = labels;
        retired.is_active = false;
        let result = manager().place_order(request(), vec![line(retired, 10, PriceOptions::default())]);
        assert!(matches!(result, Err(OrderError::InactiveProduct(_))));
    }

    #[test]
    fn test_order_lifecycle() {
        let labels = product("label-digital-normal", dec!(15000), 10, None);
        let mut order = manager()
            .place_order(request(), vec![line(labels, 10, PriceOptions::default())])
            .unwrap();

        assert_eq!(order.transition(OrderStatus::Confirmed).unwrap(), OrderStatus::Pending);
        order.transition(OrderStatus::Processing).unwrap();
        order.transition(OrderStatus::Shipped).unwrap();

        let event = order.status_changed_event(OrderStatus::Processing, "staff-1");
        assert_eq!(event.from, "processing");
        assert_eq!(event.to, "shipped");

        order.transition(OrderStatus::Delivered).unwrap();
        assert_eq!(order.status, OrderStatus::Delivered);
    }

    #[test]
    fn test_cancel_only_before_processing() {
        let labels = product("label-digital-normal", dec!(15000), 10, None);
        let mut order = manager()
            .place_order(request(), vec![line(labels, 10, PriceOptions::default())])
            .unwrap();

        order.transition(OrderStatus::Confirmed).unwrap();
        order.transition(OrderStatus::Processing).unwrap();

        let result = order.cancel();
        assert!(matches!(result, Err(OrderError::InvalidTransition { .. })));
        assert_eq!(order.status, OrderStatus::Processing);
    }

    #[test]
    fn test_placed_event_carries_totals() {
        let labels = product("label-digital-normal", dec!(15000), 10, Some(dec!(1200)));
        let order = manager()
            .place_order(request(), vec![line(labels, 20, PriceOptions::default())])
            .unwrap();

        let event = order.placed_event();
        assert_eq!(event.order_number, order.order_number);
        assert_eq!(event.item_count, 1);
        assert_eq!(event.total_amount, dec!(27000));
    }
}
