use serde::{Deserialize, Serialize};
use rust_decimal::Decimal;
use daidi_shared::{round_currency, Money};
use crate::product::Product;

/// Price schedule of a single product
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ProductPricing {
    /// Price at `min_quantity`
    pub base_price: Money,
    pub min_quantity: u32,
    pub max_quantity: u32,
    /// Price per unit above `min_quantity`. Without it the volume discount applies.
    pub price_per_extra: Option<Money>,
}

/// Paper class as far as pricing is concerned
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaperKind {
    #[default]
    Standard,
    Fancy,
}

impl PaperKind {
    pub fn from_tag(tag: &str) -> Self {
        if tag == "fancy" {
            PaperKind::Fancy
        } else {
            PaperKind::Standard
        }
    }
}

/// Optional finishing services of an order line
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PriceOptions {
    /// Flat design fee, independent of quantity
    pub include_design: bool,
    /// Per-unit lamination surcharge
    pub lamination: bool,
    /// Per-unit UV coating surcharge
    pub uv_coating: bool,
    /// Fancy paper adds a per-unit surcharge
    pub paper: PaperKind,
}

/// Surcharge constants and discount policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Flat fee for the design service
    #[serde(default = "default_design_fee")]
    pub design_fee: Money,

    #[serde(default = "default_lamination_unit_cost")]
    pub lamination_unit_cost: Money,

    #[serde(default = "default_uv_unit_cost")]
    pub uv_unit_cost: Money,

    #[serde(default = "default_fancy_paper_unit_cost")]
    pub fancy_paper_unit_cost: Money,

    /// Discount per extra unit when the product has no `price_per_extra`
    #[serde(default = "default_volume_discount_step")]
    pub volume_discount_step: Decimal,

    #[serde(default = "default_max_volume_discount")]
    pub max_volume_discount: Decimal,

    /// Decimal places of the shop currency
    #[serde(default)]
    pub currency_scale: u32,
}

fn default_design_fee() -> Money { Decimal::from(50_000) }
fn default_lamination_unit_cost() -> Money { Decimal::from(200) }
fn default_uv_unit_cost() -> Money { Decimal::from(300) }
fn default_fancy_paper_unit_cost() -> Money { Decimal::from(150) }
fn default_volume_discount_step() -> Decimal { Decimal::new(2, 2) }
fn default_max_volume_discount() -> Decimal { Decimal::new(30, 2) }

/// Largest supported number of currency decimal places
pub const MAX_CURRENCY_SCALE: u32 = 4;

impl PricingConfig {
    /// Reject settings that could push a price below zero.
    pub fn validate(&self) -> Result<(), PricingError> {
        let costs = [
            ("design_fee", self.design_fee),
            ("lamination_unit_cost", self.lamination_unit_cost),
            ("uv_unit_cost", self.uv_unit_cost),
            ("fancy_paper_unit_cost", self.fancy_paper_unit_cost),
            ("volume_discount_step", self.volume_discount_step),
        ];
        if let Some((name, value)) = costs.iter().find(|(_, value)| value.is_sign_negative()) {
            return Err(PricingError::InvalidConfig(format!("{} must not be negative, got {}", name, value)));
        }

        if self.max_volume_discount.is_sign_negative() || self.max_volume_discount > Decimal::ONE {
            return Err(PricingError::InvalidConfig(format!(
                "max_volume_discount must be between 0 and 1, got {}",
                self.max_volume_discount
            )));
        }

        if self.currency_scale > MAX_CURRENCY_SCALE {
            return Err(PricingError::InvalidConfig(format!(
                "currency_scale must be at most {}, got {}",
                MAX_CURRENCY_SCALE, self.currency_scale
            )));
        }

        Ok(())
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            design_fee: default_design_fee(),
            lamination_unit_cost: default_lamination_unit_cost(),
            uv_unit_cost: default_uv_unit_cost(),
            fancy_paper_unit_cost: default_fancy_paper_unit_cost(),
            volume_discount_step: default_volume_discount_step(),
            max_volume_discount: default_max_volume_discount(),
            currency_scale: 0,
        }
    }
}

/// Contribution of each pricing component to a total
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct PriceBreakdown {
    pub base: Money,
    /// Extra-unit charge (positive) or volume discount (negative)
    pub volume_adjustment: Money,
    pub design: Money,
    pub lamination: Money,
    pub uv_coating: Money,
    pub paper: Money,
}

impl PriceBreakdown {
    pub fn surcharges(&self) -> Money {
        self.design + self.lamination + self.uv_coating + self.paper
    }

    pub fn total(&self) -> Money {
        self.base + self.volume_adjustment + self.surcharges()
    }
}

/// Result of pricing one order line
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PriceQuote {
    pub quantity: u32,
    pub unit_price: Money,
    pub total_price: Money,
    pub breakdown: PriceBreakdown,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PricingError {
    #[error("Quantity must be at least 1")]
    InvalidQuantity,

    #[error("Quantity {quantity} is outside the allowed range {min}-{max}")]
    QuantityOutOfRange { quantity: u32, min: u32, max: u32 },

    #[error("Online price calculation is not available for this product")]
    CalculatorDisabled,

    #[error("Design service is not offered for this product")]
    DesignServiceUnavailable,

    #[error("Invalid pricing configuration: {0}")]
    InvalidConfig(String),
}

/// Order-line price calculator.
///
/// Stateless apart from its configuration; share it behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    config: PricingConfig,
}

impl PricingEngine {
    pub fn new(config: PricingConfig) -> Result<Self, PricingError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Fraction taken off the base price for `extra_units` when the product
    /// has no per-extra price. Capped at `max_volume_discount`.
    pub fn volume_discount_rate(&self, extra_units: u32) -> Decimal {
        let rate = self.config.volume_discount_step * Decimal::from(extra_units);
        rate.min(self.config.max_volume_discount)
    }

    /// Price an order line. Does not check quantity bounds, see [`Self::quote`].
    ///
    /// Without `price_per_extra` the discounted total can drop below the
    /// price of a smaller quantity. That matches the shop's current price
    /// list and is kept as is.
    pub fn calculate(&self, pricing: &ProductPricing, quantity: u32, options: &PriceOptions) -> PriceQuote {
        let scale = self.config.currency_scale;
        let units = Decimal::from(quantity);

        let mut breakdown = PriceBreakdown {
            base: pricing.base_price,
            ..PriceBreakdown::default()
        };

        if quantity > pricing.min_quantity {
            let extra_units = quantity - pricing.min_quantity;
            match pricing.price_per_extra {
                // A zero per-extra price counts as unset
                Some(per_extra) if !per_extra.is_zero() => {
                    breakdown.volume_adjustment = Decimal::from(extra_units) * per_extra;
                }
                _ => {
                    let rate = self.volume_discount_rate(extra_units);
                    let discounted = pricing.base_price * (Decimal::ONE - rate);
                    breakdown.volume_adjustment = round_currency(discounted - pricing.base_price, scale);
                }
            }
        }

        if options.include_design {
            breakdown.design = self.config.design_fee;
        }
        if options.lamination {
            breakdown.lamination = units * self.config.lamination_unit_cost;
        }
        if options.uv_coating {
            breakdown.uv_coating = units * self.config.uv_unit_cost;
        }
        if options.paper == PaperKind::Fancy {
            breakdown.paper = units * self.config.fancy_paper_unit_cost;
        }

        let total_price = round_currency(breakdown.total(), scale);
        let unit_price = total_price
            .checked_div(units)
            .map(|p| round_currency(p, scale))
            .unwrap_or(Decimal::ZERO);

        PriceQuote {
            quantity,
            unit_price,
            total_price,
            breakdown,
        }
    }

    pub fn validate_quantity(product: &Product, quantity: u32) -> Result<(), PricingError> {
        if quantity == 0 {
            return Err(PricingError::InvalidQuantity);
        }
        if !product.allows_quantity(quantity) {
            return Err(PricingError::QuantityOutOfRange {
                quantity,
                min: product.min_quantity,
                max: product.max_quantity,
            });
        }
        Ok(())
    }

    /// Validate a request against the product and price it.
    pub fn quote(&self, product: &Product, quantity: u32, options: &PriceOptions) -> Result<PriceQuote, PricingError> {
        if !product.has_online_calculator {
            return Err(PricingError::CalculatorDisabled);
        }
        if options.include_design && !product.has_design_service {
            return Err(PricingError::DesignServiceUnavailable);
        }

        Self::validate_quantity(product, quantity)?;

        let quote = self.calculate(&product.pricing(), quantity, options);
        tracing::debug!(
            product = %product.slug,
            quantity,
            total = %quote.total_price,
            "Calculated price"
        );
        Ok(quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;
    use crate::product::PrintType;

    fn schedule(base: Money, min: u32, per_extra: Option<Money>) -> ProductPricing {
        ProductPricing {
            base_price: base,
            min_quantity: min,
            max_quantity: 100_000,
            price_per_extra: per_extra,
        }
    }

    fn product(pricing: ProductPricing) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "Business Card".to_string(),
            slug: "business-card".to_string(),
            category_id: Uuid::new_v4(),
            description: String::new(),
            short_description: String::new(),
            print_type: PrintType::Offset,
            min_quantity: pricing.min_quantity,
            max_quantity: pricing.max_quantity,
            delivery_time_hours: 24,
            has_design_service: true,
            has_online_calculator: true,
            has_file_upload: true,
            base_price: pricing.base_price,
            price_per_extra: pricing.price_per_extra,
            paper_slugs: Vec::new(),
            is_active: true,
            is_featured: false,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_floor_quantity_costs_base_price() {
        let engine = PricingEngine::default();
        let pricing = schedule(dec!(15000), 10, Some(dec!(1200)));

        let quote = engine.calculate(&pricing, 10, &PriceOptions::default());
        assert_eq!(quote.total_price, dec!(15000));
        assert_eq!(quote.breakdown.volume_adjustment, Decimal::ZERO);

        let no_extra = schedule(dec!(1000), 100, None);
        assert_eq!(engine.calculate(&no_extra, 100, &PriceOptions::default()).total_price, dec!(1000));
    }

    #[test]
    fn test_price_per_extra_is_linear() {
        let engine = PricingEngine::default();
        let pricing = schedule(dec!(15000), 10, Some(dec!(1200)));

        let quote = engine.calculate(&pricing, 50, &PriceOptions::default());
        assert_eq!(quote.total_price, dec!(63000));
        assert_eq!(quote.breakdown.volume_adjustment, dec!(48000));

        for quantity in [11, 25, 400] {
            let expected = dec!(15000) + Decimal::from(quantity - 10) * dec!(1200);
            assert_eq!(engine.calculate(&pricing, quantity, &PriceOptions::default()).total_price, expected);
        }
    }

    #[test]
    fn test_volume_discount_is_capped() {
        let engine = PricingEngine::default();
        let pricing = schedule(dec!(1000), 100, None);

        let quote = engine.calculate(&pricing, 1100, &PriceOptions::default());
        assert_eq!(quote.total_price, dec!(700));
        assert_eq!(quote.breakdown.volume_adjustment, dec!(-300));

        assert_eq!(engine.volume_discount_rate(1000), dec!(0.30));
    }

    #[test]
    fn test_volume_discount_below_cap() {
        let engine = PricingEngine::default();
        let pricing = schedule(dec!(1000), 100, None);

        // 3 extra units: 6% off
        let quote = engine.calculate(&pricing, 103, &PriceOptions::default());
        assert_eq!(quote.total_price, dec!(940));
    }

    #[test]
    fn test_discount_scenario_from_price_list() {
        let engine = PricingEngine::default();
        let pricing = schedule(dec!(1000), 100, None);

        let quote = engine.calculate(&pricing, 200, &PriceOptions::default());
        assert_eq!(quote.total_price, dec!(700.00));
        assert_eq!(quote.unit_price, dec!(4));
    }

    #[test]
    fn test_discount_branch_is_not_monotonic() {
        let engine = PricingEngine::default();
        let pricing = schedule(dec!(1000), 100, None);

        let smaller = engine.calculate(&pricing, 100, &PriceOptions::default());
        let larger = engine.calculate(&pricing, 150, &PriceOptions::default());
        assert!(larger.total_price < smaller.total_price);
    }

    #[test]
    fn test_zero_price_per_extra_uses_discount() {
        let engine = PricingEngine::default();
        let pricing = schedule(dec!(1000), 100, Some(Decimal::ZERO));

        assert_eq!(engine.calculate(&pricing, 200, &PriceOptions::default()).total_price, dec!(700));
    }

    #[test]
    fn test_design_fee_is_flat() {
        let engine = PricingEngine::default();
        let pricing = schedule(dec!(15000), 10, Some(dec!(1200)));
        let with_design = PriceOptions { include_design: true, ..PriceOptions::default() };

        for quantity in [10, 50, 999] {
            let plain = engine.calculate(&pricing, quantity, &PriceOptions::default());
            let designed = engine.calculate(&pricing, quantity, &with_design);
            assert_eq!(designed.total_price - plain.total_price, dec!(50000));
        }
    }

    #[test]
    fn test_per_unit_surcharges() {
        let engine = PricingEngine::default();
        let pricing = schedule(dec!(15000), 10, Some(dec!(1200)));
        let plain = engine.calculate(&pricing, 40, &PriceOptions::default());

        let laminated = engine.calculate(&pricing, 40, &PriceOptions { lamination: true, ..PriceOptions::default() });
        assert_eq!(laminated.total_price - plain.total_price, dec!(8000));

        let uv = engine.calculate(&pricing, 40, &PriceOptions { uv_coating: true, ..PriceOptions::default() });
        assert_eq!(uv.total_price - plain.total_price, dec!(12000));

        let fancy = engine.calculate(&pricing, 40, &PriceOptions { paper: PaperKind::Fancy, ..PriceOptions::default() });
        assert_eq!(fancy.total_price - plain.total_price, dec!(6000));
    }

    #[test]
    fn test_breakdown_adds_up() {
        let engine = PricingEngine::default();
        let pricing = schedule(dec!(1000), 100, None);
        let options = PriceOptions {
            include_design: true,
            lamination: true,
            uv_coating: true,
            paper: PaperKind::Fancy,
        };

        let quote = engine.calculate(&pricing, 107, &options);
        let b = quote.breakdown;
        assert_eq!(b.base, dec!(1000));
        assert_eq!(b.volume_adjustment, dec!(-140));
        assert_eq!(b.design, dec!(50000));
        assert_eq!(b.lamination, dec!(21400));
        assert_eq!(b.uv_coating, dec!(32100));
        assert_eq!(b.paper, dec!(16050));
        assert_eq!(b.total(), quote.total_price);
        assert_eq!(quote.total_price, dec!(120410));
    }

    #[test]
    fn test_custom_config_is_used() {
        let engine = PricingEngine::new(PricingConfig {
            design_fee: dec!(80000),
            lamination_unit_cost: dec!(250),
            ..PricingConfig::default()
        })
        .unwrap();
        let pricing = schedule(dec!(5000), 1, Some(dec!(100)));
        let options = PriceOptions { include_design: true, lamination: true, ..PriceOptions::default() };

        let quote = engine.calculate(&pricing, 2, &options);
        assert_eq!(quote.total_price, dec!(5000) + dec!(100) + dec!(80000) + dec!(500));
    }

    #[test]
    fn test_results_are_never_negative() {
        let engine = PricingEngine::default();
        let pricing = schedule(Decimal::ZERO, 1, None);

        assert!(engine.calculate(&pricing, 5000, &PriceOptions::default()).total_price >= Decimal::ZERO);
    }

    #[test]
    fn test_quote_rejects_out_of_range_quantity() {
        let engine = PricingEngine::default();
        let mut pricing = schedule(dec!(15000), 10, Some(dec!(1200)));
        pricing.max_quantity = 5000;
        let product = product(pricing);

        assert_eq!(
            engine.quote(&product, 9, &PriceOptions::default()),
            Err(PricingError::QuantityOutOfRange { quantity: 9, min: 10, max: 5000 })
        );
        assert_eq!(
            engine.quote(&product, 5001, &PriceOptions::default()),
            Err(PricingError::QuantityOutOfRange { quantity: 5001, min: 10, max: 5000 })
        );
        assert_eq!(engine.quote(&product, 0, &PriceOptions::default()), Err(PricingError::InvalidQuantity));
        assert!(engine.quote(&product, 5000, &PriceOptions::default()).is_ok());
    }

    #[test]
    fn test_quote_respects_product_flags() {
        let engine = PricingEngine::default();
        let mut product = product(schedule(dec!(15000), 10, None));
        let design = PriceOptions { include_design: true, ..PriceOptions::default() };

        product.has_design_service = false;
        assert_eq!(engine.quote(&product, 10, &design), Err(PricingError::DesignServiceUnavailable));

        product.has_online_calculator = false;
        assert_eq!(engine.quote(&product, 10, &PriceOptions::default()), Err(PricingError::CalculatorDisabled));
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: PricingConfig = serde_json::from_value(serde_json::json!({
            "design_fee": "60000"
        }))
        .unwrap();

        assert_eq!(config.design_fee, dec!(60000));
        assert_eq!(config.uv_unit_cost, dec!(300));
        assert_eq!(config.max_volume_discount, dec!(0.30));
    }

    #[test]
    fn test_engine_rejects_invalid_config() {
        let oversized_discount = PricingConfig {
            max_volume_discount: dec!(1.5),
            volume_discount_step: dec!(0.5),
            ..PricingConfig::default()
        };
        assert!(matches!(
            PricingEngine::new(oversized_discount),
            Err(PricingError::InvalidConfig(_))
        ));

        let negative_cost = PricingConfig { uv_unit_cost: dec!(-1), ..PricingConfig::default() };
        assert!(negative_cost.validate().is_err());

        let negative_step = PricingConfig { volume_discount_step: dec!(-0.02), ..PricingConfig::default() };
        assert!(negative_step.validate().is_err());

        let wide_scale = PricingConfig { currency_scale: MAX_CURRENCY_SCALE + 1, ..PricingConfig::default() };
        assert!(wide_scale.validate().is_err());

        let full_discount = PricingConfig { max_volume_discount: Decimal::ONE, ..PricingConfig::default() };
        assert!(PricingEngine::new(full_discount).is_ok());
    }

    #[test]
    fn test_valid_config_keeps_totals_non_negative() {
        let engine = PricingEngine::new(PricingConfig {
            max_volume_discount: Decimal::ONE,
            volume_discount_step: dec!(0.5),
            ..PricingConfig::default()
        })
        .unwrap();
        let pricing = schedule(dec!(1000), 100, None);

        let quote = engine.calculate(&pricing, 200, &PriceOptions::default());
        assert_eq!(quote.total_price, Decimal::ZERO);
        assert!(quote.unit_price >= Decimal::ZERO);
    }
}
