pub mod product;
pub mod pricing;

pub use product::{PaperType, PrintType, Product, ProductCategory};
pub use pricing::{PaperKind, PriceBreakdown, PriceOptions, PriceQuote, PricingConfig, PricingEngine, PricingError, ProductPricing};
