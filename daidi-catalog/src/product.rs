use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use daidi_shared::Money;
use crate::pricing::{PaperKind, ProductPricing};

/// Printing process a product is produced with
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PrintType {
    #[default]
    Digital,
    Offset,
    Both,
}

impl PrintType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrintType::Digital => "digital",
            PrintType::Offset => "offset",
            PrintType::Both => "both",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "digital" => Some(PrintType::Digital),
            "offset" => Some(PrintType::Offset),
            "both" => Some(PrintType::Both),
            _ => None,
        }
    }
}

/// Catalog category. Categories nest one level through `parent_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductCategory {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub parent_id: Option<Uuid>,
    pub is_active: bool,
}

/// Paper or card stock a product can be printed on
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaperType {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub gram_weight: u32,
    pub price_per_sheet: Money,
    pub is_fancy: bool,
    pub texture: String,
    pub is_active: bool,
}

/// A printed product as sold in the shop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub category_id: Uuid,
    pub description: String,
    pub short_description: String,
    pub print_type: PrintType,

    #[serde(default = "default_min_quantity")]
    pub min_quantity: u32,
    #[serde(default = "default_max_quantity")]
    pub max_quantity: u32,
    #[serde(default = "default_delivery_time_hours")]
    pub delivery_time_hours: u32,

    pub has_design_service: bool,
    pub has_online_calculator: bool,
    pub has_file_upload: bool,

    pub base_price: Money,
    pub price_per_extra: Option<Money>,

    /// Slugs of the papers this product can be ordered on
    pub paper_slugs: Vec<String>,

    pub is_active: bool,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
}

pub const DEFAULT_MIN_QUANTITY: u32 = 1;
pub const DEFAULT_MAX_QUANTITY: u32 = 10_000;
pub const DEFAULT_DELIVERY_TIME_HOURS: u32 = 24;

fn default_min_quantity() -> u32 { DEFAULT_MIN_QUANTITY }
fn default_max_quantity() -> u32 { DEFAULT_MAX_QUANTITY }
fn default_delivery_time_hours() -> u32 { DEFAULT_DELIVERY_TIME_HOURS }

impl Product {
    /// The subset of fields the price calculator works on.
    pub fn pricing(&self) -> ProductPricing {
        ProductPricing {
            base_price: self.base_price,
            min_quantity: self.min_quantity,
            max_quantity: self.max_quantity,
            price_per_extra: self.price_per_extra,
        }
    }

    pub fn allows_quantity(&self, quantity: u32) -> bool {
        (self.min_quantity..=self.max_quantity).contains(&quantity)
    }

    /// Resolve the `paper_type` value of a price request.
    ///
    /// A slug of one of this product's papers is priced by that paper's
    /// `is_fancy` flag; anything else falls back to the plain tag, where only
    /// `"fancy"` carries a surcharge.
    pub fn paper_kind_for(&self, tag: &str, papers: &[PaperType]) -> PaperKind {
        let linked = papers
            .iter()
            .filter(|p| p.is_active)
            .find(|p| p.slug == tag && self.paper_slugs.iter().any(|s| s == tag));

        match linked {
            Some(paper) if paper.is_fancy => PaperKind::Fancy,
            Some(_) => PaperKind::Standard,
            None => PaperKind::from_tag(tag),
        }
    }
}
