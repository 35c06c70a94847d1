//! Marketing pages: the services the shop offers and its portfolio of past work.

use std::cmp::Ordering;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Datelike, Utc};
use crate::validators::{slugify, validate_not_empty, validate_slug};
use crate::{CoreError, CoreResult};

/// A service page, e.g. "Label design" or "Offset printing"
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Service {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub short_description: String,
    pub features: Vec<String>,
    /// Image URLs
    pub gallery: Vec<String>,
    pub specifications: Vec<String>,
    pub is_active: bool,
    pub meta_title: String,
    pub meta_description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A finished job shown as a case study
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortfolioItem {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub category: String,
    pub client: String,
    pub year: i32,
    pub description: String,
    pub challenge: String,
    pub solution: String,
    pub result: String,
    /// Image URLs, the first one is the cover
    pub images: Vec<String>,
    pub tags: Vec<String>,
    pub is_featured: bool,
    pub is_active: bool,
    pub meta_title: String,
    pub meta_description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Portfolio card as shown in listings
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PortfolioSummary {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub category: String,
    pub client: String,
    pub year: i32,
    pub is_featured: bool,
    pub images: Vec<String>,
}

impl From<PortfolioItem> for PortfolioSummary {
    fn from(item: PortfolioItem) -> Self {
        PortfolioSummary {
            id: item.id,
            title: item.title,
            slug: item.slug,
            category: item.category,
            client: item.client,
            year: item.year,
            is_featured: item.is_featured,
            images: item.images,
        }
    }
}

impl PortfolioItem {
    /// Every search term must appear in the title, description, client or category.
    pub fn matches(&self, search: &str) -> bool {
        let fields = [&self.title, &self.description, &self.client, &self.category].map(|f| f.to_lowercase());
        search_terms(search).all(|term| fields.iter().any(|field| field.contains(&term)))
    }
}

/// Lower-cased, whitespace separated terms of a search string
pub fn search_terms(search: &str) -> impl Iterator<Item = String> + '_ {
    search.split_whitespace().map(str::to_lowercase)
}

/// Sort order of the portfolio listing, named like the `ordering` query value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PortfolioOrdering {
    /// `-created_at`
    #[default]
    Newest,
    /// `created_at`
    Oldest,
    /// `-year`
    YearDesc,
    /// `year`
    YearAsc,
    /// `-is_featured`
    FeaturedFirst,
    /// `is_featured`
    FeaturedLast,
}

impl PortfolioOrdering {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "-created_at" => Some(PortfolioOrdering::Newest),
            "created_at" => Some(PortfolioOrdering::Oldest),
            "-year" => Some(PortfolioOrdering::YearDesc),
            "year" => Some(PortfolioOrdering::YearAsc),
            "-is_featured" => Some(PortfolioOrdering::FeaturedFirst),
            "is_featured" => Some(PortfolioOrdering::FeaturedLast),
            _ => None,
        }
    }

    /// SQL `ORDER BY` clause. Newest first breaks ties.
    pub fn order_by(&self) -> &'static str {
        match self {
            PortfolioOrdering::Newest => "created_at DESC, slug",
            PortfolioOrdering::Oldest => "created_at ASC, slug",
            PortfolioOrdering::YearDesc => "year DESC, created_at DESC, slug",
            PortfolioOrdering::YearAsc => "year ASC, created_at DESC, slug",
            PortfolioOrdering::FeaturedFirst => "is_featured DESC, created_at DESC, slug",
            PortfolioOrdering::FeaturedLast => "is_featured ASC, created_at DESC, slug",
        }
    }

    /// Same order as [`Self::order_by`], for in-memory lists
    pub fn compare(&self, a: &PortfolioItem, b: &PortfolioItem) -> Ordering {
        let newest = b.created_at.cmp(&a.created_at).then_with(|| a.slug.cmp(&b.slug));
        match self {
            PortfolioOrdering::Newest => newest,
            PortfolioOrdering::Oldest => a.created_at.cmp(&b.created_at).then_with(|| a.slug.cmp(&b.slug)),
            PortfolioOrdering::YearDesc => b.year.cmp(&a.year).then(newest),
            PortfolioOrdering::YearAsc => a.year.cmp(&b.year).then(newest),
            PortfolioOrdering::FeaturedFirst => b.is_featured.cmp(&a.is_featured).then(newest),
            PortfolioOrdering::FeaturedLast => a.is_featured.cmp(&b.is_featured).then(newest),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortfolioQuery {
    pub search: Option<String>,
    pub featured: Option<bool>,
    pub ordering: PortfolioOrdering,
}

fn default_true() -> bool {
    true
}

/// Use the given slug, or derive one from the title
fn resolve_slug(slug: Option<String>, title: &str) -> CoreResult<String> {
    let slug = match slug.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) {
        Some(slug) => slug,
        None => slugify(title),
    };
    if slug.is_empty() {
        return Err(CoreError::ValidationError("slug cannot be derived from the title".to_string()));
    }
    validate_slug(&slug)?;
    Ok(slug)
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewService {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub description: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub gallery: Vec<String>,
    #[serde(default)]
    pub specifications: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub meta_title: String,
    #[serde(default)]
    pub meta_description: String,
}

impl NewService {
    pub fn into_service(self) -> CoreResult<Service> {
        validate_not_empty("title", &self.title)?;
        validate_not_empty("description", &self.description)?;
        let slug = resolve_slug(self.slug, &self.title)?;

        let now = Utc::now();
        Ok(Service {
            id: Uuid::new_v4(),
            title: self.title.trim().to_string(),
            slug,
            description: self.description,
            short_description: self.short_description,
            features: self.features,
            gallery: self.gallery,
            specifications: self.specifications,
            is_active: self.is_active,
            meta_title: self.meta_title,
            meta_description: self.meta_description,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPortfolioItem {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub category: String,
    pub client: String,
    pub year: i32,
    pub description: String,
    #[serde(default)]
    pub challenge: String,
    #[serde(default)]
    pub solution: String,
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub meta_title: String,
    #[serde(default)]
    pub meta_description: String,
}

pub const EARLIEST_PORTFOLIO_YEAR: i32 = 1950;

impl NewPortfolioItem {
    pub fn into_item(self) -> CoreResult<PortfolioItem> {
        validate_not_empty("title", &self.title)?;
        validate_not_empty("category", &self.category)?;
        validate_not_empty("client", &self.client)?;
        validate_not_empty("description", &self.description)?;

        let now = Utc::now();
        let latest_year = now.year();
        if !(EARLIEST_PORTFOLIO_YEAR..=latest_year).contains(&self.year) {
            return Err(CoreError::ValidationError(format!(
                "year must be between {} and {}",
                EARLIEST_PORTFOLIO_YEAR, latest_year
            )));
        }
        let slug = resolve_slug(self.slug, &self.title)?;

        Ok(PortfolioItem {
            id: Uuid::new_v4(),
            title: self.title.trim().to_string(),
            slug,
            category: self.category,
            client: self.client,
            year: self.year,
            description: self.description,
            challenge: self.challenge,
            solution: self.solution,
            result: self.result,
            images: self.images,
            tags: self.tags,
            is_featured: self.is_featured,
            is_active: self.is_active,
            meta_title: self.meta_title,
            meta_description: self.meta_description,
            created_at: now,
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_item(title: &str) -> NewPortfolioItem {
        NewPortfolioItem {
            title: title.to_string(),
            slug: None,
            category: "labels".to_string(),
            client: "Golrang Dairy".to_string(),
            year: 2024,
            description: "Waterproof labels for a yoghurt range".to_string(),
            challenge: String::new(),
            solution: String::new(),
            result: String::new(),
            images: vec!["/media/portfolio/golrang.jpg".to_string()],
            tags: vec!["pvc".to_string()],
            is_featured: false,
            is_active: true,
            meta_title: String::new(),
            meta_description: String::new(),
        }
    }

    #[test]
    fn test_slug_derived_from_title() {
        let item = new_item("Dairy Labels 2024").into_item().unwrap();
        assert_eq!(item.slug, "dairy-labels-2024");

        let mut explicit = new_item("Dairy Labels");
        explicit.slug = Some("golrang".to_string());
        assert_eq!(explicit.into_item().unwrap().slug, "golrang");

        let mut bad = new_item("Dairy Labels");
        bad.slug = Some("not a slug".to_string());
        assert!(bad.into_item().is_err());

        assert!(new_item("!!!").into_item().is_err());
    }

    #[test]
    fn test_portfolio_year_is_checked() {
        let mut item = new_item("Old job");
        item.year = 1900;
        assert!(item.into_item().is_err());

        let mut item = new_item("Future job");
        item.year = 3000;
        assert!(item.into_item().is_err());
    }

    #[test]
    fn test_service_requires_description() {
        let service = NewService {
            title: "Label design".to_string(),
            slug: None,
            description: " ".to_string(),
            short_description: String::new(),
            features: Vec::new(),
            gallery: Vec::new(),
            specifications: Vec::new(),
            is_active: true,
            meta_title: String::new(),
            meta_description: String::new(),
        };
        assert!(service.into_service().is_err());
    }

    #[test]
    fn test_search_matches_all_terms() {
        let item = new_item("Dairy Labels").into_item().unwrap();
        assert!(item.matches("golrang"));
        assert!(item.matches("YOGHURT labels"));
        assert!(!item.matches("golrang posters"));
        assert!(item.matches("  "));
    }

    #[test]
    fn test_ordering() {
        let mut older = new_item("Older").into_item().unwrap();
        older.created_at = Utc::now() - Duration::days(30);
        older.year = 2025;
        let mut newer = new_item("Newer").into_item().unwrap();
        newer.is_featured = true;

        assert_eq!(PortfolioOrdering::Newest.compare(&newer, &older), Ordering::Less);
        assert_eq!(PortfolioOrdering::Oldest.compare(&newer, &older), Ordering::Greater);
        assert_eq!(PortfolioOrdering::YearDesc.compare(&older, &newer), Ordering::Less);
        assert_eq!(PortfolioOrdering::FeaturedFirst.compare(&newer, &older), Ordering::Less);

        assert_eq!(PortfolioOrdering::parse("-year"), Some(PortfolioOrdering::YearDesc));
        assert_eq!(PortfolioOrdering::parse("price"), None);
    }
}
