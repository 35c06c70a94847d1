//! The label and sticker catalogue the shop launches with.

use uuid::Uuid;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use daidi_catalog::{PaperType, PrintType, Product, ProductCategory};
use daidi_core::showcase::{PortfolioItem, Service};

pub const FEATURED_SLUGS: [&str; 3] = ["label-digital-normal", "laptop-sticker", "golden-sticker"];

#[derive(Debug, Clone)]
pub struct SeedCatalog {
    pub categories: Vec<ProductCategory>,
    pub papers: Vec<PaperType>,
    pub products: Vec<Product>,
}

struct PaperSeed {
    name: &'static str,
    slug: &'static str,
    description: &'static str,
    gram_weight: u32,
    price_per_sheet: i64,
    is_fancy: bool,
    texture: &'static str,
}

const PAPERS: [PaperSeed; 6] = [
    PaperSeed {
        name: "Standard label paper",
        slug: "label-paper-normal",
        description: "Plain adhesive paper for office labels",
        gram_weight: 80,
        price_per_sheet: 5000,
        is_fancy: false,
        texture: "smooth matte",
    },
    PaperSeed {
        name: "Glossy label paper",
        slug: "label-paper-glossy",
        description: "Glossy adhesive paper for promotional labels",
        gram_weight: 90,
        price_per_sheet: 7000,
        is_fancy: false,
        texture: "glossy",
    },
    PaperSeed {
        name: "Clear glass PVC",
        slug: "pvc-glass-clear",
        description: "Transparent waterproof PVC for window stickers",
        gram_weight: 150,
        price_per_sheet: 15000,
        is_fancy: true,
        texture: "clear polished",
    },
    PaperSeed {
        name: "White matte PVC",
        slug: "pvc-white-matte",
        description: "Durable waterproof white PVC",
        gram_weight: 160,
        price_per_sheet: 14000,
        is_fancy: true,
        texture: "matte durable",
    },
    PaperSeed {
        name: "Jelly polymer",
        slug: "jelly-polymer",
        description: "Soft jelly polymer for eye-catching stickers",
        gram_weight: 120,
        price_per_sheet: 12000,
        is_fancy: true,
        texture: "soft jelly",
    },
    PaperSeed {
        name: "Golden sticker",
        slug: "golden-sticker",
        description: "Gold-foil stock for luxury work",
        gram_weight: 140,
        price_per_sheet: 20000,
        is_fancy: true,
        texture: "golden glossy",
    },
];

struct ProductSeed {
    name: &'static str,
    slug: &'static str,
    category: &'static str,
    short_description: &'static str,
    print_type: PrintType,
    min_quantity: u32,
    max_quantity: u32,
    delivery_time_hours: u32,
    base_price: i64,
    price_per_extra: i64,
    // First entry is the product's default paper
    papers: &'static [&'static str],
}

const PRODUCTS: [ProductSeed; 10] = [
    ProductSeed {
        name: "Digital label printing",
        slug: "label-digital-normal",
        category: "label-digital",
        short_description: "Same-day digital labels, ready in 2 hours",
        print_type: PrintType::Digital,
        min_quantity: 10,
        max_quantity: 5000,
        delivery_time_hours: 2,
        base_price: 15000,
        price_per_extra: 1200,
        papers: &["label-paper-normal", "label-paper-glossy"],
    },
    ProductSeed {
        name: "Digital PVC labels",
        slug: "label-digital-pvc",
        category: "label-digital",
        short_description: "Waterproof, hard-wearing digital labels",
        print_type: PrintType::Digital,
        min_quantity: 10,
        max_quantity: 3000,
        delivery_time_hours: 3,
        base_price: 25000,
        price_per_extra: 2000,
        papers: &["pvc-glass-clear", "pvc-white-matte"],
    },
    ProductSeed {
        name: "Laptop sticker",
        slug: "laptop-sticker",
        category: "stickers",
        short_description: "Durable stickers made for laptops",
        print_type: PrintType::Digital,
        min_quantity: 1,
        max_quantity: 100,
        delivery_time_hours: 2,
        base_price: 20000,
        price_per_extra: 5000,
        papers: &["pvc-glass-clear", "pvc-white-matte", "jelly-polymer"],
    },
    ProductSeed {
        name: "Golden sticker",
        slug: "golden-sticker",
        category: "stickers",
        short_description: "Luxury stickers with a gold finish",
        print_type: PrintType::Digital,
        min_quantity: 5,
        max_quantity: 500,
        delivery_time_hours: 4,
        base_price: 35000,
        price_per_extra: 6000,
        papers: &["golden-sticker"],
    },
    ProductSeed {
        name: "Bulk offset labels",
        slug: "label-offset-bulk",
        category: "label-offset",
        short_description: "Low-cost offset labels for large runs",
        print_type: PrintType::Offset,
        min_quantity: 1000,
        max_quantity: 50000,
        delivery_time_hours: 48,
        base_price: 800000,
        price_per_extra: 700,
        papers: &["label-paper-normal", "label-paper-glossy"],
    },
    ProductSeed {
        name: "Industrial labels",
        slug: "industrial-label",
        category: "label-offset",
        short_description: "Heat and chemical resistant labels for manufacturers",
        print_type: PrintType::Offset,
        min_quantity: 500,
        max_quantity: 30000,
        delivery_time_hours: 72,
        base_price: 500000,
        price_per_extra: 800,
        papers: &["pvc-white-matte", "pvc-glass-clear"],
    },
    ProductSeed {
        name: "Jelly label",
        slug: "jelly-label",
        category: "special-labels",
        short_description: "Soft-touch jelly textured labels",
        print_type: PrintType::Digital,
        min_quantity: 20,
        max_quantity: 2000,
        delivery_time_hours: 6,
        base_price: 22000,
        price_per_extra: 1800,
        papers: &["jelly-polymer"],
    },
    ProductSeed {
        name: "Round label",
        slug: "circle-label",
        category: "special-labels",
        short_description: "Precisely die-cut round labels",
        print_type: PrintType::Digital,
        min_quantity: 10,
        max_quantity: 3000,
        delivery_time_hours: 3,
        base_price: 18000,
        price_per_extra: 1500,
        papers: &["label-paper-normal", "label-paper-glossy", "pvc-white-matte"],
    },
    ProductSeed {
        name: "Asset tag",
        slug: "asset-label",
        category: "special-labels",
        short_description: "Strong-adhesive asset tags with serials and barcodes",
        print_type: PrintType::Digital,
        min_quantity: 50,
        max_quantity: 5000,
        delivery_time_hours: 4,
        base_price: 12000,
        price_per_extra: 800,
        papers: &["label-paper-normal", "pvc-white-matte"],
    },
    ProductSeed {
        name: "CD label",
        slug: "cd-label",
        category: "special-labels",
        short_description: "Standard-size CD and DVD labels",
        print_type: PrintType::Digital,
        min_quantity: 10,
        max_quantity: 1000,
        delivery_time_hours: 3,
        base_price: 8000,
        price_per_extra: 600,
        papers: &["label-paper-glossy", "pvc-white-matte"],
    },
];

fn category(name: &str, slug: &str, description: &str, parent_id: Option<Uuid>) -> ProductCategory {
    ProductCategory {
        id: Uuid::new_v4(),
        name: name.to_string(),
        slug: slug.to_string(),
        description: description.to_string(),
        parent_id,
        is_active: true,
    }
}

/// Build the label catalogue with fresh ids.
pub fn label_catalog() -> SeedCatalog {
    let root = category("Labels & stickers", "label", "Labels, tags and stickers for every use", None);
    let parent = Some(root.id);

    let categories = vec![
        category("Digital labels", "label-digital", "Instant digital labels with 2-hour delivery", parent),
        category("Offset labels", "label-offset", "Offset labels for large runs at a low price", parent),
        category("Stickers", "stickers", "Stickers and decals", parent),
        category("Special labels", "special-labels", "Labels in unusual shapes and materials", parent),
    ];
    let categories: Vec<ProductCategory> = std::iter::once(root).chain(categories).collect();

    let papers = PAPERS
        .iter()
        .map(|seed| PaperType {
            id: Uuid::new_v4(),
            name: seed.name.to_string(),
            slug: seed.slug.to_string(),
            description: seed.description.to_string(),
            gram_weight: seed.gram_weight,
            price_per_sheet: Decimal::from(seed.price_per_sheet),
            is_fancy: seed.is_fancy,
            texture: seed.texture.to_string(),
            is_active: true,
        })
        .collect();

    // Listed oldest first, one minute apart
    let launched = Utc::now() - Duration::minutes(PRODUCTS.len() as i64);
    let products = PRODUCTS
        .iter()
        .enumerate()
        .filter_map(|(index, seed)| {
            let category_id = categories.iter().find(|c| c.slug == seed.category)?.id;
            Some(Product {
                id: Uuid::new_v4(),
                name: seed.name.to_string(),
                slug: seed.slug.to_string(),
                category_id,
                description: seed.short_description.to_string(),
                short_description: seed.short_description.to_string(),
                print_type: seed.print_type,
                min_quantity: seed.min_quantity,
                max_quantity: seed.max_quantity,
                delivery_time_hours: seed.delivery_time_hours,
                has_design_service: true,
                has_online_calculator: true,
                has_file_upload: true,
                base_price: Decimal::from(seed.base_price),
                price_per_extra: Some(Decimal::from(seed.price_per_extra)),
                paper_slugs: seed.papers.iter().map(|s| s.to_string()).collect(),
                is_active: true,
                is_featured: FEATURED_SLUGS.contains(&seed.slug),
                created_at: launched + Duration::minutes(index as i64),
            })
        })
        .collect();

    SeedCatalog { categories, papers, products }
}

#[derive(Debug, Clone)]
pub struct SeedShowcase {
    pub services: Vec<Service>,
    pub portfolio: Vec<PortfolioItem>,
}

struct ServiceSeed {
    title: &'static str,
    slug: &'static str,
    short_description: &'static str,
    features: &'static [&'static str],
    is_active: bool,
}

const SERVICES: [ServiceSeed; 4] = [
    ServiceSeed {
        title: "Label design",
        slug: "label-design",
        short_description: "Custom label artwork by our design team",
        features: &["Three draft concepts", "Print-ready files", "Brand colour matching"],
        is_active: true,
    },
    ServiceSeed {
        title: "Digital label printing",
        slug: "digital-label-printing",
        short_description: "Short runs delivered the same day",
        features: &["From 10 pieces", "2-hour delivery", "Variable data"],
        is_active: true,
    },
    ServiceSeed {
        title: "Offset printing",
        slug: "offset-printing",
        short_description: "Large runs at the lowest unit price",
        features: &["From 1000 pieces", "Pantone inks", "Die cutting"],
        is_active: true,
    },
    ServiceSeed {
        title: "Packaging design",
        slug: "packaging-design",
        short_description: "Boxes and sleeves, coming soon",
        features: &["Dielines", "3D mock-ups"],
        is_active: false,
    },
];

struct PortfolioSeed {
    title: &'static str,
    slug: &'static str,
    category: &'static str,
    client: &'static str,
    year: i32,
    description: &'static str,
    tags: &'static [&'static str],
    is_featured: bool,
    is_active: bool,
}

const PORTFOLIO: [PortfolioSeed; 4] = [
    PortfolioSeed {
        title: "Dairy product labels",
        slug: "dairy-product-labels",
        category: "labels",
        client: "Golrang Dairy",
        year: 2023,
        description: "Waterproof PVC labels for a yoghurt and cheese range",
        tags: &["pvc", "waterproof"],
        is_featured: true,
        is_active: true,
    },
    PortfolioSeed {
        title: "Cafe sticker pack",
        slug: "cafe-sticker-pack",
        category: "stickers",
        client: "Lamiz Coffee",
        year: 2024,
        description: "Die-cut laptop stickers given away with every order",
        tags: &["die-cut", "promotional"],
        is_featured: false,
        is_active: true,
    },
    PortfolioSeed {
        title: "Pharmacy asset tags",
        slug: "pharmacy-asset-tags",
        category: "labels",
        client: "Darou Pakhsh",
        year: 2022,
        description: "Serial-numbered asset tags with barcodes",
        tags: &["barcode", "industrial"],
        is_featured: false,
        is_active: true,
    },
    PortfolioSeed {
        title: "Unreleased tea packaging",
        slug: "tea-packaging",
        category: "packaging",
        client: "Shahrzad Tea",
        year: 2025,
        description: "Gold-foil tea box labels, under NDA",
        tags: &["foil"],
        is_featured: false,
        is_active: false,
    },
];

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Service and portfolio pages of the marketing site
pub fn showcase() -> SeedShowcase {
    // Listed oldest first, one day apart
    let launched = Utc::now() - Duration::days(30);

    let services = SERVICES
        .iter()
        .enumerate()
        .map(|(index, seed)| {
            let created_at = launched + Duration::days(index as i64);
            Service {
                id: Uuid::new_v4(),
                title: seed.title.to_string(),
                slug: seed.slug.to_string(),
                description: seed.short_description.to_string(),
                short_description: seed.short_description.to_string(),
                features: strings(seed.features),
                gallery: Vec::new(),
                specifications: Vec::new(),
                is_active: seed.is_active,
                meta_title: seed.title.to_string(),
                meta_description: seed.short_description.to_string(),
                created_at,
                updated_at: created_at,
            }
        })
        .collect();

    let portfolio = PORTFOLIO
        .iter()
        .enumerate()
        .map(|(index, seed)| {
            let created_at = launched + Duration::days(index as i64);
            PortfolioItem {
                id: Uuid::new_v4(),
                title: seed.title.to_string(),
                slug: seed.slug.to_string(),
                category: seed.category.to_string(),
                client: seed.client.to_string(),
                year: seed.year,
                description: seed.description.to_string(),
                challenge: String::new(),
                solution: String::new(),
                result: String::new(),
                images: vec![format!("/media/portfolio/{}.jpg", seed.slug)],
                tags: strings(seed.tags),
                is_featured: seed.is_featured,
                is_active: seed.is_active,
                meta_title: seed.title.to_string(),
                meta_description: seed.description.to_string(),
                created_at,
                updated_at: created_at,
            }
        })
        .collect();

    SeedShowcase { services, portfolio }
}
