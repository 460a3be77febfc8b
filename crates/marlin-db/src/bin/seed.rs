//! # Seed Data Generator
//!
//! Populates the database with a demo print-shop catalog for development.
//!
//! ## Usage
//! ```bash
//! cargo run -p marlin-db --bin seed
//!
//! # Specify database path
//! cargo run -p marlin-db --bin seed -- --db ./data/marlin.db
//! ```

use std::env;

use rust_decimal::Decimal;
use uuid::Uuid;

use marlin_core::types::{CatalogItem, PricingMethod, Service};
use marlin_core::Money;
use marlin_db::{Database, DbConfig};

fn money(raw: &str) -> Money {
    // Literals below are well-formed decimals.
    Money::new(raw.parse::<Decimal>().unwrap_or(Decimal::ZERO))
}

fn service(name: &str, price: &str) -> Service {
    Service {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        price: money(price),
    }
}

fn fixed(name: &str, category: &str, price: &str, services: Vec<Service>) -> CatalogItem {
    CatalogItem {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        category: category.to_string(),
        pricing_method: PricingMethod::Fixed,
        price: money(price),
        services,
        is_variable: false,
    }
}

fn area(name: &str, category: &str, rate: &str) -> CatalogItem {
    CatalogItem {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        category: category.to_string(),
        pricing_method: PricingMethod::Area,
        price: money(rate),
        services: Vec::new(),
        is_variable: false,
    }
}

fn demo_catalog() -> Vec<CatalogItem> {
    vec![
        area("Flex Banner", "Large Format", "10"),
        area("Vinyl Sticker Sheet", "Large Format", "18.5"),
        area("One-Way Vision", "Large Format", "25"),
        fixed(
            "Business Cards (100)",
            "Print",
            "8.5",
            vec![service("Lamination", "2.5"), service("Rounded Corners", "1.5")],
        ),
        fixed(
            "Photo Mug",
            "Gifts",
            "6",
            vec![service("Gift Box", "1.25")],
        ),
        fixed("A4 Color Print", "Print", "0.75", Vec::new()),
        CatalogItem {
            id: Uuid::new_v4().to_string(),
            name: "Custom Job".to_string(),
            category: "Misc".to_string(),
            pricing_method: PricingMethod::Fixed,
            price: Money::zero(),
            services: Vec::new(),
            is_variable: true,
        },
    ]
}

fn parse_db_path() -> String {
    let args: Vec<String> = env::args().collect();
    args.iter()
        .position(|a| a == "--db")
        .and_then(|i| args.get(i + 1))
        .cloned()
        .unwrap_or_else(|| "./marlin.db".to_string())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let path = parse_db_path();
    tracing::info!(path = %path, "Seeding demo catalog");

    let db = match Database::new(DbConfig::new(&path)).await {
        Ok(db) => db,
        Err(err) => {
            tracing::error!(error = %err, "Failed to open database");
            std::process::exit(1);
        }
    };

    let catalog = db.catalog();
    let mut inserted = 0usize;
    for item in demo_catalog() {
        match catalog.insert(&item).await {
            Ok(()) => inserted += 1,
            Err(err) => tracing::warn!(name = %item.name, error = %err, "Skipping item"),
        }
    }

    tracing::info!(inserted, "Seed complete");
    db.close().await;
}
