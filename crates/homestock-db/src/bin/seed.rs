//! # Seed Data Generator
//!
//! Populates a HomeStock database with a typical household pantry.
//!
//! ## Usage
//! ```bash
//! # Seed the configured database (homestock.toml / HOMESTOCK_DB_PATH)
//! cargo run -p homestock-db --bin seed
//!
//! # Specify database path
//! cargo run -p homestock-db --bin seed -- --db ./data/homestock.db
//!
//! # Use an explicit config file
//! cargo run -p homestock-db --bin seed -- --config ./homestock.toml
//! ```
//!
//! Nothing is written when the collection already has products. Afterwards
//! the low-stock items and a quantity-ordered listing are printed.

use std::env;
use std::path::PathBuf;

use homestock_core::{ProductInput, ProductQuery, SortKey, SortOrder};
use homestock_db::{Database, HomestockConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// `(name, quantity, min_quantity)`
const PANTRY: &[(&str, i64, i64)] = &[
    ("Leche", 3, 1),
    ("Pan", 1, 3),
    ("Arroz", 4, 1),
    ("Café", 5, 2),
    ("Huevos", 6, 6),
    ("Aceite de oliva", 1, 1),
    ("Azúcar", 2, 1),
    ("Sal", 1, 0),
    ("Pasta", 0, 2),
    ("Papel higiénico", 8, 4),
    ("Jabón", 2, 1),
    ("Detergente", 0, 1),
    ("Tomates", 5, 3),
    ("Manzanas", 2, 4),
];

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,homestock=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();
}

fn print_help() {
    println!("HomeStock Seed Data Generator");
    println!();
    println!("Usage: seed [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -d, --db <PATH>        Database file path (default: from config)");
    println!("  -c, --config <PATH>    Config file path (default: platform config dir)");
    println!("  -h, --help             Show this help message");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_help();
                return Ok(());
            }
        }
        i += 1;
    }

    init_tracing();

    let mut config = HomestockConfig::load(config_path)?;
    if let Some(path) = db_path {
        config.storage.database_path = Some(path);
    }

    println!("🌱 HomeStock Seed Data Generator");
    println!("================================");
    println!("Database: {}", config.database_path().display());
    println!("Slot:     {}", config.products.key);
    println!();

    let db = Database::new(config.db_config()).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Adding products...");

    let inventory = db.inventory();
    let mut added = 0;
    for (name, quantity, min_quantity) in PANTRY {
        let input = ProductInput::new(name, *quantity, *min_quantity)?;
        match inventory.add_product(input).await {
            Ok(_) => added += 1,
            Err(e) => eprintln!("Failed to add {}: {}", name, e),
        }
    }
    info!(added, "Seeded products");

    let low = inventory
        .view(&ProductQuery::new().low_stock_only(true).sort_key(SortKey::Relative))
        .await;

    println!();
    println!("✓ Added {} products", added);
    println!();
    println!("Low stock ({} of {}):", low.low_stock_count, low.total);
    for p in &low.products {
        println!("  ⚠ {:<20} {:>3} / min {}", p.name, p.quantity, p.min_quantity);
    }

    let query = ProductQuery::new()
        .sort_key(SortKey::Quantity)
        .sort_order(SortOrder::Desc);
    let all = inventory.view(&query).await;

    println!();
    println!("All products (quantity {}):", query.sort_order.arrow());
    for p in &all.products {
        let marker = if p.is_low_stock() { "⚠" } else { " " };
        println!("  {} {:<20} {:>3}", marker, p.name, p.quantity);
    }

    db.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
