//! # Seed Data Generator
//!
//! Prepares a development database and catalog for the front desk.
//!
//! ## Usage
//! ```bash
//! # ./fireside_dev.db and ./menu.json
//! cargo run -p fireside-db --bin seed
//!
//! # Custom paths, more demo orders
//! cargo run -p fireside-db --bin seed -- --db ./data/fireside.db --menu ./data/menu.json --orders 20
//! ```
//!
//! Demo orders are priced from the catalog with the house tax rate and
//! cycle through every service type and kitchen status.

use std::env;

use chrono::Utc;
use fireside_core::OrderFilter;
use fireside_db::seed::seed_demo_orders;
use fireside_db::{CatalogStore, Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 8;
    let mut db_path = String::from("./fireside_dev.db");
    let mut menu_path = String::from("./menu.json");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--orders" | "-o" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(8);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--menu" | "-m" => {
                if i + 1 < args.len() {
                    menu_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Fireside POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -o, --orders <N>   Number of demo orders (default: 8)");
                println!("  -d, --db <PATH>    Database file path (default: ./fireside_dev.db)");
                println!("  -m, --menu <PATH>  Catalog file path (default: ./menu.json)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Fireside POS Seed Data Generator");
    println!("===================================");
    println!("Database: {}", db_path);
    println!("Catalog:  {}", menu_path);
    println!("Orders:   {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let store = CatalogStore::new(&menu_path);
    if store.ensure_seeded().await? {
        println!("✓ Wrote default catalog");
    } else {
        println!("✓ Using existing catalog");
    }
    let catalog = store.load().await?;
    println!("  {} items in {} categories", catalog.item_count(), catalog.categories.len());

    let existing = db.orders().list(&OrderFilter::new().limit(1)).await?;
    if !existing.is_empty() {
        println!();
        println!("⚠ Database already has orders");
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Placing demo orders...");

    let now = Utc::now();
    let seeded = seed_demo_orders(&db, &catalog, count, now).await?;
    for order in &seeded {
        println!(
            "  #{:<4} {:<8} {:<9} {:>9}  {}{}",
            order.id,
            order.customer_name,
            order.service_type.label(),
            order.total.to_string(),
            order.status.label(),
            if order.paid { "  (paid)" } else { "" }
        );
    }

    let summary = db.orders().daily_summary(now.date_naive()).await?;

    println!();
    println!("✓ Placed {} orders", seeded.len());
    println!(
        "  Today: {} orders, gross {}, average ticket {}",
        summary.order_count, summary.gross, summary.average_ticket
    );
    println!();
    println!("✓ Seed complete!");

    Ok(())
}
