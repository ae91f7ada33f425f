//! # Seed Data Generator
//!
//! Populates the database with a starter catalog for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default database
//! cargo run -p cantina-db --bin seed
//!
//! # Specify database path
//! cargo run -p cantina-db --bin seed -- --db ./data/cantina.db
//!
//! # Also run a demo sale against the seeded stock
//! cargo run -p cantina-db --bin seed -- --demo-sale
//! ```

use std::env;

use cantina_db::{Database, DbConfig};
use cantina_core::{Cart, Money, NewProduct};
use chrono::{Duration, Utc};
use tracing_subscriber::EnvFilter;

/// Starter catalog: (name, description, purchase cents, sale cents, stock).
const PRODUCTS: &[(&str, &str, i64, i64, i64)] = &[
    ("Papas Fritas", "Bolsa 45g", 80, 200, 50),
    ("Jugo de Manzana", "Caja 200ml", 120, 300, 40),
    ("Galletas de Chocolate", "Paquete 6 unidades", 150, 350, 30),
    ("Agua Mineral", "Botella 500ml", 60, 150, 60),
    ("Barra de Cereal", "Avena y miel", 100, 250, 45),
    ("Sandwich de Jamón", "Pan integral", 300, 600, 15),
    ("Fruta Picada", "Vaso de temporada", 200, 400, 20),
    ("Yogurt Bebible", "Fresa 250ml", 180, 380, 25),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./cantina_dev.db");
    let mut demo_sale = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--demo-sale" => demo_sale = true,
            "--help" | "-h" => {
                println!("Cantina Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./cantina_dev.db)");
                println!("      --demo-sale    Run one demo checkout after seeding");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Cantina Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.catalog().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Seeding catalog...");

    for (name, description, purchase, sale, stock) in PRODUCTS {
        let new_product = NewProduct {
            name: (*name).to_string(),
            description: Some((*description).to_string()),
            purchase_price_cents: *purchase,
            sale_price_cents: *sale,
            initial_quantity: *stock,
        };
        let product = db.catalog().create_product(&new_product).await?;
        println!(
            "  {} — {} ({} in stock)",
            product.name,
            Money::from_cents(product.sale_price_cents),
            stock
        );
    }

    println!();
    println!("✓ Seeded {} products", PRODUCTS.len());

    if demo_sale {
        println!();
        println!("Running demo checkout...");

        let stocked = db.catalog().list_with_stock().await?;
        let mut cart = Cart::new();
        for entry in stocked.iter().take(2) {
            let product = db
                .catalog()
                .get_by_id(entry.id)
                .await?
                .ok_or("seeded product disappeared")?;
            cart.add_item(&product, entry.quantity, 2)?;
        }

        let sale = db.checkout().finalize(&mut cart).await?;
        println!(
            "✓ Sale #{} committed: {}",
            sale.id,
            Money::from_cents(sale.total_cents)
        );

        let now = Utc::now();
        let summary = db
            .reports()
            .summary(now - Duration::hours(1), now + Duration::hours(1))
            .await?;
        println!(
            "  Today so far: {} across {} transaction(s)",
            Money::from_cents(summary.revenue_cents),
            summary.transaction_count
        );
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
