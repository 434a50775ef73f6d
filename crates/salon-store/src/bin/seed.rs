//! # Seed Data Generator
//!
//! Populates a data directory with a sample salon for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./data
//! cargo run -p salon-store --bin seed
//!
//! # Specify data directory
//! cargo run -p salon-store --bin seed -- --dir /tmp/salon
//! ```
//!
//! ## Generated Data
//! - Services: cuts, colour, treatments
//! - Inventory: retail hair products with stock
//! - Promotions: two bundles
//! - Customers: a handful of regulars
//! - Ledger: two weeks of sales, recorded through the Sale Recorder so
//!   categories, promotion ids and stock all come out as in real use

use std::env;

use salon_core::sale::SaleInput;
use salon_core::types::PromotionItem;
use salon_core::{Customer, Product, Service};
use salon_store::{Store, StoreConfig};

/// (name, unit cost, price)
const SERVICES: &[(&str, f64, f64)] = &[
    ("Haircut", 50.0, 300.0),
    ("Kids Haircut", 30.0, 200.0),
    ("Hair Wash", 20.0, 150.0),
    ("Color", 350.0, 1200.0),
    ("Keratin Treatment", 600.0, 2500.0),
    ("Blow Dry", 25.0, 250.0),
];

/// (name, unit cost, retail price, stock)
const PRODUCTS: &[(&str, f64, f64, i64)] = &[
    ("Shampoo", 120.0, 250.0, 24),
    ("Conditioner", 130.0, 270.0, 18),
    ("Hair Wax", 80.0, 190.0, 12),
    ("Hair Serum", 210.0, 450.0, 6),
];

/// (name, bundled items)
const PROMOTIONS: &[(&str, &[&str])] = &[
    ("Cut + Wash", &["Haircut", "Hair Wash"]),
    ("Color Care Set", &["Color", "Shampoo", "Conditioner"]),
];

/// (name, phone, birthday)
const CUSTOMERS: &[(&str, &str, &str)] = &[
    ("Nok", "081-234-5678", "1990-04-12"),
    ("Ploy", "089-555-0101", "1995-11-02"),
    ("Mai", "086-777-2323", "1988-07-30"),
    ("Beam", "082-100-9090", "2001-01-15"),
];

/// (day of month, customer, item, quantity, price, unit cost)
const SALES: &[(u32, &str, &str, i64, f64, f64)] = &[
    (1, "Nok", "Haircut", 1, 300.0, 50.0),
    (1, "Nok", "Shampoo", 1, 250.0, 120.0),
    (2, "Ploy", "Color", 1, 1200.0, 350.0),
    (3, "Mai", "Cut + Wash", 1, 380.0, 70.0),
    (4, "Beam", "Kids Haircut", 2, 200.0, 30.0),
    (5, "Nok", "Hair Wax", 2, 190.0, 80.0),
    (7, "Ploy", "Keratin Treatment", 1, 2500.0, 600.0),
    (8, "Mai", "Blow Dry", 1, 250.0, 25.0),
    (9, "Beam", "Color Care Set", 1, 1500.0, 600.0),
    (10, "Nok", "Haircut", 1, 300.0, 50.0),
    (11, "Ploy", "Conditioner", 3, 270.0, 130.0),
    (12, "Mai", "Hair Serum", 1, 450.0, 210.0),
    (13, "Beam", "Hair Wash", 1, 150.0, 20.0),
    (14, "Nok", "Color", 1, 1200.0, 350.0),
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut data_dir = String::from("./data");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--dir" | "-d" => {
                if i + 1 < args.len() {
                    data_dir = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Salon Ledger Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --dir <PATH>   Data directory (default: ./data)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Salon Ledger Seed Data Generator");
    println!("===================================");
    println!("Data directory: {}", data_dir);
    println!();

    let store = Store::open(StoreConfig::new(&data_dir))?;

    let existing = store.ledger().read_all().rows.len();
    if existing > 0 {
        println!("⚠ Ledger already has {} rows", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete {} to regenerate.", store.ledger().path().display());
        return Ok(());
    }

    let services: Vec<Service> = SERVICES
        .iter()
        .map(|(name, cost, price)| Service::new(*name, *cost, *price))
        .collect();
    store.services().save(&services)?;
    println!("✓ {} services", services.len());

    let products: Vec<Product> = PRODUCTS
        .iter()
        .map(|(name, cost, price, stock)| {
            let mut product = Product::new(*name, *cost, *price, *stock);
            product.date_purchase = Some("2025-02-01".to_string());
            product
        })
        .collect();
    store.inventory().save(&products)?;
    println!("✓ {} inventory items", products.len());

    let customers: Vec<Customer> = CUSTOMERS
        .iter()
        .map(|(name, phone, birthday)| Customer {
            name: name.to_string(),
            phone: Some(phone.to_string()),
            birthday: Some(birthday.to_string()),
            ..Default::default()
        })
        .collect();
    store.customers().save(&customers)?;
    println!("✓ {} customers", customers.len());

    let promotions = store.promotions();
    for (name, items) in PROMOTIONS {
        let bundle = items
            .iter()
            .map(|item| PromotionItem::Named(item.to_string()))
            .collect();
        let promotion = promotions.add(name, bundle)?;
        println!("✓ promotion #{} {}", promotion.id, promotion.name);
    }

    println!();
    println!("Recording sales...");
    for (day, customer, item, quantity, price, cost) in SALES {
        let input = SaleInput::new(*item, *quantity, *price, *cost)
            .on(format!("2025-03-{:02}", day))
            .for_customer(*customer);
        let recorded = store.record_sale(input)?;
        let entry = &recorded.entry;
        println!(
            "  {} {} × {} ({})",
            entry.date, entry.item, entry.quantity, entry.category
        );
    }

    println!();
    println!("✓ Seeded {} sales into {}", SALES.len(), store.ledger().path().display());
    Ok(())
}
