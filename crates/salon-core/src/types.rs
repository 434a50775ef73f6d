//! # Domain Types
//!
//! Core domain types used throughout the salon ledger.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Service      │   │    Product      │   │   Promotion     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  name           │   │  name           │   │  id (counter)   │       │
//! │  │  cost (unit)    │   │  cost (unit)    │   │  name           │       │
//! │  │  price          │   │  retail_price   │   │  promotion [..] │       │
//! │  └─────────────────┘   │  current_qty    │   └─────────────────┘       │
//! │   services.json        └─────────────────┘    promotions.json          │
//! │                         inventory.json                                 │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  LedgerEntry    │   │    Category     │   │    Customer     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  one jobs.csv   │   │  service        │   │  name           │       │
//! │  │  row            │   │  product        │   │  phone          │       │
//! │  │                 │   │  promotion      │   │  birthday       │       │
//! │  │                 │   │  unknown        │   │  note           │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Names Are Keys
//! Nothing in the salon's files has an id except promotions. Catalog items,
//! ledger rows and customers refer to each other by exact, case-sensitive
//! name. Duplicate names are possible; every lookup here returns the first
//! match in file order.
//!
//! ## Unknown Fields
//! Each JSON record keeps a flattened `extra` map so a whole-file rewrite
//! never drops keys written by another version of the app.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::coerce;
use crate::error::CoreError;

// =============================================================================
// Category
// =============================================================================

/// Classification of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Service,
    Product,
    Promotion,
    #[default]
    Unknown,
}

impl Category {
    /// The label written to the ledger.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::Service => "service",
            Category::Product => "product",
            Category::Promotion => "promotion",
            Category::Unknown => "unknown",
        }
    }

    /// Lenient read of a ledger cell: anything unrecognized is `Unknown`.
    pub fn from_cell(cell: &str) -> Self {
        cell.parse().unwrap_or_default()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    /// Exact labels only. Ledger grouping is case-sensitive, so is this.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "service" => Ok(Category::Service),
            "product" => Ok(Category::Product),
            "promotion" => Ok(Category::Promotion),
            "unknown" => Ok(Category::Unknown),
            other => Err(CoreError::not_found("Category", other)),
        }
    }
}

// =============================================================================
// Catalog: Service
// =============================================================================

/// A service on the menu (cut, colour, treatment).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Service {
    #[serde(default)]
    pub name: String,

    /// Cost to the salon per service performed.
    #[serde(rename = "cost", alias = "unit_cost", default, with = "coerce::amount")]
    pub unit_cost: f64,

    /// Current list price.
    #[serde(default, with = "coerce::amount")]
    pub price: f64,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Service {
    pub fn new(name: impl Into<String>, unit_cost: f64, price: f64) -> Self {
        Service {
            name: name.into(),
            unit_cost,
            price,
            extra: Map::new(),
        }
    }
}

// =============================================================================
// Catalog: Product
// =============================================================================

/// A retail product tracked in inventory.
///
/// `current_quantity` is signed: recording a sale always decrements it, even
/// past zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub name: String,

    #[serde(default, with = "coerce::count")]
    pub initial_quantity: i64,

    #[serde(default, with = "coerce::count")]
    pub current_quantity: i64,

    /// Cost to the salon per unit.
    #[serde(rename = "cost", alias = "unit_cost", default, with = "coerce::amount")]
    pub unit_cost: f64,

    #[serde(default, with = "coerce::amount")]
    pub retail_price: f64,

    #[serde(default, with = "coerce::amount")]
    pub discount: f64,

    #[serde(default)]
    pub last_date_sell: Option<String>,

    #[serde(default)]
    pub date_purchase: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    pub fn new(name: impl Into<String>, unit_cost: f64, retail_price: f64, quantity: i64) -> Self {
        Product {
            name: name.into(),
            initial_quantity: quantity,
            current_quantity: quantity,
            unit_cost,
            retail_price,
            ..Default::default()
        }
    }
}

// =============================================================================
// Catalog Item
// =============================================================================

/// Either kind of catalog entry, borrowed from its store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CatalogItem<'a> {
    Service(&'a Service),
    Product(&'a Product),
}

impl<'a> CatalogItem<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            CatalogItem::Service(s) => &s.name,
            CatalogItem::Product(p) => &p.name,
        }
    }

    pub fn unit_cost(&self) -> f64 {
        match self {
            CatalogItem::Service(s) => s.unit_cost,
            CatalogItem::Product(p) => p.unit_cost,
        }
    }

    /// `price` for services, `retail_price` for products.
    pub fn list_price(&self) -> f64 {
        match self {
            CatalogItem::Service(s) => s.price,
            CatalogItem::Product(p) => p.retail_price,
        }
    }
}

// =============================================================================
// Promotion
// =============================================================================

/// One entry of a promotion bundle.
///
/// Older promotions list bare item names; newer ones store objects with at
/// least a `name` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PromotionItem {
    Named(String),
    Detailed(Map<String, Value>),
}

impl PromotionItem {
    pub fn name(&self) -> Option<&str> {
        match self {
            PromotionItem::Named(name) => Some(name),
            PromotionItem::Detailed(map) => map.get("name").and_then(Value::as_str),
        }
    }
}

/// A named bundle of catalog items sold as one ledger line.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Promotion {
    #[serde(default, with = "coerce::count")]
    pub id: i64,

    /// Matched against the ledger's `item` column.
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub promotion: Vec<PromotionItem>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// =============================================================================
// Customer
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub birthday: Option<String>,
    #[serde(default)]
    pub note: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// =============================================================================
// Ledger Entry
// =============================================================================

/// One sale in the shape the ledger is written today.
///
/// `price` and `cost` are unit values frozen at the time of sale. Reports
/// never recompute them from the current catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub date: String,
    pub customer: String,
    pub item: String,
    pub quantity: i64,
    pub price: f64,
    /// Unit cost.
    pub cost: f64,
    pub category: Category,
    pub promotion_id: Option<i64>,
    /// Only written by the migration runner; authoritative when present.
    pub total_profit: Option<f64>,
}

impl LedgerEntry {
    /// `price × quantity`
    pub fn revenue(&self) -> f64 {
        self.price * self.quantity as f64
    }

    /// `total_profit` when recorded, else `(price − cost) × quantity`.
    pub fn profit(&self) -> f64 {
        self.total_profit
            .unwrap_or((self.price - self.cost) * self.quantity as f64)
    }
}

// =============================================================================
// Catalog Snapshot
// =============================================================================

/// The three stores as loaded for one request.
///
/// Nothing is cached between requests; the store crate builds a fresh
/// snapshot every time a report is produced or a sale is recorded.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    pub services: Vec<Service>,
    pub products: Vec<Product>,
    pub promotions: Vec<Promotion>,
}

impl CatalogSnapshot {
    pub fn new(services: Vec<Service>, products: Vec<Product>, promotions: Vec<Promotion>) -> Self {
        CatalogSnapshot {
            services,
            products,
            promotions,
        }
    }

    pub fn find_service(&self, name: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.name == name)
    }

    pub fn find_product(&self, name: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.name == name)
    }

    pub fn find_promotion(&self, name: &str) -> Option<&Promotion> {
        self.promotions.iter().find(|p| p.name == name)
    }

    /// First catalog entry with this name, services before products.
    pub fn find_item(&self, name: &str) -> Option<CatalogItem<'_>> {
        self.find_service(name)
            .map(CatalogItem::Service)
            .or_else(|| self.find_product(name).map(CatalogItem::Product))
    }

    /// Merged `name → unit cost` over services then products.
    ///
    /// On duplicate names the first entry wins.
    pub fn cost_map(&self) -> HashMap<&str, f64> {
        let mut map = HashMap::with_capacity(self.services.len() + self.products.len());
        let items = self
            .services
            .iter()
            .map(CatalogItem::Service)
            .chain(self.products.iter().map(CatalogItem::Product));
        for item in items {
            map.entry(item.name()).or_insert(item.unit_cost());
        }
        map
    }

    pub fn product_names(&self) -> Vec<&str> {
        self.products.iter().map(|p| p.name.as_str()).collect()
    }

    /// Category for a ledger row that was written without one.
    ///
    /// ```text
    ///   promotions.json ──► inventory.json ──► unknown
    /// ```
    ///
    /// Services are deliberately not consulted: rows from before categories
    /// existed stay `unknown` unless they name a product, or a promotion
    /// defined later (the match is retroactive).
    pub fn backfill_category(&self, item: &str) -> Category {
        if self.find_promotion(item).is_some() {
            Category::Promotion
        } else if self.find_product(item).is_some() {
            Category::Product
        } else {
            Category::Unknown
        }
    }

    /// Category for a sale being recorded now, against current store contents.
    ///
    /// ```text
    ///   promotions.json ──► inventory.json ──► services.json ──► unknown
    /// ```
    pub fn resolve_category(&self, item: &str) -> Category {
        match self.backfill_category(item) {
            Category::Unknown if self.find_service(item).is_some() => Category::Service,
            category => category,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
