//! # Sale Recording Rules
//!
//! The pure half of the Sale Recorder: turning operator input into a ledger
//! row and applying the stock side effect to an in-memory inventory.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SaleInput                                                              │
//! │      │                                                                  │
//! │      ├── validate (item, quantity, price, cost)   ──✗──► ValidationError│
//! │      ├── category    = resolve against current stores                  │
//! │      │                 promotion → product → service → unknown         │
//! │      ├── promotion_id = promotion's id when category is promotion      │
//! │      ▼                                                                  │
//! │  LedgerEntry  ──► appended by the store crate                          │
//! │                                                                         │
//! │  apply_stock_decrement(inventory, item, qty, date)                     │
//! │      first product with that name: current_quantity −= qty            │
//! │                                    last_date_sell = date              │
//! │      no floor at zero; services and promotions untouched               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{CatalogSnapshot, Category, LedgerEntry, Product};
use crate::validation::{validate_amount, validate_item_name, validate_quantity, ValidationResult};

/// What the operator submits for one sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleInput {
    /// Free text; the store fills in today when blank.
    pub date: String,
    pub customer: String,
    pub item: String,
    pub quantity: i64,
    /// Unit price charged.
    pub price: f64,
    /// Unit cost.
    pub cost: f64,
}

impl SaleInput {
    pub fn new(item: impl Into<String>, quantity: i64, price: f64, cost: f64) -> Self {
        SaleInput {
            date: String::new(),
            customer: String::new(),
            item: item.into(),
            quantity,
            price,
            cost,
        }
    }

    pub fn on(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    pub fn for_customer(mut self, customer: impl Into<String>) -> Self {
        self.customer = customer.into();
        self
    }
}

/// Checks every field; the first failure wins.
pub fn validate_sale(input: &SaleInput) -> ValidationResult<()> {
    validate_item_name(&input.item)?;
    validate_quantity(input.quantity)?;
    validate_amount("price", input.price)?;
    validate_amount("cost", input.cost)?;
    Ok(())
}

/// Builds the ledger row for a sale against the current stores.
pub fn build_entry(input: &SaleInput, catalog: &CatalogSnapshot) -> ValidationResult<LedgerEntry> {
    validate_sale(input)?;

    let item = input.item.trim().to_string();
    let category = catalog.resolve_category(&item);
    let promotion_id = match category {
        Category::Promotion => catalog.find_promotion(&item).map(|p| p.id),
        _ => None,
    };

    Ok(LedgerEntry {
        date: input.date.trim().to_string(),
        customer: input.customer.trim().to_string(),
        item,
        quantity: input.quantity,
        price: input.price,
        cost: input.cost,
        category,
        promotion_id,
        total_profit: None,
    })
}

/// The inventory change made by one sale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockChange {
    /// Position in the inventory list.
    pub index: usize,
    pub before: i64,
    pub after: i64,
}

/// Decrements the first product named `item`.
///
/// Returns `None` when no product has that name.
pub fn apply_stock_decrement(
    products: &mut [Product],
    item: &str,
    quantity: i64,
    date: &str,
) -> Option<StockChange> {
    let (index, product) = products.iter_mut().enumerate().find(|(_, p)| p.name == item)?;
    let before = product.current_quantity;
    product.current_quantity -= quantity;
    product.last_date_sell = Some(date.to_string());
    Some(StockChange {
        index,
        before,
        after: product.current_quantity,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
