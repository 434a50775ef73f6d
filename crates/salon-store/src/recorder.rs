//! # Sale Recorder
//!
//! Validates a sale, appends it to the ledger and applies the stock change.
//!
//! ## Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record_sale(input)                                                     │
//! │     │                                                                   │
//! │     ├── blank date → today (local, YYYY-MM-DD)                         │
//! │     ├── catalog snapshot (fresh read of all three stores)              │
//! │     ├── build_entry  ──✗──► StoreError::Validation   (nothing written) │
//! │     │                                                                   │
//! │     ├── ledger.append(entry)          ← the sale is now recorded       │
//! │     │                                                                   │
//! │     └── inventory.record_sale(..)     ← best effort                    │
//! │            failure is logged; the ledger row stays                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The ledger and the inventory are separate files with no transaction
//! between them. Stock is not reconciled against sales.

use chrono::Local;
use serde::Serialize;
use tracing::{info, warn};

use salon_core::sale::{build_entry, SaleInput, StockChange};
use salon_core::LedgerEntry;

use crate::error::StoreResult;
use crate::store::Store;

/// What a recorded sale changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedSale {
    pub entry: LedgerEntry,
    /// `None` when the item is not an inventory product, or the inventory
    /// could not be updated.
    pub stock: Option<StockChange>,
}

impl Store {
    /// Records one sale.
    pub fn record_sale(&self, mut input: SaleInput) -> StoreResult<RecordedSale> {
        if input.date.trim().is_empty() {
            input.date = Local::now().format("%Y-%m-%d").to_string();
        }

        let entry = build_entry(&input, &self.catalog())?;
        self.ledger().append(&entry)?;

        let stock = match self
            .inventory()
            .record_sale(&entry.item, entry.quantity, &entry.date)
        {
            Ok(change) => change,
            Err(err) => {
                warn!(item = %entry.item, error = %err, "Sale recorded but stock not updated");
                None
            }
        };

        info!(
            item = %entry.item,
            category = %entry.category,
            quantity = entry.quantity,
            price = entry.price,
            "Sale recorded"
        );
        Ok(RecordedSale { entry, stock })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::error::StoreError;
    use salon_core::Category;
    use tempfile::TempDir;

    #[test]
    fn test_blank_date_defaults_to_today() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(StoreConfig::in_dir(dir.path())).unwrap();
        let recorded = store
            .record_sale(SaleInput::new("Haircut", 1, 300.0, 50.0))
            .unwrap();
        assert_eq!(
            recorded.entry.date,
            Local::now().format("%Y-%m-%d").to_string()
        );
        assert_eq!(recorded.entry.category, Category::Unknown);
    }

    #[test]
    fn test_rejected_sale_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(StoreConfig::in_dir(dir.path())).unwrap();
        let err = store
            .record_sale(SaleInput::new("", 1, 300.0, 50.0))
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(!store.ledger().exists());
        assert!(!store.inventory().path().exists());
    }

    #[test]
    fn test_broken_inventory_does_not_lose_the_sale() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(StoreConfig::in_dir(dir.path())).unwrap();
        std::fs::write(store.inventory().path(), "[{broken").unwrap();

        let recorded = store
            .record_sale(SaleInput::new("Shampoo", 1, 250.0, 120.0).on("2025-03-01"))
            .unwrap();
        assert!(recorded.stock.is_none());
        assert_eq!(store.ledger_table().len(), 1);
    }
}
