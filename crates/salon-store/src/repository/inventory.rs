//! # Inventory Repository
//!
//! `inventory.json`: retail products and their stock counters.
//!
//! ## Stock Decrement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record_sale(item, qty, date)                                          │
//! │                                                                         │
//! │  try_load ──► apply_stock_decrement (first name match) ──► save        │
//! │                                                                         │
//! │  • unconditional: stock may go negative                                │
//! │  • not locked: two recorders that load the same file both save,        │
//! │    and the later save drops the earlier decrement                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{debug, info};

use salon_core::sale::{apply_stock_decrement, StockChange};
use salon_core::Product;

use super::json::JsonCollection;
use crate::error::StoreResult;

pub type InventoryRepository = JsonCollection<Product>;

impl JsonCollection<Product> {
    /// Applies a sale to the matching product, if there is one.
    pub fn record_sale(
        &self,
        item: &str,
        quantity: i64,
        date: &str,
    ) -> StoreResult<Option<StockChange>> {
        let mut products = self.try_load()?;
        let Some(change) = apply_stock_decrement(&mut products, item, quantity, date) else {
            debug!(item, "Not an inventory item, stock unchanged");
            return Ok(None);
        };
        self.save(&products)?;
        info!(
            item,
            before = change.before,
            after = change.after,
            "Stock decremented"
        );
        Ok(Some(change))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn repo(dir: &TempDir) -> InventoryRepository {
        InventoryRepository::new(dir.path().join("inventory.json"), "Product")
    }

    #[test]
    fn test_record_sale_decrements_and_stamps_date() {
        let dir = TempDir::new().unwrap();
        let inventory = repo(&dir);
        inventory.save(&[Product::new("Shampoo", 120.0, 250.0, 10)]).unwrap();

        let change = inventory.record_sale("Shampoo", 3, "2025-03-01").unwrap().unwrap();
        assert_eq!(change.after, 7);

        let shampoo = inventory.find("Shampoo").unwrap();
        assert_eq!(shampoo.current_quantity, 7);
        assert_eq!(shampoo.initial_quantity, 10);
        assert_eq!(shampoo.last_date_sell.as_deref(), Some("2025-03-01"));
    }

    #[test]
    fn test_unknown_item_leaves_file_alone() {
        let dir = TempDir::new().unwrap();
        let inventory = repo(&dir);
        assert!(inventory.record_sale("Haircut", 1, "2025-03-01").unwrap().is_none());
        assert!(!inventory.path().exists());
    }
}
