//! # Ledger Migration
//!
//! One-time rewrite of a legacy ledger into the current shape plus a
//! `total_profit` column.
//!
//! ## The Cost Column Problem
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Older versions of the app wrote the LINE cost into `cost`:            │
//! │                                                                         │
//! │     item     qty  price  cost          meaning                         │
//! │     Wax       3    100    300    ←──   3 × 100 total, not per unit     │
//! │                                                                         │
//! │  Newer versions write the UNIT cost. Nothing in the file says which.   │
//! │                                                                         │
//! │  Heuristic:  cost > price  AND  quantity > 1   ⇒  cost ÷= quantity    │
//! │                                                                         │
//! │  Known misfire: a real loss-leader (unit cost above unit price) sold   │
//! │  in quantity is "corrected" too. That is accepted behavior.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The heuristic is lossy, so it never runs on the read path. The store
//! crate applies [`migrate_rows`] once, after taking a backup of the file.
//!
//! Rows that already carry `total_profit` were migrated before and pass
//! through unchanged, so running the migration twice is harmless.

use crate::coerce::{coerce_amount, coerce_quantity};
use crate::ledger::{non_blank, ParsedLedger};
use crate::normalize::normalize_date;
use crate::types::{CatalogSnapshot, Category, LedgerEntry};

/// Result of migrating a parsed ledger.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MigrationOutcome {
    /// Every readable row, in file order, with `total_profit` filled in.
    pub entries: Vec<LedgerEntry>,
    /// How many rows had their cost divided by quantity.
    pub corrected: usize,
    /// Rows no layout accepted. They are dropped from the rewritten file.
    pub dropped: usize,
}

/// Recovers a unit cost from a cost cell of unknown meaning.
///
/// Returns the unit cost and whether the heuristic fired.
pub fn disambiguate_unit_cost(price: f64, cost: f64, quantity: i64) -> (f64, bool) {
    if cost > price && quantity > 1 {
        (cost / quantity as f64, true)
    } else {
        (cost, false)
    }
}

/// Converts every parsed row to the migrated shape.
pub fn migrate_rows(parsed: &ParsedLedger, catalog: &CatalogSnapshot) -> MigrationOutcome {
    let cost_map = catalog.cost_map();
    let mut outcome = MigrationOutcome {
        dropped: parsed.skipped.len(),
        ..Default::default()
    };

    for row in &parsed.rows {
        let raw = &row.raw;
        let item = raw.item.clone().unwrap_or_default();
        let quantity = raw.quantity.as_deref().map(coerce_quantity).unwrap_or(0);
        let price = raw.price.as_deref().map(coerce_amount).unwrap_or(0.0);
        let recorded_profit = non_blank(&raw.total_profit).map(coerce_amount);

        let cost = match raw.cost.as_deref() {
            // catalog costs are unit costs already
            None => cost_map.get(item.as_str()).copied().unwrap_or(0.0),
            Some(cell) if recorded_profit.is_some() => coerce_amount(cell),
            Some(cell) => {
                let (unit, fired) = disambiguate_unit_cost(price, coerce_amount(cell), quantity);
                if fired {
                    outcome.corrected += 1;
                }
                unit
            }
        };

        let category = match non_blank(&raw.category) {
            Some(label) => Category::from_cell(label),
            None => catalog.backfill_category(&item),
        };

        let promotion_id = non_blank(&raw.promotion_id)
            .and_then(|id| id.parse::<i64>().ok())
            .or_else(|| match category {
                Category::Promotion => catalog.find_promotion(&item).map(|p| p.id),
                _ => None,
            });

        let date = match non_blank(&raw.date) {
            Some(date) => date.to_string(),
            None => normalize_date(non_blank(&raw.timestamp).unwrap_or_default()).0,
        };

        let total_profit = recorded_profit.unwrap_or((price - cost) * quantity as f64);

        outcome.entries.push(LedgerEntry {
            date,
            customer: raw.customer.clone().unwrap_or_default(),
            item,
            quantity,
            price,
            cost,
            category,
            promotion_id,
            total_profit: Some(total_profit),
        });
    }

    outcome
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::parse_records;
    use crate::types::Product;

    fn parse(lines: &[&str]) -> ParsedLedger {
        parse_records(lines.iter().enumerate().map(|(i, line)| {
            (
                i as u64 + 1,
                line.split(',').map(str::to_string).collect::<Vec<_>>(),
            )
        }))
    }

    #[test]
    fn test_total_cost_is_divided_back_to_unit_cost() {
        let parsed = parse(&["t,2024-01-05,Nok,Wax,3,100,300"]);
        let outcome = migrate_rows(&parsed, &CatalogSnapshot::default());

        let entry = &outcome.entries[0];
        assert_eq!(entry.cost, 100.0);
        assert_eq!(entry.total_profit, Some(0.0));
        assert_eq!(outcome.corrected, 1);
    }

    #[test]
    fn test_single_unit_is_never_corrected() {
        assert_eq!(disambiguate_unit_cost(100.0, 300.0, 1), (300.0, false));
    }

    #[test]
    fn test_unit_cost_below_price_is_untouched() {
        assert_eq!(disambiguate_unit_cost(250.0, 120.0, 4), (120.0, false));
    }

    #[test]
    fn test_loss_leader_is_misclassified() {
        // unit cost 80 genuinely above unit price 50; the heuristic still divides
        let (unit, fired) = disambiguate_unit_cost(50.0, 80.0, 2);
        assert!(fired);
        assert_eq!(unit, 40.0);
    }

    #[test]
    fn test_missing_cost_uses_catalog_unit_cost() {
        let wax = Product::new("Wax", 80.0, 150.0, 5);
        let catalog = CatalogSnapshot::new(vec![], vec![wax], vec![]);
        let parsed = parse(&["t,2024-01-05,Nok,Wax,2,150"]);
        let outcome = migrate_rows(&parsed, &catalog);

        let entry = &outcome.entries[0];
        assert_eq!(entry.cost, 80.0);
        assert_eq!(entry.category, Category::Product);
        assert_eq!(entry.total_profit, Some(140.0));
        assert_eq!(outcome.corrected, 0);
    }

    #[test]
    fn test_already_migrated_rows_pass_through() {
        let parsed = parse(&[
            "date,customer,item,quantity,price,cost,category,promotion_id,total_profit",
            "2024-01-05,Nok,Wax,3,100,300,product,,-600",
        ]);
        let outcome = migrate_rows(&parsed, &CatalogSnapshot::default());

        let entry = &outcome.entries[0];
        assert_eq!(entry.cost, 300.0);
        assert_eq!(entry.total_profit, Some(-600.0));
        assert_eq!(outcome.corrected, 0);
    }

    #[test]
    fn test_unreadable_rows_are_counted() {
        let parsed = parse(&["only,three,cells", "t,2024-01-05,Nok,Wax,1,100"]);
        let outcome = migrate_rows(&parsed, &CatalogSnapshot::default());
        assert_eq!(outcome.entries.len(), 1);
        assert_eq!(outcome.dropped, 1);
    }
}
