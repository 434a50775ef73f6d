//! # Ledger Normalizer
//!
//! Turns parsed ledger rows into the normalized table every report reads.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Normalization Steps                              │
//! │                                                                         │
//! │  ParsedRow (text cells, columns maybe absent)                          │
//! │       │                                                                 │
//! │       ├── quantity  → non-negative integer (garbage → 0)               │
//! │       ├── price     → f64 (garbage → 0)                                │
//! │       ├── cost      → f64 unit cost; absent → catalog unit cost        │
//! │       ├── category  → recorded label; absent → backfill               │
//! │       ├── date      → YYYY-MM-DD when recognizable, raw text otherwise │
//! │       │                                                                 │
//! │       ├── revenue   = price × quantity                                 │
//! │       └── profit    = total_profit if recorded                         │
//! │                       else (price − cost) × quantity                   │
//! │       ▼                                                                 │
//! │  NormalizedEntry                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The normalizer does not sort. Rows keep file order; reports that need
//! chronological order ask the table for it.
//!
//! Cost columns that hold a line total instead of a unit cost are NOT fixed
//! here. That correction is lossy and lives in [`crate::migration`], which
//! runs once, explicitly, against the file.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::cmp::Ordering;
use ts_rs::TS;

use crate::coerce::{coerce_amount, coerce_quantity};
use crate::ledger::{non_blank, ParsedLedger, ParsedRow, SkippedRow};
use crate::types::{CatalogSnapshot, Category};

/// Date-only formats accepted on read, tried in order.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y"];

/// Date-time formats accepted on read (the date part is kept).
const DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

// =============================================================================
// Normalized Entry
// =============================================================================

/// One ledger row after coercion and backfill.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct NormalizedEntry {
    /// Canonical `YYYY-MM-DD` when the source date was recognizable.
    pub date: String,
    #[serde(skip)]
    #[ts(skip)]
    pub day: Option<NaiveDate>,
    pub customer: String,
    pub item: String,
    pub quantity: i64,
    pub price: f64,
    /// Unit cost.
    pub cost: f64,
    /// `cost × quantity`
    pub line_cost: f64,
    pub category: Category,
    /// False when the category was backfilled from the stores.
    pub category_recorded: bool,
    pub promotion_id: Option<i64>,
    pub revenue: f64,
    pub profit: f64,
    /// 1-based line in the source file.
    pub line: u64,
}

// =============================================================================
// Ledger Table
// =============================================================================

/// The normalized table plus the rows that could not be read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerTable {
    pub entries: Vec<NormalizedEntry>,
    pub skipped: Vec<SkippedRow>,
}

impl LedgerTable {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when every row carried its own category column.
    ///
    /// An empty table has no recorded categories.
    pub fn categories_recorded(&self) -> bool {
        !self.entries.is_empty() && self.entries.iter().all(|e| e.category_recorded)
    }

    /// Oldest first. Undated rows go last, in file order.
    pub fn chronological(&self) -> Vec<&NormalizedEntry> {
        let mut rows: Vec<&NormalizedEntry> = self.entries.iter().collect();
        rows.sort_by(|a, b| compare_days(a.day, b.day));
        rows
    }

    /// Newest first, for display. Undated rows go last.
    pub fn newest_first(&self) -> Vec<&NormalizedEntry> {
        let mut rows: Vec<&NormalizedEntry> = self.entries.iter().collect();
        rows.sort_by(|a, b| match (a.day, b.day) {
            (Some(x), Some(y)) => y.cmp(&x),
            _ => compare_days(a.day, b.day),
        });
        rows
    }
}

/// Ascending by day, `None` after every dated row.
pub(crate) fn compare_days(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// =============================================================================
// Normalization
// =============================================================================

/// Normalizes a parsed ledger against the current catalog.
pub fn normalize(parsed: ParsedLedger, catalog: &CatalogSnapshot) -> LedgerTable {
    let cost_map = catalog.cost_map();

    let entries = parsed
        .rows
        .iter()
        .map(|row| normalize_row(row, catalog, |item| cost_map.get(item).copied()))
        .collect();

    LedgerTable {
        entries,
        skipped: parsed.skipped,
    }
}

fn normalize_row<F>(
    row: &ParsedRow,
    catalog: &CatalogSnapshot,
    unit_cost_of: F,
) -> NormalizedEntry
where
    F: Fn(&str) -> Option<f64>,
{
    let raw = &row.raw;
    let item = raw.item.clone().unwrap_or_default();
    let quantity = raw.quantity.as_deref().map(coerce_quantity).unwrap_or(0);
    let price = raw.price.as_deref().map(coerce_amount).unwrap_or(0.0);

    let cost = match raw.cost.as_deref() {
        Some(cell) => coerce_amount(cell),
        None => unit_cost_of(&item).unwrap_or(0.0),
    };

    let (category, category_recorded) = match non_blank(&raw.category) {
        Some(label) => (Category::from_cell(label), true),
        None => (catalog.backfill_category(&item), false),
    };

    let promotion_id = non_blank(&raw.promotion_id).and_then(|id| id.parse::<i64>().ok());

    let date_text = non_blank(&raw.date)
        .or_else(|| non_blank(&raw.timestamp))
        .unwrap_or_default();
    let (date, day) = normalize_date(date_text);

    let qty = quantity as f64;
    let revenue = price * qty;
    let profit = match non_blank(&raw.total_profit) {
        Some(recorded) => coerce_amount(recorded),
        None => (price - cost) * qty,
    };

    NormalizedEntry {
        date,
        day,
        customer: raw.customer.clone().unwrap_or_default(),
        item,
        quantity,
        price,
        cost,
        line_cost: cost * qty,
        category,
        category_recorded,
        promotion_id,
        revenue,
        profit,
        line: row.line,
    }
}

/// Canonicalizes a free-text date.
///
/// Returns `(YYYY-MM-DD, Some(day))` when the text is recognizable and
/// `(trimmed text, None)` otherwise.
pub fn normalize_date(text: &str) -> (String, Option<NaiveDate>) {
    let text = text.trim();
    match parse_day(text) {
        Some(day) => (day.format("%Y-%m-%d").to_string(), Some(day)),
        None => (text.to_string(), None),
    }
}

fn parse_day(text: &str) -> Option<NaiveDate> {
    if text.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::parse_records;
    use crate::types::{Product, Promotion, Service};

    fn catalog() -> CatalogSnapshot {
        CatalogSnapshot::new(
            vec![Service::new("Haircut", 50.0, 300.0)],
            vec![Product::new("Shampoo", 120.0, 250.0, 10)],
            vec![Promotion {
                id: 1,
                name: "Spa Day".into(),
                ..Default::default()
            }],
        )
    }

    fn table(lines: &[&str]) -> LedgerTable {
        let records = lines.iter().enumerate().map(|(i, line)| {
            (
                i as u64 + 1,
                line.split(',').map(str::to_string).collect::<Vec<_>>(),
            )
        });
        normalize(parse_records(records), &catalog())
    }

    #[test]
    fn test_revenue_and_profit_from_unit_cost() {
        let t = table(&[
            "date,customer,item,quantity,price,cost,category,promotion_id",
            "2025-02-01,Nok,Shampoo,3,250,120,product,",
        ]);
        let e = &t.entries[0];
        assert_eq!(e.revenue, 750.0);
        assert_eq!(e.profit, (250.0 - 120.0) * 3.0);
        assert_eq!(e.line_cost, 360.0);
        assert!(e.category_recorded);
    }

    #[test]
    fn test_total_profit_is_authoritative() {
        let t = table(&[
            "date,customer,item,quantity,price,cost,category,promotion_id,total_profit",
            "2025-02-01,Nok,Shampoo,3,250,120,product,,17.5",
        ]);
        assert_eq!(t.entries[0].profit, 17.5);
    }

    #[test]
    fn test_bad_numbers_become_zero_and_row_is_kept() {
        let t = table(&[
            "date,customer,item,quantity,price,cost,category,promotion_id",
            "2025-02-01,Nok,Shampoo,lots,abc,,product,",
        ]);
        assert_eq!(t.len(), 1);
        let e = &t.entries[0];
        assert_eq!((e.quantity, e.price, e.cost), (0, 0.0, 0.0));
        assert_eq!(e.revenue, 0.0);
    }

    #[test]
    fn test_absent_cost_and_category_are_backfilled() {
        let t = table(&[
            "2024-06-01T09:00:00,2024-06-01,Nok,Shampoo,2,250",
            "2024-06-01T09:30:00,2024-06-01,Nok,Haircut,1,300",
            "2024-06-02T09:30:00,2024-06-02,Ploy,Spa Day,1,900",
        ]);
        let shampoo = &t.entries[0];
        assert_eq!(shampoo.cost, 120.0);
        assert_eq!(shampoo.line_cost, 240.0);
        assert_eq!(shampoo.category, Category::Product);
        assert_eq!(shampoo.profit, (250.0 - 120.0) * 2.0);
        assert!(!shampoo.category_recorded);

        // services are never backfilled; old service rows stay unknown
        assert_eq!(t.entries[1].category, Category::Unknown);
        assert_eq!(t.entries[1].cost, 50.0);

        // promotions match retroactively
        assert_eq!(t.entries[2].category, Category::Promotion);
        assert!(!t.categories_recorded());
    }

    #[test]
    fn test_date_normalization() {
        assert_eq!(normalize_date("2025-03-04").0, "2025-03-04");
        assert_eq!(normalize_date("04/03/2025").0, "2025-03-04");
        assert_eq!(normalize_date("2025/03/04").0, "2025-03-04");
        assert_eq!(normalize_date("2025-03-04T10:11:12.123456").0, "2025-03-04");
        assert_eq!(normalize_date("2025-03-04T10:11:12+07:00").0, "2025-03-04");
        assert_eq!(normalize_date(" yesterday "), ("yesterday".to_string(), None));
    }

    #[test]
    fn test_missing_date_falls_back_to_timestamp() {
        let t = table(&["2024-06-01T09:00:00,,Nok,Shampoo,1,250"]);
        assert_eq!(t.entries[0].date, "2024-06-01");
    }

    #[test]
    fn test_chronological_order_puts_undated_last() {
        let t = table(&[
            "date,customer,item,quantity,price",
            "2025-02-03,A,X,1,1",
            "someday,B,X,1,1",
            "2025-02-01,C,X,1,1",
        ]);
        let order: Vec<_> = t.chronological().iter().map(|e| e.customer.as_str()).collect();
        assert_eq!(order, vec!["C", "A", "B"]);
        let order: Vec<_> = t.newest_first().iter().map(|e| e.customer.as_str()).collect();
        assert_eq!(order, vec!["A", "C", "B"]);
    }

    #[test]
    fn test_reading_twice_is_identical() {
        let lines = [
            "date,customer,item,quantity,price,cost,category,promotion_id",
            "2025-02-01,Nok,Shampoo,3,250,120,product,",
            "2025-02-02,Ploy,Spa Day,1,900,400,promotion,1",
        ];
        assert_eq!(table(&lines), table(&lines));
    }

    #[test]
    fn test_empty_input() {
        let t = table(&[]);
        assert!(t.is_empty());
        assert!(!t.categories_recorded());
    }
}
