//! # Ledger Layouts
//!
//! Parses raw `jobs.csv` records under schema uncertainty.
//!
//! ## Layout History
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  jobs.csv Column Layouts (newest first)                 │
//! │                                                                         │
//! │  Current (header row written)                                          │
//! │    date,customer,item,quantity,price,cost,category,promotion_id        │
//! │                                                                         │
//! │  Migrated (header row written, §migration)                             │
//! │    ...current columns...,total_profit                                  │
//! │                                                                         │
//! │  Legacy, no header:                                                    │
//! │    timestamp,date,customer,item,quantity,price,cost,category    (8)    │
//! │    timestamp,date,customer,item,quantity,price,cost             (7)    │
//! │    timestamp,date,customer,item,quantity,price                  (6)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Parse Strategy
//! ```text
//!   first record names item/quantity/price?
//!        │
//!        ├── yes ──► Named layout for every row of matching width
//!        │             (rows of another width fall through ▼)
//!        │
//!        └── no ───► per row, first fixed layout that accepts it:
//!                      Current → TimestampedWithCategory
//!                              → TimestampedWithCost → Timestamped
//!                      none accepts → SkippedRow
//! ```
//!
//! Two layouts are eight columns wide. They are told apart by content: the
//! current layout has a category label in column 7, the timestamped one has
//! it in column 8 and a cost in column 7.
//!
//! Every attempt is a pure function from a raw row to
//! `Result<RawEntry, ParseError>`. Nothing is coerced here; the normalizer
//! owns coercion and backfill.

use crate::error::ParseError;
use crate::types::Category;

/// Header written when the ledger file is created.
pub const CURRENT_HEADER: [&str; 8] = [
    "date",
    "customer",
    "item",
    "quantity",
    "price",
    "cost",
    "category",
    "promotion_id",
];

/// Header written by the migration runner.
pub const MIGRATED_HEADER: [&str; 9] = [
    "date",
    "customer",
    "item",
    "quantity",
    "price",
    "cost",
    "category",
    "promotion_id",
    "total_profit",
];

// =============================================================================
// Columns
// =============================================================================

/// A column the reader knows how to interpret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Timestamp,
    Date,
    Customer,
    Item,
    Quantity,
    Price,
    Cost,
    Category,
    PromotionId,
    TotalProfit,
}

impl Column {
    /// Exact, case-sensitive header names.
    pub fn from_header(name: &str) -> Option<Column> {
        match name.trim() {
            "timestamp" => Some(Column::Timestamp),
            "date" => Some(Column::Date),
            "customer" => Some(Column::Customer),
            "item" => Some(Column::Item),
            "quantity" => Some(Column::Quantity),
            "price" => Some(Column::Price),
            "cost" => Some(Column::Cost),
            "category" => Some(Column::Category),
            "promotion_id" => Some(Column::PromotionId),
            "total_profit" => Some(Column::TotalProfit),
            _ => None,
        }
    }
}

// =============================================================================
// Raw Entry
// =============================================================================

/// One ledger row split into known columns, still as text.
///
/// `None` means the layout has no such column; `Some("")` means the column
/// exists but the cell is blank. The difference matters: an absent `cost`
/// is backfilled from the catalog, a blank one coerces to 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEntry {
    pub timestamp: Option<String>,
    pub date: Option<String>,
    pub customer: Option<String>,
    pub item: Option<String>,
    pub quantity: Option<String>,
    pub price: Option<String>,
    pub cost: Option<String>,
    pub category: Option<String>,
    pub promotion_id: Option<String>,
    pub total_profit: Option<String>,
}

impl RawEntry {
    fn set(&mut self, column: Column, value: &str) {
        let slot = match column {
            Column::Timestamp => &mut self.timestamp,
            Column::Date => &mut self.date,
            Column::Customer => &mut self.customer,
            Column::Item => &mut self.item,
            Column::Quantity => &mut self.quantity,
            Column::Price => &mut self.price,
            Column::Cost => &mut self.cost,
            Column::Category => &mut self.category,
            Column::PromotionId => &mut self.promotion_id,
            Column::TotalProfit => &mut self.total_profit,
        };
        *slot = Some(value.to_string());
    }

    fn from_columns(columns: &[Column], row: &[String]) -> Self {
        let mut raw = RawEntry::default();
        for (column, value) in columns.iter().zip(row) {
            raw.set(*column, value);
        }
        raw
    }
}

/// Returns the cell's trimmed text when it is present and not blank.
pub fn non_blank(cell: &Option<String>) -> Option<&str> {
    cell.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

// =============================================================================
// Header Map
// =============================================================================

/// Column positions taken from a header row.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderMap {
    columns: Vec<Option<Column>>,
}

impl HeaderMap {
    /// Recognizes a header row: it must name at least `item`, `quantity`
    /// and `price`. Anything else is treated as data.
    pub fn from_record(record: &[String]) -> Option<HeaderMap> {
        let columns: Vec<Option<Column>> =
            record.iter().map(|cell| Column::from_header(cell)).collect();
        let has = |wanted: Column| columns.iter().any(|c| *c == Some(wanted));

        if has(Column::Item) && has(Column::Quantity) && has(Column::Price) {
            Some(HeaderMap { columns })
        } else {
            None
        }
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Header cells in file order; `None` for names the reader ignores.
    pub fn columns(&self) -> &[Option<Column>] {
        &self.columns
    }

    pub fn contains(&self, column: Column) -> bool {
        self.columns.iter().any(|c| *c == Some(column))
    }

    /// Parses a data row against this header.
    pub fn parse(&self, row: &[String]) -> Result<RawEntry, ParseError> {
        if row.len() != self.width() {
            return Err(ParseError::ColumnCount {
                expected: self.width(),
                found: row.len(),
            });
        }
        reject_empty(row)?;

        let mut raw = RawEntry::default();
        for (column, value) in self.columns.iter().zip(row) {
            if let Some(column) = column {
                raw.set(*column, value);
            }
        }
        Ok(raw)
    }
}

// =============================================================================
// Fixed Layouts
// =============================================================================

/// A headerless layout with a fixed column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedLayout {
    /// Current schema appended to a file that has no header row.
    Current,
    /// `timestamp,date,customer,item,quantity,price,cost,category`
    TimestampedWithCategory,
    /// `timestamp,date,customer,item,quantity,price,cost`
    TimestampedWithCost,
    /// `timestamp,date,customer,item,quantity,price`
    Timestamped,
}

/// Order in which headerless rows are tried.
pub const FIXED_LAYOUTS: [FixedLayout; 4] = [
    FixedLayout::Current,
    FixedLayout::TimestampedWithCategory,
    FixedLayout::TimestampedWithCost,
    FixedLayout::Timestamped,
];

impl FixedLayout {
    pub fn columns(&self) -> &'static [Column] {
        use Column::*;
        match self {
            FixedLayout::Current => &[
                Date,
                Customer,
                Item,
                Quantity,
                Price,
                Cost,
                Category,
                PromotionId,
            ],
            FixedLayout::TimestampedWithCategory => &[
                Timestamp, Date, Customer, Item, Quantity, Price, Cost, Category,
            ],
            FixedLayout::TimestampedWithCost => {
                &[Timestamp, Date, Customer, Item, Quantity, Price, Cost]
            }
            FixedLayout::Timestamped => &[Timestamp, Date, Customer, Item, Quantity, Price],
        }
    }

    /// Parses a headerless row as this layout.
    pub fn parse(&self, row: &[String]) -> Result<RawEntry, ParseError> {
        let columns = self.columns();
        if row.len() != columns.len() {
            return Err(ParseError::ColumnCount {
                expected: columns.len(),
                found: row.len(),
            });
        }
        reject_empty(row)?;

        let raw = RawEntry::from_columns(columns, row);
        match self {
            FixedLayout::Current => {
                require_category(raw.category.as_deref().unwrap_or_default())?;
                if let Some(id) = non_blank(&raw.promotion_id) {
                    id.parse::<i64>()
                        .map_err(|_| ParseError::InvalidPromotionId {
                            value: id.to_string(),
                        })?;
                }
            }
            FixedLayout::TimestampedWithCategory => {
                if let Some(label) = non_blank(&raw.category) {
                    require_category(label)?;
                }
            }
            FixedLayout::TimestampedWithCost | FixedLayout::Timestamped => {}
        }
        Ok(raw)
    }
}

fn reject_empty(row: &[String]) -> Result<(), ParseError> {
    if row.iter().all(|cell| cell.trim().is_empty()) {
        Err(ParseError::EmptyRow)
    } else {
        Ok(())
    }
}

fn require_category(label: &str) -> Result<Category, ParseError> {
    label
        .parse::<Category>()
        .map_err(|_| ParseError::UnrecognizedCategory {
            value: label.to_string(),
        })
}

/// Tries every fixed layout in order; returns the first that accepts the row.
pub fn parse_headerless(row: &[String]) -> Result<(FixedLayout, RawEntry), ParseError> {
    let mut last_err = ParseError::EmptyRow;
    for layout in FIXED_LAYOUTS {
        match layout.parse(row) {
            Ok(raw) => return Ok((layout, raw)),
            Err(ParseError::EmptyRow) => return Err(ParseError::EmptyRow),
            Err(err) => last_err = err,
        }
    }
    Err(last_err)
}

// =============================================================================
// Whole-File Parse
// =============================================================================

/// Which layout accepted a row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowLayout {
    Named,
    Fixed(FixedLayout),
}

/// A row that parsed, with its 1-based line number.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    pub line: u64,
    pub layout: RowLayout,
    pub raw: RawEntry,
}

/// A row no layout accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    pub line: u64,
    pub reason: ParseError,
}

/// Result of splitting a whole ledger into raw entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedLedger {
    pub header: Option<HeaderMap>,
    pub rows: Vec<ParsedRow>,
    pub skipped: Vec<SkippedRow>,
}

/// Parses every record of a ledger file.
///
/// `records` yields `(line, fields)` in file order. A recognized header on
/// the first record switches on named parsing; rows whose width does not
/// match the header are still tried against the fixed layouts so that a
/// file with mixed history reads back as much as possible.
pub fn parse_records<I>(records: I) -> ParsedLedger
where
    I: IntoIterator<Item = (u64, Vec<String>)>,
{
    let mut ledger = ParsedLedger::default();
    let mut records = records.into_iter().peekable();

    if let Some((_, first)) = records.peek() {
        if let Some(header) = HeaderMap::from_record(first) {
            ledger.header = Some(header);
            records.next();
        }
    }

    for (line, row) in records {
        let parsed = match &ledger.header {
            Some(header) => match header.parse(&row) {
                Ok(raw) => Ok((RowLayout::Named, raw)),
                Err(ParseError::ColumnCount { .. }) => {
                    parse_headerless(&row).map(|(l, raw)| (RowLayout::Fixed(l), raw))
                }
                Err(err) => Err(err),
            },
            None => parse_headerless(&row).map(|(l, raw)| (RowLayout::Fixed(l), raw)),
        };

        match parsed {
            Ok((layout, raw)) => ledger.rows.push(ParsedRow { line, layout, raw }),
            Err(reason) => ledger.skipped.push(SkippedRow { line, reason }),
        }
    }

    ledger
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    fn numbered(rows: Vec<Vec<String>>) -> Vec<(u64, Vec<String>)> {
        rows.into_iter()
            .enumerate()
            .map(|(i, r)| (i as u64 + 1, r))
            .collect()
    }

    #[test]
    fn test_current_header_is_recognized() {
        let header = HeaderMap::from_record(&row(&CURRENT_HEADER)).unwrap();
        assert_eq!(header.width(), 8);
        assert!(header.contains(Column::PromotionId));
        assert!(!header.contains(Column::TotalProfit));
    }

    #[test]
    fn test_data_row_is_not_a_header() {
        let data = row(&["2025-01-01", "Nok", "Haircut", "1", "300", "50", "service", ""]);
        assert!(HeaderMap::from_record(&data).is_none());
    }

    #[test]
    fn test_headerless_current_row() {
        let data = row(&["2025-01-01", "Nok", "Haircut", "1", "300", "50", "service", ""]);
        let (layout, raw) = parse_headerless(&data).unwrap();
        assert_eq!(layout, FixedLayout::Current);
        assert_eq!(raw.item.as_deref(), Some("Haircut"));
        assert_eq!(raw.timestamp, None);
    }

    #[test]
    fn test_eight_column_legacy_row_is_told_apart_by_content() {
        let data = row(&[
            "2024-05-01T10:00:00",
            "2024-05-01",
            "Nok",
            "Wax",
            "2",
            "150",
            "80",
            "product",
        ]);
        let (layout, raw) = parse_headerless(&data).unwrap();
        assert_eq!(layout, FixedLayout::TimestampedWithCategory);
        assert_eq!(raw.cost.as_deref(), Some("80"));
        assert_eq!(raw.category.as_deref(), Some("product"));
    }

    #[test]
    fn test_seven_and_six_column_rows() {
        let seven = row(&["ts", "2024-01-01", "A", "Wax", "1", "150", "80"]);
        let (layout, raw) = parse_headerless(&seven).unwrap();
        assert_eq!(layout, FixedLayout::TimestampedWithCost);
        assert_eq!(raw.category, None);

        let six = row(&["ts", "2024-01-01", "A", "Wax", "1", "150"]);
        let (layout, raw) = parse_headerless(&six).unwrap();
        assert_eq!(layout, FixedLayout::Timestamped);
        assert_eq!(raw.cost, None);
    }

    #[test]
    fn test_unknown_width_is_rejected() {
        let five = row(&["a", "b", "c", "d", "e"]);
        assert_eq!(
            parse_headerless(&five).unwrap_err(),
            ParseError::ColumnCount {
                expected: 6,
                found: 5
            }
        );
        assert_eq!(
            parse_headerless(&row(&["", " ", "", "", "", ""])).unwrap_err(),
            ParseError::EmptyRow
        );
    }

    #[test]
    fn test_parse_records_with_header_and_stray_legacy_rows() {
        let parsed = parse_records(numbered(vec![
            row(&MIGRATED_HEADER),
            row(&["2025-01-01", "Nok", "Wax", "3", "100", "100", "product", "", "0"]),
            row(&["2025-01-02", "Ploy", "Haircut", "1", "300", "50", "service", ""]),
            row(&["junk"]),
        ]));

        assert!(parsed.header.is_some());
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[0].layout, RowLayout::Named);
        assert_eq!(parsed.rows[0].raw.total_profit.as_deref(), Some("0"));
        assert_eq!(parsed.rows[1].layout, RowLayout::Fixed(FixedLayout::Current));
        assert_eq!(parsed.skipped.len(), 1);
        assert_eq!(parsed.skipped[0].line, 4);
    }

    #[test]
    fn test_parse_records_unknown_layout_fails_open() {
        let parsed = parse_records(numbered(vec![row(&["x", "y"]), row(&["1", "2"])]));
        assert!(parsed.header.is_none());
        assert!(parsed.rows.is_empty());
        assert_eq!(parsed.skipped.len(), 2);
    }
}
