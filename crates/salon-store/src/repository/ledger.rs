//! # Ledger Repository
//!
//! `jobs.csv`: the append-only sales ledger.
//!
//! ## File Shapes Seen in the Wild
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  current      date,customer,item,quantity,price,cost,category,         │
//! │               promotion_id                          (header row)       │
//! │  migrated     ... same + total_profit               (header row)       │
//! │  legacy       timestamp,date,customer,item,quantity,price[,cost        │
//! │               [,category]]                          (no header)        │
//! │                                                                         │
//! │  One file can hold several of these: new rows were appended to old     │
//! │  files without rewriting them.                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This module only moves records between the file and memory. Deciding
//! which layout a record has is `salon_core::ledger`'s job.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use salon_core::ledger::{
    parse_records, Column, HeaderMap, ParsedLedger, CURRENT_HEADER, MIGRATED_HEADER,
};
use salon_core::LedgerEntry;

use super::json::write_atomic;
use crate::error::{StoreError, StoreResult};

#[derive(Debug, Clone)]
pub struct LedgerRepository {
    path: PathBuf,
}

impl LedgerRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        LedgerRepository { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Every record of the file, split into layouts.
    ///
    /// Never fails: a missing or unreadable file is an empty ledger, and a
    /// record the CSV reader cannot decode is skipped with a warning.
    pub fn read_all(&self) -> ParsedLedger {
        match self.read_records() {
            Ok(records) => parse_records(records),
            Err(err) => {
                warn!(error = %err, "Unreadable ledger, treating as empty");
                ParsedLedger::default()
            }
        }
    }

    fn read_records(&self) -> StoreResult<Vec<(u64, Vec<String>)>> {
        let mut reader = match csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)
        {
            Ok(reader) => reader,
            Err(err) if is_not_found(&err) => {
                debug!(path = ?self.path, "Ledger missing, empty");
                return Ok(Vec::new());
            }
            Err(err) => return Err(StoreError::csv(&self.path, err)),
        };

        let mut records = Vec::new();
        for (index, result) in reader.records().enumerate() {
            match result {
                Ok(record) => {
                    let line = record
                        .position()
                        .map(|p| p.line())
                        .unwrap_or(index as u64 + 1);
                    records.push((line, record.iter().map(str::to_string).collect()));
                }
                Err(err) => {
                    warn!(record = index + 1, error = %err, "Skipping undecodable ledger record")
                }
            }
        }
        debug!(count = records.len(), "Read ledger records");
        Ok(records)
    }

    /// Appends one sale.
    ///
    /// A missing or empty file gets the current header first. A file with a
    /// header gets the row in that header's column order: `timestamp` and
    /// `total_profit` are filled in, unknown columns stay blank. A headerless
    /// file gets the current eight columns.
    pub fn append(&self, entry: &LedgerEntry) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|e| StoreError::io(&self.path, e))?;

        let len = file
            .metadata()
            .map_err(|e| StoreError::io(&self.path, e))?
            .len();
        let header = if len > 0 { self.header()? } else { None };
        if len > 0 && !ends_with_newline(&mut file).map_err(|e| StoreError::io(&self.path, e))? {
            file.write_all(b"\n").map_err(|e| StoreError::io(&self.path, e))?;
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_writer(file);

        let io = |e: csv::Error| StoreError::csv(&self.path, e);
        if len == 0 {
            writer.write_record(CURRENT_HEADER).map_err(io)?;
        }

        let record = match &header {
            Some(header) => record_in_order(entry, header.columns()),
            None => entry_record(entry),
        };
        writer.write_record(&record).map_err(io)?;
        writer.flush().map_err(|e| StoreError::io(&self.path, e))?;

        info!(item = %entry.item, quantity = entry.quantity, "Ledger row appended");
        Ok(())
    }

    /// Replaces the whole file with migrated rows (with `total_profit`).
    pub fn rewrite_migrated(&self, entries: &[LedgerEntry]) -> StoreResult<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        let io = |e: csv::Error| StoreError::csv(&self.path, e);

        writer.write_record(MIGRATED_HEADER).map_err(io)?;
        for entry in entries {
            let mut record = entry_record(entry);
            record.push(format_amount(entry.total_profit.unwrap_or_else(|| entry.profit())));
            writer.write_record(&record).map_err(io)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| StoreError::io(&self.path, e.into_error()))?;

        write_atomic(&self.path, &bytes)
    }

    /// The header of the file, if its first record is one.
    fn header(&self) -> StoreResult<Option<HeaderMap>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| StoreError::csv(&self.path, e))?;

        let mut first = csv::StringRecord::new();
        let found = reader
            .read_record(&mut first)
            .map_err(|e| StoreError::csv(&self.path, e))?;
        if !found {
            return Ok(None);
        }
        let cells: Vec<String> = first.iter().map(str::to_string).collect();
        Ok(HeaderMap::from_record(&cells))
    }
}

/// The eight current-schema fields of a sale.
fn entry_record(entry: &LedgerEntry) -> Vec<String> {
    vec![
        entry.date.clone(),
        entry.customer.clone(),
        entry.item.clone(),
        entry.quantity.to_string(),
        format_amount(entry.price),
        format_amount(entry.cost),
        entry.category.as_str().to_string(),
        entry.promotion_id.map(|id| id.to_string()).unwrap_or_default(),
    ]
}

/// The sale laid out under an existing header.
fn record_in_order(entry: &LedgerEntry, columns: &[Option<Column>]) -> Vec<String> {
    columns
        .iter()
        .map(|column| match column {
            Some(Column::Timestamp) => format!("{}T00:00:00", entry.date),
            Some(Column::Date) => entry.date.clone(),
            Some(Column::Customer) => entry.customer.clone(),
            Some(Column::Item) => entry.item.clone(),
            Some(Column::Quantity) => entry.quantity.to_string(),
            Some(Column::Price) => format_amount(entry.price),
            Some(Column::Cost) => format_amount(entry.cost),
            Some(Column::Category) => entry.category.as_str().to_string(),
            Some(Column::PromotionId) => {
                entry.promotion_id.map(|id| id.to_string()).unwrap_or_default()
            }
            Some(Column::TotalProfit) => format_amount(entry.profit()),
            None => String::new(),
        })
        .collect()
}

/// Whole amounts without a fraction (`350`), others as written (`89.5`).
fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 && amount.abs() < 1e15 {
        format!("{}", amount as i64)
    } else {
        amount.to_string()
    }
}

fn is_not_found(err: &csv::Error) -> bool {
    matches!(err.kind(), csv::ErrorKind::Io(io) if io.kind() == ErrorKind::NotFound)
}

fn ends_with_newline(file: &mut std::fs::File) -> std::io::Result<bool> {
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use salon_core::ledger::RowLayout;
    use salon_core::Category;
    use tempfile::TempDir;

    fn sale(item: &str, quantity: i64, price: f64, cost: f64) -> LedgerEntry {
        LedgerEntry {
            date: "2025-03-01".into(),
            customer: "Nok".into(),
            item: item.into(),
            quantity,
            price,
            cost,
            category: Category::Product,
            promotion_id: None,
            total_profit: None,
        }
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let ledger = LedgerRepository::new(dir.path().join("jobs.csv"));
        let parsed = ledger.read_all();
        assert!(parsed.rows.is_empty());
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn test_first_append_writes_header() {
        let dir = TempDir::new().unwrap();
        let ledger = LedgerRepository::new(dir.path().join("jobs.csv"));
        ledger.append(&sale("Shampoo", 3, 250.0, 120.0)).unwrap();
        ledger.append(&sale("Wax", 1, 89.5, 40.0)).unwrap();

        let text = std::fs::read_to_string(ledger.path()).unwrap();
        assert_eq!(
            text,
            "date,customer,item,quantity,price,cost,category,promotion_id\n\
             2025-03-01,Nok,Shampoo,3,250,120,product,\n\
             2025-03-01,Nok,Wax,1,89.5,40,product,\n"
        );
    }

    #[test]
    fn test_append_to_legacy_file_without_trailing_newline() {
        let dir = TempDir::new().unwrap();
        let ledger = LedgerRepository::new(dir.path().join("jobs.csv"));
        std::fs::write(ledger.path(), "2024-01-01T10:00:00,2024-01-01,Ploy,Haircut,1,300").unwrap();

        ledger.append(&sale("Shampoo", 1, 250.0, 120.0)).unwrap();

        let parsed = ledger.read_all();
        assert_eq!(parsed.rows.len(), 2);
        assert!(parsed.skipped.is_empty());
        assert!(matches!(parsed.rows[1].layout, RowLayout::Fixed(_)));
        assert_eq!(parsed.rows[1].raw.item.as_deref(), Some("Shampoo"));
    }

    #[test]
    fn test_append_to_migrated_file_fills_total_profit() {
        let dir = TempDir::new().unwrap();
        let ledger = LedgerRepository::new(dir.path().join("jobs.csv"));
        ledger.rewrite_migrated(&[]).unwrap();
        ledger.append(&sale("Shampoo", 2, 250.0, 120.0)).unwrap();

        let parsed = ledger.read_all();
        assert_eq!(parsed.rows[0].layout, RowLayout::Named);
        assert_eq!(parsed.rows[0].raw.total_profit.as_deref(), Some("260"));
    }

    #[test]
    fn test_append_follows_timestamp_header_order() {
        let dir = TempDir::new().unwrap();
        let ledger = LedgerRepository::new(dir.path().join("jobs.csv"));
        std::fs::write(
            ledger.path(),
            "timestamp,date,customer,item,quantity,price,cost\n\
             2024-01-05T10:00:00,2024-01-05,Ploy,Haircut,1,300,50\n",
        )
        .unwrap();

        ledger.append(&sale("Wax", 2, 150.0, 80.0)).unwrap();

        let text = std::fs::read_to_string(ledger.path()).unwrap();
        assert!(text.ends_with("2025-03-01T00:00:00,2025-03-01,Nok,Wax,2,150,80\n"));

        let parsed = ledger.read_all();
        assert!(parsed.skipped.is_empty());
        let raw = &parsed.rows[1].raw;
        assert_eq!(parsed.rows[1].layout, RowLayout::Named);
        assert_eq!(raw.item.as_deref(), Some("Wax"));
        assert_eq!(raw.quantity.as_deref(), Some("2"));
        assert_eq!(raw.price.as_deref(), Some("150"));
        assert_eq!(raw.customer.as_deref(), Some("Nok"));
        assert_eq!(raw.date.as_deref(), Some("2025-03-01"));
    }

    #[test]
    fn test_unknown_header_columns_stay_blank() {
        let dir = TempDir::new().unwrap();
        let ledger = LedgerRepository::new(dir.path().join("jobs.csv"));
        std::fs::write(ledger.path(), "item,note,quantity,price\n").unwrap();

        ledger.append(&sale("Wax", 1, 100.0, 40.0)).unwrap();

        let text = std::fs::read_to_string(ledger.path()).unwrap();
        assert_eq!(text, "item,note,quantity,price\nWax,,1,100\n");
    }

    #[test]
    fn test_quoted_fields_round_trip() {
        let dir = TempDir::new().unwrap();
        let ledger = LedgerRepository::new(dir.path().join("jobs.csv"));
        let mut entry = sale("Cut, Wash & Blow", 1, 500.0, 100.0);
        entry.customer = "Nok \"VIP\"".into();
        ledger.append(&entry).unwrap();

        let parsed = ledger.read_all();
        assert_eq!(parsed.rows[0].raw.item.as_deref(), Some("Cut, Wash & Blow"));
        assert_eq!(parsed.rows[0].raw.customer.as_deref(), Some("Nok \"VIP\""));
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(350.0), "350");
        assert_eq!(format_amount(89.5), "89.5");
        assert_eq!(format_amount(-20.0), "-20");
    }
}
