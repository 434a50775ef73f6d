//! # Commands Module
//!
//! One function per subcommand. Each returns the text to print.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (output helpers)
//! ├── reports.rs    ◄─── summary, items, daily, categories, jobs
//! ├── pricing.rs    ◄─── simulate
//! ├── sale.rs       ◄─── record
//! ├── migrate.rs    ◄─── migrate
//! └── customers.rs  ◄─── customers
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  fn summary(store: &Store, json: bool) -> CliResult<String>            │
//! │         │                                                               │
//! │         ├── store.ledger_table()     read + normalize (never fails)    │
//! │         ├── salon_core::analytics    pure computation                  │
//! │         │                                                               │
//! │         └── render(&value, json, |v| text)                             │
//! │               json  ──► serde_json pretty                              │
//! │               text  ──► closure                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reports never fail on bad data: missing files and unreadable rows give
//! zeroed output. Only `record` rejects input.

pub mod customers;
pub mod migrate;
pub mod pricing;
pub mod reports;
pub mod sale;

use serde::Serialize;

use crate::error::CliResult;

/// Serializes `value` as pretty JSON, or formats it with `text`.
pub(crate) fn render<T, F>(value: &T, json: bool, text: F) -> CliResult<String>
where
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    if json {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(text(value))
    }
}

/// `12.34%`
pub(crate) fn pct(value: f64) -> String {
    format!("{:.2}%", value)
}
