//! # salon-core: Pure Business Logic for the Salon Ledger
//!
//! Everything that turns the salon's sales ledger into numbers lives here,
//! as pure functions over in-memory data.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Salon Ledger Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      salon-cli                                  │   │
//! │  │    summary ──► items ──► daily ──► simulate ──► record          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 salon-store (File Layer)                        │   │
//! │  │       jobs.csv, services.json, inventory.json, promotions.json  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ raw records, catalog snapshot          │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ salon-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐   │   │
//! │  │   │  ledger  │─►│ normalize │─►│ analytics │  │  pricing  │   │   │
//! │  │   │ layouts  │  │  backfill │  │  reports  │  │ simulator │   │   │
//! │  │   └──────────┘  └───────────┘  └───────────┘  └───────────┘   │   │
//! │  │   ┌──────────┐  ┌───────────┐  ┌───────────┐                  │   │
//! │  │   │migration │  │   sale    │  │   money   │                  │   │
//! │  │   │heuristic │  │  rules    │  │  Baht     │                  │   │
//! │  │   └──────────┘  └───────────┘  └───────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK • NO LOGGING • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Catalog, promotion, customer and ledger records
//! - [`ledger`] - Column layouts of every ledger version and row parsing
//! - [`normalize`] - Coercion and backfill into the normalized table
//! - [`analytics`] - Summary metrics, item/daily/category reports
//! - [`pricing`] - Pricing simulator
//! - [`migration`] - One-time unit-cost correction
//! - [`sale`] - Building a ledger row and the stock side effect
//! - [`validation`] - Sale input rules
//! - [`money`] - Baht display and rounding
//! - [`coerce`] - Lenient number parsing
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use salon_core::analytics::summarize;
//! use salon_core::ledger::parse_records;
//! use salon_core::normalize::normalize;
//! use salon_core::CatalogSnapshot;
//!
//! let rows = vec![
//!     (1, salon_core::ledger::CURRENT_HEADER.to_vec()),
//!     (2, vec!["2025-03-01", "Nok", "Haircut", "1", "300", "50", "service", ""]),
//! ];
//! let records = rows
//!     .into_iter()
//!     .map(|(line, cells)| (line, cells.into_iter().map(String::from).collect()));
//!
//! let table = normalize(parse_records(records), &CatalogSnapshot::default());
//! let metrics = summarize(&table.entries);
//! assert_eq!(metrics.net_profit, 250.0);
//! assert_eq!(metrics.service_percentage, 100.0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod analytics;
pub mod coerce;
pub mod error;
pub mod ledger;
pub mod migration;
pub mod money;
pub mod normalize;
pub mod pricing;
pub mod sale;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ParseError, ValidationError};
pub use ledger::{ParsedLedger, SkippedRow};
pub use money::Baht;
pub use normalize::{LedgerTable, NormalizedEntry};
pub use types::*;
