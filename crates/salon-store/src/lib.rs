//! # salon-store: File Storage for the Salon Ledger
//!
//! This crate owns the data directory: four JSON stores and the CSV ledger.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Salon Ledger Data Flow                           │
//! │                                                                         │
//! │  salon-cli (record / summary / simulate ...)                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   salon-store (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │    Store      │    │ Repositories  │    │  Recorder /  │  │   │
//! │  │   │  (store.rs)   │    │  json, ledger │    │  Migration   │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ StoreConfig   │───►│ services      │◄───│ record_sale  │  │   │
//! │  │   │ data dir      │    │ inventory     │    │ migrate_     │  │   │
//! │  │   │               │    │ customers ... │    │   ledger     │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  <data dir>/ jobs.csv services.json inventory.json              │   │
//! │  │              customers.json promotions.json promotions.seq.json │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Data directory and file names
//! - [`store`] - The `Store` handle
//! - [`repository`] - One repository per file
//! - [`recorder`] - Sale Recorder
//! - [`reports`] - Catalog snapshot and normalized ledger for reports
//! - [`migrate`] - One-time ledger migration
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use salon_core::analytics::summarize;
//! use salon_core::sale::SaleInput;
//! use salon_store::{Store, StoreConfig};
//!
//! # fn main() -> Result<(), salon_store::StoreError> {
//! let store = Store::open(StoreConfig::load(None)?)?;
//!
//! store.record_sale(SaleInput::new("Haircut", 1, 300.0, 50.0).for_customer("Nok"))?;
//!
//! let metrics = summarize(&store.ledger_table().entries);
//! println!("net profit {}", metrics.net_profit);
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrate;
pub mod recorder;
pub mod reports;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use migrate::{migrate_ledger, MigrationReport};
pub use recorder::RecordedSale;
pub use store::Store;

// Repository re-exports for convenience
pub use repository::{
    CustomerRepository, InventoryRepository, LedgerRepository, PromotionRepository,
    ServiceRepository,
};
