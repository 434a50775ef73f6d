//! # Repository Module
//!
//! One repository per file in the data directory.
//!
//! ## Files
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Repository               File                   Written by            │
//! │  ─────────────────────    ─────────────────────  ───────────────────── │
//! │  ServiceRepository        services.json          catalog edits         │
//! │  InventoryRepository      inventory.json         catalog edits, sales  │
//! │  CustomerRepository       customers.json         customer edits        │
//! │  PromotionRepository      promotions.json        promotion edits       │
//! │                           promotions.seq.json                          │
//! │  LedgerRepository         jobs.csv               sales (append),       │
//! │                                                  migration (rewrite)   │
//! │                                                                         │
//! │  Every read re-opens the file. Nothing is cached between calls.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod customers;
pub mod inventory;
pub mod json;
pub mod ledger;
pub mod promotions;
pub mod services;

pub use customers::CustomerRepository;
pub use inventory::InventoryRepository;
pub use json::{JsonCollection, Named};
pub use ledger::LedgerRepository;
pub use promotions::{legacy_promotion_id, PromotionRepository};
pub use services::ServiceRepository;
