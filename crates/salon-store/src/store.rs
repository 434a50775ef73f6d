//! # Store Handle
//!
//! Entry point to the data directory.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  StoreConfig::load(None)?          ← env > salon.toml > defaults       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Store::open(config)?              ← creates the data directory        │
//! │       │                                                                 │
//! │       ├── store.services()        ServiceRepository                   │
//! │       ├── store.inventory()       InventoryRepository                 │
//! │       ├── store.customers()       CustomerRepository                  │
//! │       ├── store.promotions()      PromotionRepository                 │
//! │       └── store.ledger()          LedgerRepository                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories hold only a path; creating one is free and every call
//! reads the file again.

use tracing::debug;

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::repository::{
    CustomerRepository, InventoryRepository, LedgerRepository, PromotionRepository,
    ServiceRepository,
};

#[derive(Debug, Clone)]
pub struct Store {
    config: StoreConfig,
}

impl Store {
    /// Opens (and if needed creates) the data directory.
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        config.validate()?;
        std::fs::create_dir_all(&config.data_dir)
            .map_err(|e| StoreError::io(&config.data_dir, e))?;
        debug!(dir = ?config.data_dir, "Store opened");
        Ok(Store { config })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn services(&self) -> ServiceRepository {
        ServiceRepository::new(self.config.services_path(), "Service")
    }

    pub fn inventory(&self) -> InventoryRepository {
        InventoryRepository::new(self.config.inventory_path(), "Product")
    }

    pub fn customers(&self) -> CustomerRepository {
        CustomerRepository::new(self.config.customers_path(), "Customer")
    }

    pub fn promotions(&self) -> PromotionRepository {
        PromotionRepository::new(
            self.config.promotions_path(),
            self.config.promotion_counter_path(),
        )
    }

    pub fn ledger(&self) -> LedgerRepository {
        LedgerRepository::new(self.config.ledger_path())
    }
}
