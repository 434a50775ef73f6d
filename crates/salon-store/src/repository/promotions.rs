//! # Promotion Repository
//!
//! `promotions.json` plus a persistent id counter in `promotions.seq.json`.
//!
//! ## Id Assignment
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  list-length rule (older app)        persistent counter (this store)   │
//! │  ────────────────────────────        ──────────────────────────────    │
//! │  add A        → id 1                 add A        → id 1               │
//! │  add B        → id 2                 add B        → id 2               │
//! │  remove A     → [B:2]                remove A     → [B:2], last_id 2   │
//! │  add C        → id 2  (duplicate!)   add C        → id 3               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `next id = max(last_id, highest id in the file) + 1`, so a counter file
//! that is missing or behind the data never hands out an id in use.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

use salon_core::types::PromotionItem;
use salon_core::Promotion;

use super::json::{write_atomic, JsonCollection};
use crate::error::{StoreError, StoreResult};

/// The id the list-length rule would assign for a list of `count` promotions.
pub fn legacy_promotion_id(count: usize) -> i64 {
    count as i64 + 1
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct Counter {
    #[serde(default)]
    last_id: i64,
}

#[derive(Debug, Clone)]
pub struct PromotionRepository {
    collection: JsonCollection<Promotion>,
    counter_path: PathBuf,
}

impl PromotionRepository {
    pub fn new(path: impl Into<PathBuf>, counter_path: impl Into<PathBuf>) -> Self {
        PromotionRepository {
            collection: JsonCollection::new(path, "Promotion"),
            counter_path: counter_path.into(),
        }
    }

    pub fn list(&self) -> Vec<Promotion> {
        self.collection.load()
    }

    pub fn find(&self, name: &str) -> Option<Promotion> {
        self.collection.find(name)
    }

    /// Creates a promotion with the next id and returns it.
    pub fn add(&self, name: &str, items: Vec<PromotionItem>) -> StoreResult<Promotion> {
        let mut promotions = self.collection.try_load()?;
        let highest = promotions.iter().map(|p| p.id).max().unwrap_or(0);
        let id = self.last_id().max(highest) + 1;

        let promotion = Promotion {
            id,
            name: name.trim().to_string(),
            promotion: items,
            ..Default::default()
        };
        promotions.push(promotion.clone());

        // counter first: a crash in between burns an id instead of reusing one
        self.store_last_id(id)?;
        self.collection.save(&promotions)?;
        info!(id, name = %promotion.name, "Promotion created");
        Ok(promotion)
    }

    /// Removes the promotion with `id`. Its id is never handed out again.
    pub fn remove(&self, id: i64) -> StoreResult<Promotion> {
        let mut promotions = self.collection.try_load()?;
        let index = promotions
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found("Promotion", id))?;
        let removed = promotions.remove(index);
        self.collection.save(&promotions)?;
        info!(id, "Promotion removed");
        Ok(removed)
    }

    fn last_id(&self) -> i64 {
        let bytes = match std::fs::read(&self.counter_path) {
            Ok(bytes) => bytes,
            Err(_) => return 0,
        };
        match serde_json::from_slice::<Counter>(&bytes) {
            Ok(counter) => counter.last_id,
            Err(err) => {
                warn!(path = ?self.counter_path, error = %err, "Unreadable promotion counter");
                0
            }
        }
    }

    fn store_last_id(&self, last_id: i64) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(&Counter { last_id })
            .map_err(|e| StoreError::json(&self.counter_path, e))?;
        write_atomic(&self.counter_path, &bytes)
    }
}
