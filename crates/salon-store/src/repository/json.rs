//! # JSON Collections
//!
//! A JSON file holding one array of flat objects, read whole and written
//! whole.
//!
//! ## Read / Write Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  load()                                                                 │
//! │    file missing          → []                                          │
//! │    unreadable / bad JSON → warn!, []        (reports keep working)     │
//! │                                                                         │
//! │  try_load()             used before a rewrite                          │
//! │    file missing          → []                                          │
//! │    unreadable / bad JSON → Err             (never overwrite what we    │
//! │                                              could not read)           │
//! │                                                                         │
//! │  save(items)                                                            │
//! │    serialize (2-space indent, UTF-8 unescaped)                         │
//! │         │                                                               │
//! │         ▼                                                               │
//! │    NamedTempFile in the SAME directory ──write──► persist() = rename   │
//! │                                                                         │
//! │    A crash leaves either the old file or the new one, not half of one.│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no locking. Two processes doing load → modify → save at the
//! same time both succeed and the second rename wins.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use salon_core::{Customer, Product, Promotion, Service};

use crate::error::{StoreError, StoreResult};

/// Records that can be searched by name.
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for Service {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Product {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Customer {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Promotion {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A JSON array file of `T`, addressed by position.
#[derive(Debug, Clone)]
pub struct JsonCollection<T> {
    path: PathBuf,
    entity: &'static str,
    _marker: PhantomData<T>,
}

impl<T> JsonCollection<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>, entity: &'static str) -> Self {
        JsonCollection {
            path: path.into(),
            entity,
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every record, or an empty list when the file is missing or broken.
    pub fn load(&self) -> Vec<T> {
        match self.try_load() {
            Ok(items) => items,
            Err(err) => {
                warn!(entity = self.entity, error = %err, "Unreadable store, treating as empty");
                Vec::new()
            }
        }
    }

    /// Every record; a missing file is empty, a broken one is an error.
    pub fn try_load(&self) -> StoreResult<Vec<T>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(entity = self.entity, path = ?self.path, "Store file missing, empty");
                return Ok(Vec::new());
            }
            Err(err) => return Err(StoreError::io(&self.path, err)),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        let items: Vec<T> =
            serde_json::from_slice(&bytes).map_err(|e| StoreError::json(&self.path, e))?;
        debug!(entity = self.entity, count = items.len(), "Loaded store");
        Ok(items)
    }

    /// Replaces the file with `items` atomically.
    pub fn save(&self, items: &[T]) -> StoreResult<()> {
        let bytes =
            serde_json::to_vec_pretty(items).map_err(|e| StoreError::json(&self.path, e))?;
        write_atomic(&self.path, &bytes)?;
        debug!(entity = self.entity, count = items.len(), "Saved store");
        Ok(())
    }

    /// Appends one record and returns its index.
    pub fn add(&self, item: T) -> StoreResult<usize> {
        let mut items = self.try_load()?;
        items.push(item);
        self.save(&items)?;
        info!(entity = self.entity, index = items.len() - 1, "Record added");
        Ok(items.len() - 1)
    }

    /// Replaces the record at `index`.
    pub fn update(&self, index: usize, item: T) -> StoreResult<()> {
        let mut items = self.try_load()?;
        let slot = items
            .get_mut(index)
            .ok_or_else(|| StoreError::not_found(self.entity, index))?;
        *slot = item;
        self.save(&items)?;
        info!(entity = self.entity, index, "Record updated");
        Ok(())
    }

    /// Removes and returns the record at `index`.
    pub fn remove(&self, index: usize) -> StoreResult<T> {
        let mut items = self.try_load()?;
        if index >= items.len() {
            return Err(StoreError::not_found(self.entity, index));
        }
        let removed = items.remove(index);
        self.save(&items)?;
        info!(entity = self.entity, index, "Record removed");
        Ok(removed)
    }
}

impl<T> JsonCollection<T>
where
    T: Serialize + DeserializeOwned + Named,
{
    /// Case-insensitive substring match on name; an empty query returns all.
    pub fn search(&self, query: &str) -> Vec<T> {
        let needle = query.trim().to_lowercase();
        let items = self.load();
        if needle.is_empty() {
            return items;
        }
        items
            .into_iter()
            .filter(|item| item.name().to_lowercase().contains(&needle))
            .collect()
    }

    /// First record with exactly this name.
    pub fn find(&self, name: &str) -> Option<T> {
        self.load().into_iter().find(|item| item.name() == name)
    }
}

/// Writes `bytes` to a temp file beside `path`, then renames it over `path`.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;

    let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| StoreError::io(&dir, e))?;
    tmp.write_all(bytes).map_err(|e| StoreError::io(tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| StoreError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| StoreError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn services(dir: &TempDir) -> JsonCollection<Service> {
        JsonCollection::new(dir.path().join("services.json"), "Service")
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(services(&dir).load().is_empty());
        assert!(services(&dir).try_load().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_file_is_empty_on_read_but_blocks_writes() {
        let dir = TempDir::new().unwrap();
        let store = services(&dir);
        std::fs::write(store.path(), "{ not json").unwrap();

        assert!(store.load().is_empty());
        assert!(store.add(Service::new("Cut", 0.0, 100.0)).is_err());
        // untouched
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "{ not json");
    }

    #[test]
    fn test_crud_by_index() {
        let dir = TempDir::new().unwrap();
        let store = services(&dir);

        assert_eq!(store.add(Service::new("Haircut", 50.0, 300.0)).unwrap(), 0);
        assert_eq!(store.add(Service::new("Color", 150.0, 900.0)).unwrap(), 1);

        store.update(1, Service::new("Colour", 150.0, 950.0)).unwrap();
        assert_eq!(store.load()[1].name, "Colour");

        let removed = store.remove(0).unwrap();
        assert_eq!(removed.name, "Haircut");
        assert_eq!(store.load().len(), 1);

        assert!(matches!(store.remove(5), Err(StoreError::NotFound { .. })));
        assert!(matches!(
            store.update(3, Service::new("X", 0.0, 0.0)),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_file_format_is_pretty_utf8() {
        let dir = TempDir::new().unwrap();
        let store = services(&dir);
        store.save(&[Service::new("สระผม", 20.0, 150.0)]).unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(
            text,
            "[\n  {\n    \"name\": \"สระผม\",\n    \"cost\": 20,\n    \"price\": 150\n  }\n]"
        );
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let dir = TempDir::new().unwrap();
        let store = services(&dir);
        store
            .save(&[
                Service::new("Haircut", 50.0, 300.0),
                Service::new("Kids Haircut", 30.0, 200.0),
                Service::new("Color", 150.0, 900.0),
            ])
            .unwrap();

        assert_eq!(store.search("HAIR").len(), 2);
        assert_eq!(store.search("").len(), 3);
        assert_eq!(store.find("Color").unwrap().price, 900.0);
        assert!(store.find("color").is_none());
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let dir = TempDir::new().unwrap();
        let store = services(&dir);
        store.save(&[Service::new("Cut", 0.0, 100.0)]).unwrap();
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("services.json")]);
    }
}
