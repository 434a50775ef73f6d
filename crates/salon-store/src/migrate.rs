//! # Ledger Migration Runner
//!
//! Rewrites `jobs.csv` into the migrated shape, once, on request.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  migrate_ledger(config)                                                │
//! │                                                                         │
//! │  1. read_all()                 any mix of layouts                      │
//! │  2. copy → jobs.csv.bak-YYYYMMDDHHMMSS      (unless backup = false)    │
//! │  3. migrate_rows()             unit-cost heuristic, backfill,          │
//! │                                total_profit                            │
//! │  4. rewrite_migrated()         temp file + rename                      │
//! │                                                                         │
//! │  Rows that already carry total_profit pass through unchanged, so a     │
//! │  second run rewrites the file without changing any number.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Never called from the read path.

use chrono::Local;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use salon_core::migration::migrate_rows;

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::store::Store;

/// What a migration did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MigrationReport {
    /// Rows written to the new file.
    pub rows: usize,
    /// Rows whose cost was divided by quantity.
    pub corrected: usize,
    /// Unreadable rows left out of the new file (still in the backup).
    pub dropped: usize,
    pub backup_path: Option<PathBuf>,
}

/// Migrates the ledger named by `config`.
pub fn migrate_ledger(config: &StoreConfig) -> StoreResult<MigrationReport> {
    Store::open(config.clone())?.migrate_ledger()
}

impl Store {
    pub fn migrate_ledger(&self) -> StoreResult<MigrationReport> {
        let ledger = self.ledger();
        if !ledger.exists() {
            info!(path = ?ledger.path(), "No ledger to migrate");
            return Ok(MigrationReport {
                rows: 0,
                corrected: 0,
                dropped: 0,
                backup_path: None,
            });
        }

        let parsed = ledger.read_all();
        let outcome = migrate_rows(&parsed, &self.catalog());

        let backup_path = if self.config().backup_on_migrate {
            Some(backup(ledger.path())?)
        } else {
            None
        };

        if outcome.dropped > 0 {
            warn!(dropped = outcome.dropped, "Unreadable rows left out of migrated ledger");
        }

        ledger.rewrite_migrated(&outcome.entries)?;
        info!(
            rows = outcome.entries.len(),
            corrected = outcome.corrected,
            backup = ?backup_path,
            "Ledger migrated"
        );

        Ok(MigrationReport {
            rows: outcome.entries.len(),
            corrected: outcome.corrected,
            dropped: outcome.dropped,
            backup_path,
        })
    }
}

/// Copies `path` to `<name>.bak-<timestamp>` beside it.
fn backup(path: &Path) -> StoreResult<PathBuf> {
    let stamp = Local::now().format("%Y%m%d%H%M%S");
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".bak-{}", stamp));
    let target = path.with_file_name(name);

    std::fs::copy(path, &target).map_err(|e| StoreError::io(&target, e))?;
    info!(backup = ?target, "Ledger backed up");
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const LEGACY: &str = "\
2024-01-05T10:00:00,2024-01-05,Nok,Wax,3,100,300
2024-01-06T11:00:00,2024-01-06,Ploy,Haircut,1,300,50,service
";

    #[test]
    fn test_migration_rewrites_with_total_profit_and_backs_up() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig::in_dir(dir.path());
        std::fs::write(config.ledger_path(), LEGACY).unwrap();

        let report = migrate_ledger(&config).unwrap();
        assert_eq!(report.rows, 2);
        assert_eq!(report.corrected, 1);

        let backup = report.backup_path.unwrap();
        assert_eq!(std::fs::read_to_string(&backup).unwrap(), LEGACY);
        assert!(backup
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("jobs.csv.bak-"));

        let text = std::fs::read_to_string(config.ledger_path()).unwrap();
        assert_eq!(
            text,
            "date,customer,item,quantity,price,cost,category,promotion_id,total_profit\n\
             2024-01-05,Nok,Wax,3,100,100,unknown,,0\n\
             2024-01-06,Ploy,Haircut,1,300,50,service,,250\n"
        );
    }

    #[test]
    fn test_second_run_changes_nothing() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig::in_dir(dir.path()).backup_on_migrate(false);
        std::fs::write(config.ledger_path(), LEGACY).unwrap();

        migrate_ledger(&config).unwrap();
        let first = std::fs::read_to_string(config.ledger_path()).unwrap();

        let report = migrate_ledger(&config).unwrap();
        assert_eq!(report.corrected, 0);
        assert!(report.backup_path.is_none());
        assert_eq!(std::fs::read_to_string(config.ledger_path()).unwrap(), first);
    }

    #[test]
    fn test_missing_ledger_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig::in_dir(dir.path());
        let report = migrate_ledger(&config).unwrap();
        assert_eq!(report.rows, 0);
        assert!(!config.ledger_path().exists());
    }
}
