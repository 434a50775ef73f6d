//! # Store Configuration
//!
//! Where the salon's files live.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     SALON_DATA_DIR=/srv/salon/data                                     │
//! │     SALON_CONFIG=/etc/salon.toml   (which file to read in step 2)      │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/salon-ledger/salon.toml (Linux)                          │
//! │     ~/Library/Application Support/com.salon.ledger/salon.toml (macOS)  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     platform data dir, jobs.csv, services.json, ...                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # salon.toml
//! [data]
//! dir = "/srv/salon/data"
//! ledger = "jobs.csv"
//! services = "services.json"
//! inventory = "inventory.json"
//! customers = "customers.json"
//! promotions = "promotions.json"
//!
//! [migration]
//! backup = true
//! ```
//!
//! File names are joined onto `dir`; an absolute file name is used as is.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};

/// Environment variable naming the data directory.
pub const ENV_DATA_DIR: &str = "SALON_DATA_DIR";

/// Environment variable naming the config file.
pub const ENV_CONFIG: &str = "SALON_CONFIG";

// =============================================================================
// File Format
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    data: DataSection,
    #[serde(default)]
    migration: MigrationSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DataSection {
    #[serde(default)]
    dir: Option<PathBuf>,
    #[serde(default = "default_ledger")]
    ledger: String,
    #[serde(default = "default_services")]
    services: String,
    #[serde(default = "default_inventory")]
    inventory: String,
    #[serde(default = "default_customers")]
    customers: String,
    #[serde(default = "default_promotions")]
    promotions: String,
}

fn default_ledger() -> String {
    "jobs.csv".to_string()
}

fn default_services() -> String {
    "services.json".to_string()
}

fn default_inventory() -> String {
    "inventory.json".to_string()
}

fn default_customers() -> String {
    "customers.json".to_string()
}

fn default_promotions() -> String {
    "promotions.json".to_string()
}

impl Default for DataSection {
    fn default() -> Self {
        DataSection {
            dir: None,
            ledger: default_ledger(),
            services: default_services(),
            inventory: default_inventory(),
            customers: default_customers(),
            promotions: default_promotions(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MigrationSection {
    #[serde(default = "default_backup")]
    backup: bool,
}

fn default_backup() -> bool {
    true
}

impl Default for MigrationSection {
    fn default() -> Self {
        MigrationSection {
            backup: default_backup(),
        }
    }
}

// =============================================================================
// Store Configuration
// =============================================================================

/// Resolved locations of every store file.
///
/// ## Example
/// ```rust
/// use salon_store::StoreConfig;
///
/// let config = StoreConfig::new("/srv/salon").ledger_file("sales.csv");
/// assert!(config.ledger_path().ends_with("sales.csv"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub ledger_file: String,
    pub services_file: String,
    pub inventory_file: String,
    pub customers_file: String,
    pub promotions_file: String,
    /// Copy the ledger aside before a migration rewrites it.
    /// Default: true
    pub backup_on_migrate: bool,
}

impl StoreConfig {
    /// Default file names under `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data = DataSection::default();
        StoreConfig {
            data_dir: data_dir.into(),
            ledger_file: data.ledger,
            services_file: data.services,
            inventory_file: data.inventory,
            customers_file: data.customers,
            promotions_file: data.promotions,
            backup_on_migrate: default_backup(),
        }
    }

    /// Configuration rooted in a scratch directory (for testing).
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir)
    }

    pub fn ledger_file(mut self, name: impl Into<String>) -> Self {
        self.ledger_file = name.into();
        self
    }

    pub fn services_file(mut self, name: impl Into<String>) -> Self {
        self.services_file = name.into();
        self
    }

    pub fn inventory_file(mut self, name: impl Into<String>) -> Self {
        self.inventory_file = name.into();
        self
    }

    pub fn customers_file(mut self, name: impl Into<String>) -> Self {
        self.customers_file = name.into();
        self
    }

    pub fn promotions_file(mut self, name: impl Into<String>) -> Self {
        self.promotions_file = name.into();
        self
    }

    pub fn backup_on_migrate(mut self, backup: bool) -> Self {
        self.backup_on_migrate = backup;
        self
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, else `SALON_CONFIG`, else the platform path)
    /// 3. `SALON_DATA_DIR`
    pub fn load(config_path: Option<PathBuf>) -> StoreResult<Self> {
        let path = config_path
            .or_else(|| std::env::var_os(ENV_CONFIG).map(PathBuf::from))
            .or_else(Self::default_config_path);

        let mut config = match path {
            Some(path) if path.exists() => {
                info!(?path, "Loading store config from file");
                let contents =
                    std::fs::read_to_string(&path).map_err(|e| StoreError::io(&path, e))?;
                Self::from_toml(&contents)?
            }
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::new(Self::default_data_dir())
            }
            None => Self::new(Self::default_data_dir()),
        };

        if let Some(dir) = std::env::var_os(ENV_DATA_DIR) {
            debug!(dir = ?dir, "Overriding data directory from environment");
            config.data_dir = PathBuf::from(dir);
        }

        config.validate()?;
        Ok(config)
    }

    /// Parses a `salon.toml` document.
    pub fn from_toml(contents: &str) -> StoreResult<Self> {
        let file: ConfigFile = toml::from_str(contents)?;
        let data = file.data;
        Ok(StoreConfig {
            data_dir: data.dir.unwrap_or_else(Self::default_data_dir),
            ledger_file: data.ledger,
            services_file: data.services,
            inventory_file: data.inventory,
            customers_file: data.customers,
            promotions_file: data.promotions,
            backup_on_migrate: file.migration.backup,
        })
    }

    pub fn validate(&self) -> StoreResult<()> {
        let names = [
            ("ledger", &self.ledger_file),
            ("services", &self.services_file),
            ("inventory", &self.inventory_file),
            ("customers", &self.customers_file),
            ("promotions", &self.promotions_file),
        ];
        for (key, name) in names {
            if name.trim().is_empty() {
                return Err(StoreError::InvalidConfig(format!(
                    "data.{} must not be empty",
                    key
                )));
            }
        }
        Ok(())
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "salon", "ledger")
            .map(|dirs| dirs.config_dir().join("salon.toml"))
    }

    fn default_data_dir() -> PathBuf {
        directories::ProjectDirs::from("com", "salon", "ledger")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("./data"))
    }

    // =========================================================================
    // Resolved Paths
    // =========================================================================

    pub fn ledger_path(&self) -> PathBuf {
        self.data_dir.join(&self.ledger_file)
    }

    pub fn services_path(&self) -> PathBuf {
        self.data_dir.join(&self.services_file)
    }

    pub fn inventory_path(&self) -> PathBuf {
        self.data_dir.join(&self.inventory_file)
    }

    pub fn customers_path(&self) -> PathBuf {
        self.data_dir.join(&self.customers_file)
    }

    pub fn promotions_path(&self) -> PathBuf {
        self.data_dir.join(&self.promotions_file)
    }

    /// `promotions.seq.json` next to the promotions file.
    pub fn promotion_counter_path(&self) -> PathBuf {
        self.promotions_path().with_extension("seq.json")
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let config = StoreConfig::new("/srv/salon");
        assert_eq!(config.ledger_path(), PathBuf::from("/srv/salon/jobs.csv"));
        assert_eq!(
            config.promotion_counter_path(),
            PathBuf::from("/srv/salon/promotions.seq.json")
        );
        assert!(config.backup_on_migrate);
    }

    #[test]
    fn test_from_toml() {
        let config = StoreConfig::from_toml(
            r#"
            [data]
            dir = "/tmp/salon"
            ledger = "sales.csv"

            [migration]
            backup = false
            "#,
        )
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/salon"));
        assert_eq!(config.ledger_path(), PathBuf::from("/tmp/salon/sales.csv"));
        assert_eq!(config.services_file, "services.json");
        assert!(!config.backup_on_migrate);
    }

    #[test]
    fn test_absolute_file_names_win() {
        let config = StoreConfig::new("/srv/salon").ledger_file("/mnt/share/jobs.csv");
        assert_eq!(config.ledger_path(), PathBuf::from("/mnt/share/jobs.csv"));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = StoreConfig::from_toml("[data\n").unwrap_err();
        assert!(matches!(err, StoreError::InvalidConfig(_)));
    }

    #[test]
    fn test_empty_file_name_rejected() {
        let config = StoreConfig::new("/srv").ledger_file(" ");
        assert!(config.validate().is_err());
    }
}
