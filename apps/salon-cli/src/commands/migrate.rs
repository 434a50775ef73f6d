//! `migrate`: one-time rewrite of the ledger with `total_profit`.

use salon_store::{migrate_ledger, MigrationReport, Store};

use super::render;
use crate::error::CliResult;

pub fn migrate(store: &Store, backup: bool, json: bool) -> CliResult<String> {
    let config = store
        .config()
        .clone()
        .backup_on_migrate(backup && store.config().backup_on_migrate);
    let report = migrate_ledger(&config)?;
    render(&report, json, report_text)
}

fn report_text(report: &MigrationReport) -> String {
    let mut lines = vec![format!(
        "Migrated {} rows ({} unit costs corrected)",
        report.rows, report.corrected
    )];
    if report.dropped > 0 {
        lines.push(format!("{} unreadable rows left out", report.dropped));
    }
    if let Some(path) = &report.backup_path {
        lines.push(format!("Backup: {}", path.display()));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use salon_store::StoreConfig;
    use tempfile::TempDir;

    #[test]
    fn test_no_backup_flag() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(StoreConfig::in_dir(dir.path())).unwrap();
        std::fs::write(
            store.ledger().path(),
            "2024-01-05T10:00:00,2024-01-05,Nok,Wax,3,100,300\n",
        )
        .unwrap();

        let text = migrate(&store, false, false).unwrap();
        assert_eq!(text, "Migrated 1 rows (1 unit costs corrected)");

        let files = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(files, 1);
    }

    #[test]
    fn test_backup_path_reported() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(StoreConfig::in_dir(dir.path())).unwrap();
        std::fs::write(
            store.ledger().path(),
            "2024-01-06T11:00:00,2024-01-06,Ploy,Haircut,1,300,50,service\n",
        )
        .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&migrate(&store, true, true).unwrap()).unwrap();
        assert_eq!(value["rows"], 1);
        assert!(value["backup_path"]
            .as_str()
            .unwrap()
            .contains("jobs.csv.bak-"));
    }
}
