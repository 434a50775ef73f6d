//! # Report Loading
//!
//! Builds the in-memory inputs every report needs: a fresh catalog
//! snapshot and the normalized ledger.
//!
//! Nothing here fails. Missing or malformed files come back empty and
//! unreadable ledger rows are logged and left out, so a dashboard shows
//! zeros instead of an error.

use tracing::{debug, warn};

use salon_core::normalize::normalize;
use salon_core::{CatalogSnapshot, LedgerTable};

use crate::store::Store;

impl Store {
    /// Services, inventory and promotions as they are on disk right now.
    pub fn catalog(&self) -> CatalogSnapshot {
        CatalogSnapshot::new(
            self.services().load(),
            self.inventory().load(),
            self.promotions().list(),
        )
    }

    /// The normalized ledger against the current catalog.
    pub fn ledger_table(&self) -> LedgerTable {
        let parsed = self.ledger().read_all();
        let table = normalize(parsed, &self.catalog());

        for skipped in &table.skipped {
            warn!(line = skipped.line, reason = %skipped.reason, "Skipped ledger row");
        }
        debug!(
            rows = table.len(),
            skipped = table.skipped.len(),
            "Ledger normalized"
        );
        table
    }
}
