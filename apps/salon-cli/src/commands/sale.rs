//! `record`: enter one sale through the Sale Recorder.

use tracing::debug;

use salon_core::money::Baht;
use salon_core::sale::SaleInput;
use salon_store::{RecordedSale, Store};

use super::render;
use crate::error::{CliError, CliResult};

/// Arguments of `record`, borrowed from the parsed command line.
#[derive(Debug, Clone, Copy)]
pub struct RecordArgs<'a> {
    pub item: &'a str,
    pub date: Option<&'a str>,
    pub customer: Option<&'a str>,
    pub quantity: i64,
    pub price: Option<f64>,
    pub cost: Option<f64>,
}

/// Records the sale. Missing price or cost come from the catalog entry of
/// the same name; an item outside the catalog needs an explicit price.
pub fn record(store: &Store, args: RecordArgs<'_>, json: bool) -> CliResult<String> {
    let catalog = store.catalog();
    let listed = catalog.find_item(args.item.trim());
    debug!(item = args.item, listed = listed.is_some(), "Resolving catalog defaults");

    let price = match (args.price, listed) {
        (Some(price), _) => price,
        (None, Some(item)) => item.list_price(),
        (None, None) => {
            return Err(CliError::validation(format!(
                "Validation error: price is required for '{}' (not in the catalog)",
                args.item
            )))
        }
    };
    let cost = args
        .cost
        .or_else(|| listed.map(|item| item.unit_cost()))
        .unwrap_or(0.0);

    let mut input = SaleInput::new(args.item, args.quantity, price, cost);
    if let Some(date) = args.date {
        input = input.on(date);
    }
    if let Some(customer) = args.customer {
        input = input.for_customer(customer);
    }

    let recorded = store.record_sale(input)?;
    render(&recorded, json, recorded_text)
}

fn recorded_text(recorded: &RecordedSale) -> String {
    let e = &recorded.entry;
    let mut text = format!(
        "Recorded {} × {} at {} on {} ({})",
        e.quantity,
        e.item,
        Baht(e.price),
        e.date,
        e.category
    );
    if let Some(id) = e.promotion_id {
        text.push_str(&format!(", promotion #{}", id));
    }
    if let Some(stock) = &recorded.stock {
        text.push_str(&format!("\nStock {} → {}", stock.before, stock.after));
    }
    text
}
