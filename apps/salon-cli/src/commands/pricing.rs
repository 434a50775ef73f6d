//! `simulate`: price increase projections per item.

use std::collections::HashMap;

use salon_core::money::Baht;
use salon_core::pricing::{simulate as run_simulation, PricingSimulation};
use salon_store::Store;

use super::{pct, render};
use crate::error::CliResult;

/// Parses `ITEM=PRICE`. The last `=` splits, so item names may contain one.
pub fn parse_custom_price(arg: &str) -> Result<(String, f64), String> {
    let (item, price) = arg
        .rsplit_once('=')
        .ok_or_else(|| format!("expected ITEM=PRICE, got '{}'", arg))?;
    let item = item.trim();
    if item.is_empty() {
        return Err("item name is empty".to_string());
    }
    let price: f64 = price
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a price", price.trim()))?;
    if !price.is_finite() || price < 0.0 {
        return Err(format!("price must not be negative, got {}", price));
    }
    Ok((item.to_string(), price))
}

pub fn simulate(store: &Store, prices: &[(String, f64)], json: bool) -> CliResult<String> {
    let custom: HashMap<String, f64> = prices.iter().cloned().collect();
    let simulation = run_simulation(&store.ledger_table().entries, &custom);
    render(&simulation, json, simulation_text)
}

fn simulation_text(sim: &PricingSimulation) -> String {
    if sim.items.is_empty() {
        return "No sales".to_string();
    }

    let mut lines = vec![format!(
        "{:<28} {:>8} {:>12} {:>6} {:>12} {:>14}",
        "Item", "Margin", "Mean price", "+%", "New price", "Profit delta"
    )];
    for item in &sim.items {
        lines.push(format!(
            "{:<28} {:>8} {:>12} {:>6} {:>12} {:>14}",
            item.item,
            pct(item.profit_margin),
            Baht(item.mean_price).to_string(),
            format!("{}", item.suggested_increase),
            Baht(item.price_suggested()).to_string(),
            Baht(item.suggested.profit_delta).to_string()
        ));
        if let Some(custom) = &item.custom {
            lines.push(format!(
                "  custom {} ({}) → profit delta {}",
                Baht(custom.price),
                pct(custom.increase_pct),
                Baht(custom.profit_delta)
            ));
        }
    }

    let s = &sim.summary;
    lines.push(String::new());
    lines.push(format!("Current profit     {}", Baht(s.current_profit)));
    lines.push(format!(
        "Suggested profit   {} ({})",
        Baht(s.suggested_profit),
        pct(s.suggested_uplift_pct)
    ));
    lines.push(format!(
        "Custom profit      {} ({})",
        Baht(s.custom_profit),
        pct(s.custom_uplift_pct)
    ));
    lines.join("\n")
}
