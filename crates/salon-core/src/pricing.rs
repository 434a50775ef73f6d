//! # Pricing Simulator
//!
//! Projects alternative prices onto each item's historical sales.
//!
//! ## Projection
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Per item (grouped by exact name):                                     │
//! │                                                                         │
//! │    quantity, revenue, profit          summed                           │
//! │    mean price, mean cost              averaged over rows               │
//! │    margin = profit / revenue × 100    2 decimals                       │
//! │                                                                         │
//! │  For pct in {5, 10, 15, suggested(margin)}:                            │
//! │    new_price   = round_half_even(mean_price × (1 + pct/100))           │
//! │    new_revenue = quantity × new_price                                  │
//! │    new_profit  = new_revenue − mean_cost × quantity                    │
//! │    delta       = new_profit − profit                                   │
//! │                                                                         │
//! │  Custom price: same projection with the operator's price.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Volume is held constant. The numbers rank items by upside; they are not
//! a demand forecast.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use ts_rs::TS;

use crate::money::{percent_of, round2, round_whole};
use crate::normalize::NormalizedEntry;

/// Fixed price bumps simulated for every item, in percent.
pub const FIXED_INCREASES: [f64; 3] = [5.0, 10.0, 15.0];

/// Suggested bump for a margin.
///
/// ```text
///   margin < 20  → 15 %
///   margin < 35  → 10 %
///   margin < 50  →  5 %
///   otherwise    →  0 %
/// ```
pub fn suggested_increase(profit_margin: f64) -> f64 {
    if profit_margin < 20.0 {
        15.0
    } else if profit_margin < 35.0 {
        10.0
    } else if profit_margin < 50.0 {
        5.0
    } else {
        0.0
    }
}

// =============================================================================
// Scenario Types
// =============================================================================

/// One projected price for one item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct PriceScenario {
    pub increase_pct: f64,
    pub price: f64,
    pub revenue: f64,
    pub profit: f64,
    pub profit_delta: f64,
}

impl PriceScenario {
    fn project(base: &ItemBase, increase_pct: f64, price: f64) -> Self {
        let qty = base.quantity as f64;
        let revenue = qty * price;
        let profit = revenue - base.mean_cost * qty;
        PriceScenario {
            increase_pct,
            price,
            revenue,
            profit,
            profit_delta: profit - base.profit,
        }
    }

    fn bump(base: &ItemBase, increase_pct: f64) -> Self {
        let price = round_whole(base.mean_price * (1.0 + increase_pct / 100.0));
        Self::project(base, increase_pct, price)
    }

    fn custom(base: &ItemBase, price: f64) -> Self {
        let increase_pct = if base.mean_price == 0.0 {
            0.0
        } else {
            (price / base.mean_price - 1.0) * 100.0
        };
        Self::project(base, increase_pct, price)
    }
}

/// Simulation row for one item.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct ItemSimulation {
    pub item: String,
    pub quantity: i64,
    pub revenue: f64,
    pub profit: f64,
    pub mean_price: f64,
    pub mean_cost: f64,
    pub customers: usize,
    pub profit_margin: f64,

    /// One per entry of [`FIXED_INCREASES`].
    pub fixed: Vec<PriceScenario>,
    pub suggested_increase: f64,
    pub suggested: PriceScenario,
    pub custom: Option<PriceScenario>,
}

impl ItemSimulation {
    /// Suggested price, whole units.
    pub fn price_suggested(&self) -> f64 {
        self.suggested.price
    }
}

/// Totals across every simulated item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct SimulationSummary {
    pub current_profit: f64,
    pub suggested_profit: f64,
    /// Custom projection where a custom price was given, current profit otherwise.
    pub custom_profit: f64,
    /// 0 when current profit is zero or negative.
    pub suggested_uplift_pct: f64,
    pub custom_uplift_pct: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct PricingSimulation {
    /// Highest suggested profit delta first.
    pub items: Vec<ItemSimulation>,
    pub summary: SimulationSummary,
}

// =============================================================================
// Simulation
// =============================================================================

struct ItemBase {
    quantity: i64,
    revenue: f64,
    profit: f64,
    mean_price: f64,
    mean_cost: f64,
}

#[derive(Default)]
struct Accumulator<'a> {
    rows: usize,
    quantity: i64,
    revenue: f64,
    profit: f64,
    price_sum: f64,
    cost_sum: f64,
    customers: HashSet<&'a str>,
}

/// Runs the simulation over the whole table.
///
/// `custom_prices` maps item name to the price the operator wants to try;
/// names not in the ledger are ignored.
pub fn simulate(
    entries: &[NormalizedEntry],
    custom_prices: &HashMap<String, f64>,
) -> PricingSimulation {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Accumulator<'_>> = HashMap::new();

    for entry in entries {
        let acc = groups.entry(entry.item.as_str()).or_insert_with(|| {
            order.push(entry.item.as_str());
            Accumulator::default()
        });
        acc.rows += 1;
        acc.quantity += entry.quantity;
        acc.revenue += entry.revenue;
        acc.profit += entry.profit;
        acc.price_sum += entry.price;
        acc.cost_sum += entry.cost;
        if !entry.customer.trim().is_empty() {
            acc.customers.insert(entry.customer.as_str());
        }
    }

    let mut items: Vec<ItemSimulation> = order
        .into_iter()
        .filter_map(|item| groups.remove(item).map(|acc| simulate_item(item, acc, custom_prices)))
        .collect();

    items.sort_by(|a, b| b.suggested.profit_delta.total_cmp(&a.suggested.profit_delta));

    let summary = summarize(&items);
    PricingSimulation { items, summary }
}

fn simulate_item(
    item: &str,
    acc: Accumulator<'_>,
    custom_prices: &HashMap<String, f64>,
) -> ItemSimulation {
    let rows = acc.rows.max(1) as f64;
    let base = ItemBase {
        quantity: acc.quantity,
        revenue: acc.revenue,
        profit: acc.profit,
        mean_price: acc.price_sum / rows,
        mean_cost: acc.cost_sum / rows,
    };

    let profit_margin = round2(percent_of(base.profit, base.revenue));
    let suggested_pct = suggested_increase(profit_margin);

    ItemSimulation {
        item: item.to_string(),
        quantity: base.quantity,
        revenue: base.revenue,
        profit: base.profit,
        mean_price: base.mean_price,
        mean_cost: base.mean_cost,
        customers: acc.customers.len(),
        profit_margin,
        fixed: FIXED_INCREASES
            .iter()
            .map(|pct| PriceScenario::bump(&base, *pct))
            .collect(),
        suggested_increase: suggested_pct,
        suggested: PriceScenario::bump(&base, suggested_pct),
        custom: custom_prices
            .get(item)
            .map(|price| PriceScenario::custom(&base, *price)),
    }
}

fn summarize(items: &[ItemSimulation]) -> SimulationSummary {
    let mut summary = SimulationSummary::default();
    for item in items {
        summary.current_profit += item.profit;
        summary.suggested_profit += item.suggested.profit;
        summary.custom_profit += item.custom.map_or(item.profit, |c| c.profit);
    }

    let current = summary.current_profit;
    let uplift = |projected: f64| {
        if current <= 0.0 {
            0.0
        } else {
            (projected - current) / current * 100.0
        }
    };
    summary.suggested_uplift_pct = uplift(summary.suggested_profit);
    summary.custom_uplift_pct = uplift(summary.custom_profit);
    summary
}

// =============================================================================
// Unit Tests
// =============================================================================
