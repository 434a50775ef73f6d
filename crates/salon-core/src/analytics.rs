//! # Aggregation Engine
//!
//! Summary metrics and groupings over the normalized ledger.
//!
//! ## Reports
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Aggregation Engine                              │
//! │                                                                         │
//! │  &[NormalizedEntry] ──┬──► summarize()            SummaryMetrics       │
//! │                       ├──► group_by_item()        Vec<ItemGroup>       │
//! │                       ├──► daily_totals()         DailySeries          │
//! │                       └──► category_breakdown()   Vec<CategoryBreakdown>│
//! │                                                                         │
//! │  &LedgerTable ────────┬──► product_profit_report()  (top 10)           │
//! │  + CatalogSnapshot    └──► service_profit_report()  (top 8 + Others)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules Shared by Every Report
//! - Grouping keys (`item`, `date`, `category`) are exact, case-sensitive.
//! - Groups come out in first-seen order unless a report says otherwise;
//!   profit sorts are stable so ties keep that order.
//! - Any ratio with a zero denominator is 0.
//! - `net_profit` sums the authoritative per-row profit. `total_cost` sums
//!   `unit cost × quantity`. The two are not reconciled: when a migrated
//!   `total_profit` came from a different formula, `total_revenue −
//!   net_profit` can differ from `total_cost`.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use ts_rs::TS;

use crate::money::{growth_rate, percent_of, round2};
use crate::normalize::{compare_days, LedgerTable, NormalizedEntry};
use crate::types::{CatalogSnapshot, Category};

/// Sentinel for "no best item" (empty ledger).
pub const NO_ITEM: &str = "N/A";

/// Name of the synthetic remainder row in top-N reports.
pub const OTHERS: &str = "Others";

/// Rows shown in the product profit report.
pub const PRODUCT_REPORT_TOP: usize = 10;

/// Rows shown in the service profit report before folding into `Others`.
pub const SERVICE_REPORT_TOP: usize = 8;

// =============================================================================
// Summary Metrics
// =============================================================================

/// Revenue, cost and profit for one slice of the ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct CategoryTotals {
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
}

impl CategoryTotals {
    fn add(&mut self, entry: &NormalizedEntry) {
        self.revenue += entry.revenue;
        self.cost += entry.line_cost;
        self.profit += entry.profit;
    }
}

/// Dashboard headline numbers.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct SummaryMetrics {
    pub total_revenue: f64,
    pub total_cost: f64,
    pub net_profit: f64,
    pub transactions: usize,

    pub service: CategoryTotals,
    pub product: CategoryTotals,
    /// Share of total revenue; promotion and unknown rows are in neither.
    pub service_percentage: f64,
    pub product_percentage: f64,

    pub best_profit_item: String,
    pub best_profit_amount: f64,

    pub unique_customers: usize,
    /// Second half of the date-ordered ledger against the first half.
    pub customer_growth: f64,
    pub service_revenue_growth: f64,
    pub product_revenue_growth: f64,
}

impl Default for SummaryMetrics {
    fn default() -> Self {
        SummaryMetrics {
            total_revenue: 0.0,
            total_cost: 0.0,
            net_profit: 0.0,
            transactions: 0,
            service: CategoryTotals::default(),
            product: CategoryTotals::default(),
            service_percentage: 0.0,
            product_percentage: 0.0,
            best_profit_item: NO_ITEM.to_string(),
            best_profit_amount: 0.0,
            unique_customers: 0,
            customer_growth: 0.0,
            service_revenue_growth: 0.0,
            product_revenue_growth: 0.0,
        }
    }
}

/// Computes the headline metrics.
pub fn summarize(entries: &[NormalizedEntry]) -> SummaryMetrics {
    let mut metrics = SummaryMetrics {
        transactions: entries.len(),
        ..Default::default()
    };

    for entry in entries {
        metrics.total_revenue += entry.revenue;
        metrics.total_cost += entry.line_cost;
        metrics.net_profit += entry.profit;
        match entry.category {
            Category::Service => metrics.service.add(entry),
            Category::Product => metrics.product.add(entry),
            Category::Promotion | Category::Unknown => {}
        }
    }

    metrics.service_percentage = percent_of(metrics.service.revenue, metrics.total_revenue);
    metrics.product_percentage = percent_of(metrics.product.revenue, metrics.total_revenue);

    if let Some(best) = best_by_profit(&group_by_item(entries)) {
        metrics.best_profit_item = best.item.clone();
        metrics.best_profit_amount = best.profit;
    }

    metrics.unique_customers = unique_customers(entries.iter());

    let mut ordered: Vec<&NormalizedEntry> = entries.iter().collect();
    ordered.sort_by(|a, b| compare_days(a.day, b.day));
    let (first, second) = ordered.split_at(ordered.len() / 2);

    metrics.customer_growth = growth_rate(
        unique_customers(first.iter().copied()) as f64,
        unique_customers(second.iter().copied()) as f64,
    );
    metrics.service_revenue_growth = growth_rate(
        category_revenue(first, Category::Service),
        category_revenue(second, Category::Service),
    );
    metrics.product_revenue_growth = growth_rate(
        category_revenue(first, Category::Product),
        category_revenue(second, Category::Product),
    );

    metrics
}

/// First group with the strictly highest profit.
fn best_by_profit(groups: &[ItemGroup]) -> Option<&ItemGroup> {
    let mut best: Option<&ItemGroup> = None;
    for group in groups {
        if best.map_or(true, |current| group.profit > current.profit) {
            best = Some(group);
        }
    }
    best
}

fn unique_customers<'a, I>(entries: I) -> usize
where
    I: Iterator<Item = &'a NormalizedEntry>,
{
    entries
        .filter(|e| !e.customer.trim().is_empty())
        .map(|e| e.customer.as_str())
        .collect::<HashSet<_>>()
        .len()
}

fn category_revenue(entries: &[&NormalizedEntry], category: Category) -> f64 {
    entries
        .iter()
        .filter(|e| e.category == category)
        .map(|e| e.revenue)
        .sum()
}

// =============================================================================
// Per-Item Grouping
// =============================================================================

/// Totals for one item name.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct ItemGroup {
    pub item: String,
    pub quantity: i64,
    pub revenue: f64,
    /// Sum of `unit cost × quantity`.
    pub cost: f64,
    pub profit: f64,
    /// `profit / revenue × 100`, 2 decimals.
    pub profit_margin: f64,
    pub transactions: usize,
}

impl ItemGroup {
    fn empty(item: &str) -> Self {
        ItemGroup {
            item: item.to_string(),
            quantity: 0,
            revenue: 0.0,
            cost: 0.0,
            profit: 0.0,
            profit_margin: 0.0,
            transactions: 0,
        }
    }

    fn absorb(&mut self, quantity: i64, revenue: f64, cost: f64, profit: f64, transactions: usize) {
        self.quantity += quantity;
        self.revenue += revenue;
        self.cost += cost;
        self.profit += profit;
        self.transactions += transactions;
        self.profit_margin = round2(percent_of(self.profit, self.revenue));
    }
}

/// Groups rows by exact item name, in first-seen order.
pub fn group_by_item<'a, I>(entries: I) -> Vec<ItemGroup>
where
    I: IntoIterator<Item = &'a NormalizedEntry>,
{
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut groups: Vec<ItemGroup> = Vec::new();

    for entry in entries {
        let slot = *index.entry(entry.item.as_str()).or_insert_with(|| {
            groups.push(ItemGroup::empty(&entry.item));
            groups.len() - 1
        });
        groups[slot].absorb(entry.quantity, entry.revenue, entry.line_cost, entry.profit, 1);
    }

    groups
}

/// Stable sort, highest profit first.
pub fn sort_by_profit(groups: &mut [ItemGroup]) {
    groups.sort_by(|a, b| b.profit.total_cmp(&a.profit));
}

/// Keeps the first `n` groups and folds the rest into one `Others` row.
///
/// The `Others` row is only added when the folded profit is positive.
pub fn top_with_others(mut groups: Vec<ItemGroup>, n: usize) -> Vec<ItemGroup> {
    if groups.len() <= n {
        return groups;
    }
    let rest = groups.split_off(n);
    let mut others = ItemGroup::empty(OTHERS);
    for group in &rest {
        others.absorb(group.quantity, group.revenue, group.cost, group.profit, group.transactions);
    }
    if others.profit > 0.0 {
        groups.push(others);
    }
    groups
}

// =============================================================================
// Item Profit Reports
// =============================================================================

/// How an item report treated rows whose category was backfilled.
///
/// A recorded category always decides its own row. The filter only names
/// the fallback applied to rows read from layouts without a category
/// column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ProductFilter {
    /// Every row carried a category; nothing fell back.
    RecordedCategory,
    /// Backfilled rows kept when the item is a product in the inventory.
    CatalogNames,
    /// Backfilled rows kept without a catalog check.
    AllRows,
}

/// An item profit report, sorted by profit.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct ItemReport {
    pub filter: ProductFilter,
    pub groups: Vec<ItemGroup>,
}

/// Top products by profit.
///
/// Rows with a recorded category count when it is `product`. Backfilled
/// rows count when their item is an inventory product, or all of them
/// when the inventory is empty.
pub fn product_profit_report(table: &LedgerTable, catalog: &CatalogSnapshot) -> ItemReport {
    let names: HashSet<&str> = catalog.product_names().into_iter().collect();

    let filter = if table.categories_recorded() {
        ProductFilter::RecordedCategory
    } else if !names.is_empty() {
        ProductFilter::CatalogNames
    } else {
        ProductFilter::AllRows
    };

    let mut groups = group_by_item(table.entries.iter().filter(|e| {
        if e.category_recorded {
            e.category == Category::Product
        } else {
            names.is_empty() || names.contains(e.item.as_str())
        }
    }));

    sort_by_profit(&mut groups);
    groups.truncate(PRODUCT_REPORT_TOP);
    ItemReport { filter, groups }
}

/// Top services by profit with the tail folded into `Others`.
///
/// Rows with a recorded category count when it is `service`. Backfilled
/// rows are read as services unless the stores placed them as a product
/// or a promotion.
pub fn service_profit_report(table: &LedgerTable) -> ItemReport {
    let filter = if table.categories_recorded() {
        ProductFilter::RecordedCategory
    } else {
        ProductFilter::AllRows
    };

    let mut groups = group_by_item(table.entries.iter().filter(|e| {
        if e.category_recorded {
            e.category == Category::Service
        } else {
            matches!(e.category, Category::Service | Category::Unknown)
        }
    }));

    sort_by_profit(&mut groups);
    ItemReport {
        filter,
        groups: top_with_others(groups, SERVICE_REPORT_TOP),
    }
}

// =============================================================================
// Daily Series
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DailyMetric {
    Revenue,
    Profit,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct DailyTotal {
    pub date: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct DailySeries {
    pub days: Vec<DailyTotal>,
    /// Mean over the days present, 0 when there are none.
    pub average: f64,
}

/// Sums one metric per date, oldest first; unparsable dates trail.
pub fn daily_totals(entries: &[NormalizedEntry], metric: DailyMetric) -> DailySeries {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut days = Vec::new();

    for entry in entries {
        let slot = *index.entry(entry.date.as_str()).or_insert_with(|| {
            days.push((entry.day, DailyTotal {
                date: entry.date.clone(),
                amount: 0.0,
            }));
            days.len() - 1
        });
        days[slot].1.amount += match metric {
            DailyMetric::Revenue => entry.revenue,
            DailyMetric::Profit => entry.profit,
        };
    }

    days.sort_by(|a, b| compare_days(a.0, b.0));
    let days: Vec<DailyTotal> = days.into_iter().map(|(_, total)| total).collect();

    let average = if days.is_empty() {
        0.0
    } else {
        days.iter().map(|d| d.amount).sum::<f64>() / days.len() as f64
    };

    DailySeries { days, average }
}

// =============================================================================
// Category Comparison
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct CategoryBreakdown {
    pub category: Category,
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
}

/// Totals per category without `unknown`.
///
/// Service and product rows are always present; promotion only when sold.
pub fn category_breakdown(entries: &[NormalizedEntry]) -> Vec<CategoryBreakdown> {
    let mut totals = [CategoryTotals::default(); 3];
    let mut promotions_sold = false;

    for entry in entries {
        let slot = match entry.category {
            Category::Service => 0,
            Category::Product => 1,
            Category::Promotion => {
                promotions_sold = true;
                2
            }
            Category::Unknown => continue,
        };
        totals[slot].add(entry);
    }

    [Category::Service, Category::Product, Category::Promotion]
        .into_iter()
        .zip(totals)
        .filter(|(category, _)| *category != Category::Promotion || promotions_sold)
        .map(|(category, t)| CategoryBreakdown {
            category,
            revenue: t.revenue,
            cost: t.cost,
            profit: t.profit,
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_date;
    use crate::types::Product;

    fn entry(
        date: &str,
        customer: &str,
        item: &str,
        qty: i64,
        price: f64,
        cost: f64,
        category: Category,
    ) -> NormalizedEntry {
        let (date, day) = normalize_date(date);
        let q = qty as f64;
        NormalizedEntry {
            date,
            day,
            customer: customer.to_string(),
            item: item.to_string(),
            quantity: qty,
            price,
            cost,
            line_cost: cost * q,
            category,
            category_recorded: true,
            promotion_id: None,
            revenue: price * q,
            profit: (price - cost) * q,
            line: 0,
        }
    }

    fn table(entries: Vec<NormalizedEntry>) -> LedgerTable {
        LedgerTable {
            entries,
            skipped: vec![],
        }
    }

    #[test]
    fn test_empty_ledger_is_all_zero() {
        let m = summarize(&[]);
        assert_eq!(m.total_revenue, 0.0);
        assert_eq!(m.total_cost, 0.0);
        assert_eq!(m.net_profit, 0.0);
        assert_eq!(m.service_percentage, 0.0);
        assert_eq!(m.product_percentage, 0.0);
        assert_eq!(m.best_profit_item, NO_ITEM);
        assert_eq!(m.customer_growth, 0.0);
        assert!(group_by_item(&[]).is_empty());
    }

    #[test]
    fn test_totals_and_category_split() {
        let rows = vec![
            entry("2025-01-01", "Nok", "Haircut", 1, 300.0, 50.0, Category::Service),
            entry("2025-01-01", "Nok", "Shampoo", 2, 250.0, 120.0, Category::Product),
            entry("2025-01-02", "Ploy", "Spa Day", 1, 200.0, 100.0, Category::Promotion),
        ];
        let m = summarize(&rows);
        assert_eq!(m.total_revenue, 1000.0);
        assert_eq!(m.total_cost, 50.0 + 240.0 + 100.0);
        assert_eq!(m.net_profit, 250.0 + 260.0 + 100.0);
        assert_eq!(m.service_percentage, 30.0);
        assert_eq!(m.product_percentage, 50.0);
        assert!(m.service_percentage + m.product_percentage < 100.0);
        assert_eq!(m.unique_customers, 2);
    }

    #[test]
    fn test_net_profit_uses_recorded_profit() {
        let mut row = entry("2025-01-01", "Nok", "Wax", 2, 100.0, 40.0, Category::Product);
        row.profit = 10.0;
        let m = summarize(&[row]);
        assert_eq!(m.net_profit, 10.0);
        // not reconciled with cost
        assert_eq!(m.total_revenue - m.total_cost, 120.0);
    }

    #[test]
    fn test_best_item_tie_keeps_first_seen() {
        let rows = vec![
            entry("2025-01-01", "A", "Wax", 1, 100.0, 50.0, Category::Product),
            entry("2025-01-01", "B", "Gel", 1, 100.0, 50.0, Category::Product),
        ];
        for _ in 0..3 {
            assert_eq!(summarize(&rows).best_profit_item, "Wax");
        }
        let swapped = vec![rows[1].clone(), rows[0].clone()];
        assert_eq!(summarize(&swapped).best_profit_item, "Gel");
    }

    #[test]
    fn test_growth_rates_split_at_midpoint() {
        // listed out of order; growth works on date order
        let rows = vec![
            entry("2025-02-01", "C", "Haircut", 1, 300.0, 0.0, Category::Service),
            entry("2025-01-01", "A", "Haircut", 1, 200.0, 0.0, Category::Service),
            entry("2025-02-02", "D", "Wax", 1, 50.0, 0.0, Category::Product),
            entry("2025-01-02", "A", "Haircut", 1, 200.0, 0.0, Category::Service),
        ];
        let m = summarize(&rows);
        // first half: A (x2) = 1 customer, 400 service; second: C, D = 2 customers, 300 service
        assert_eq!(m.customer_growth, 100.0);
        assert_eq!(m.service_revenue_growth, -25.0);
        // no product revenue in the first half
        assert_eq!(m.product_revenue_growth, 0.0);
    }

    #[test]
    fn test_group_by_item_is_exact_and_first_seen() {
        let rows = vec![
            entry("2025-01-01", "A", "Wax", 1, 100.0, 40.0, Category::Product),
            entry("2025-01-01", "A", "wax", 1, 100.0, 40.0, Category::Product),
            entry("2025-01-01", "A", "Wax", 2, 100.0, 40.0, Category::Product),
        ];
        let groups = group_by_item(&rows);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].item, "Wax");
        assert_eq!(groups[0].quantity, 3);
        assert_eq!(groups[0].cost, 120.0);
        assert_eq!(groups[0].profit_margin, 60.0);
        assert_eq!(groups[0].transactions, 2);
    }

    #[test]
    fn test_top_with_others() {
        let rows: Vec<_> = (1..=5)
            .map(|i| {
                let item = format!("S{i}");
                entry("2025-01-01", "A", &item, 1, 10.0 * i as f64, 0.0, Category::Service)
            })
            .collect();
        let mut groups = group_by_item(&rows);
        sort_by_profit(&mut groups);

        let top = top_with_others(groups.clone(), 3);
        let names: Vec<_> = top.iter().map(|g| g.item.as_str()).collect();
        assert_eq!(names, vec!["S5", "S4", "S3", OTHERS]);
        assert_eq!(top[3].profit, 30.0);

        assert_eq!(top_with_others(groups, 5).len(), 5);
    }

    #[test]
    fn test_others_dropped_when_remainder_not_profitable() {
        let rows = vec![
            entry("2025-01-01", "A", "S1", 1, 100.0, 0.0, Category::Service),
            entry("2025-01-01", "A", "S2", 1, 10.0, 30.0, Category::Service),
        ];
        let mut groups = group_by_item(&rows);
        sort_by_profit(&mut groups);
        assert_eq!(top_with_others(groups, 1).len(), 1);
    }

    #[test]
    fn test_product_report_filter_tiers() {
        let wax = Product::new("Wax", 40.0, 100.0, 5);
        let catalog = CatalogSnapshot::new(vec![], vec![wax], vec![]);
        let mut rows = vec![
            entry("2025-01-01", "A", "Wax", 1, 100.0, 40.0, Category::Product),
            entry("2025-01-01", "A", "Haircut", 1, 300.0, 50.0, Category::Service),
        ];

        let report = product_profit_report(&table(rows.clone()), &catalog);
        assert_eq!(report.filter, ProductFilter::RecordedCategory);
        assert_eq!(report.groups.len(), 1);

        rows[1].category_recorded = false;
        rows[1].category = Category::Unknown;
        let report = product_profit_report(&table(rows.clone()), &catalog);
        assert_eq!(report.filter, ProductFilter::CatalogNames);
        assert_eq!(report.groups[0].item, "Wax");

        let report = product_profit_report(&table(rows), &CatalogSnapshot::default());
        assert_eq!(report.filter, ProductFilter::AllRows);
        assert_eq!(report.groups[0].item, "Haircut");
    }

    #[test]
    fn test_recorded_category_decides_its_own_row() {
        let wax = Product::new("Wax", 40.0, 100.0, 5);
        let catalog = CatalogSnapshot::new(vec![], vec![wax], vec![]);
        let mut legacy = entry("2024-12-01", "A", "Haircut", 1, 300.0, 50.0, Category::Unknown);
        legacy.category_recorded = false;
        let rows = vec![
            legacy,
            entry("2025-01-01", "B", "Shampoo", 1, 250.0, 120.0, Category::Product),
            entry("2025-01-01", "B", "Spa Day", 1, 900.0, 400.0, Category::Promotion),
        ];

        let services = service_profit_report(&table(rows.clone()));
        assert_eq!(services.filter, ProductFilter::AllRows);
        let items: Vec<_> = services.groups.iter().map(|g| g.item.as_str()).collect();
        assert_eq!(items, vec!["Haircut"]);

        // Shampoo is not in the inventory but was recorded as a product
        let products = product_profit_report(&table(rows), &catalog);
        assert_eq!(products.filter, ProductFilter::CatalogNames);
        let items: Vec<_> = products.groups.iter().map(|g| g.item.as_str()).collect();
        assert_eq!(items, vec!["Shampoo"]);
    }

    #[test]
    fn test_backfilled_product_is_not_a_service() {
        let mut row = entry("2024-12-01", "A", "Wax", 1, 100.0, 40.0, Category::Product);
        row.category_recorded = false;
        assert!(service_profit_report(&table(vec![row])).groups.is_empty());
    }

    #[test]
    fn test_service_report_without_categories_uses_all_rows() {
        let mut row = entry("2025-01-01", "A", "Wax", 1, 100.0, 40.0, Category::Unknown);
        row.category_recorded = false;
        let report = service_profit_report(&table(vec![row]));
        assert_eq!(report.filter, ProductFilter::AllRows);
        assert_eq!(report.groups.len(), 1);
    }

    #[test]
    fn test_daily_totals_ordering_and_average() {
        let rows = vec![
            entry("2025-01-03", "A", "X", 1, 30.0, 0.0, Category::Service),
            entry("someday", "A", "X", 1, 5.0, 0.0, Category::Service),
            entry("2025-01-01", "A", "X", 1, 10.0, 0.0, Category::Service),
            entry("01/01/2025", "A", "X", 1, 20.0, 0.0, Category::Service),
        ];
        let series = daily_totals(&rows, DailyMetric::Revenue);
        let dates: Vec<_> = series.days.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2025-01-01", "2025-01-03", "someday"]);
        assert_eq!(series.days[0].amount, 30.0);
        assert_eq!(series.average, 65.0 / 3.0);

        assert_eq!(daily_totals(&[], DailyMetric::Profit).average, 0.0);
    }

    #[test]
    fn test_category_breakdown_zero_fills() {
        let rows = vec![entry("2025-01-01", "A", "X", 1, 30.0, 10.0, Category::Unknown)];
        let breakdown = category_breakdown(&rows);
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].category, Category::Service);
        assert_eq!(breakdown[1].category, Category::Product);
        assert_eq!(breakdown[1].revenue, 0.0);

        let rows = vec![entry("2025-01-01", "A", "Spa", 1, 30.0, 10.0, Category::Promotion)];
        let breakdown = category_breakdown(&rows);
        assert_eq!(breakdown[2].profit, 20.0);
    }
}
