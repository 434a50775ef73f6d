//! Report commands: summary, items, daily, categories, jobs.

use serde::Serialize;
use tracing::debug;

use salon_core::analytics::{
    category_breakdown, daily_totals, product_profit_report, service_profit_report, summarize,
    CategoryBreakdown, DailyMetric, DailySeries, ItemGroup, ItemReport, SummaryMetrics,
};
use salon_core::NormalizedEntry;
use salon_core::money::Baht;
use salon_store::Store;

use super::{pct, render};
use crate::error::CliResult;

pub fn summary(store: &Store, json: bool) -> CliResult<String> {
    let table = store.ledger_table();
    let metrics = summarize(&table.entries);
    debug!(rows = table.len(), "Summary computed");
    render(&metrics, json, summary_text)
}

fn summary_text(m: &SummaryMetrics) -> String {
    [
        format!("Revenue         {}", Baht(m.total_revenue)),
        format!("Cost            {}", Baht(m.total_cost)),
        format!("Net profit      {}", Baht(m.net_profit)),
        format!("Transactions    {}", m.transactions),
        format!(
            "Services        {} ({})  profit {}",
            Baht(m.service.revenue),
            pct(m.service_percentage),
            Baht(m.service.profit)
        ),
        format!(
            "Products        {} ({})  profit {}",
            Baht(m.product.revenue),
            pct(m.product_percentage),
            Baht(m.product.profit)
        ),
        format!("Best item       {} ({})", m.best_profit_item, Baht(m.best_profit_amount)),
        format!("Customers       {} unique", m.unique_customers),
        format!(
            "Growth          customers {}, service revenue {}, product revenue {}",
            pct(m.customer_growth),
            pct(m.service_revenue_growth),
            pct(m.product_revenue_growth)
        ),
    ]
    .join("\n")
}

pub fn items(store: &Store, services: bool, top: Option<usize>, json: bool) -> CliResult<String> {
    let table = store.ledger_table();
    let mut report: ItemReport = if services {
        service_profit_report(&table)
    } else {
        product_profit_report(&table, &store.catalog())
    };
    if let Some(n) = top {
        report.groups.truncate(n);
    }
    debug!(filter = ?report.filter, groups = report.groups.len(), "Item report computed");
    render(&report, json, |r| item_table(&r.groups))
}

fn item_table(groups: &[ItemGroup]) -> String {
    if groups.is_empty() {
        return "No sales".to_string();
    }
    let mut lines = vec![format!(
        "{:<28} {:>5} {:>14} {:>14} {:>14} {:>8}",
        "Item", "Qty", "Revenue", "Cost", "Profit", "Margin"
    )];
    lines.extend(groups.iter().map(|g| {
        format!(
            "{:<28} {:>5} {:>14} {:>14} {:>14} {:>8}",
            g.item,
            g.quantity,
            Baht(g.revenue).to_string(),
            Baht(g.cost).to_string(),
            Baht(g.profit).to_string(),
            pct(g.profit_margin)
        )
    }));
    lines.join("\n")
}

pub fn daily(store: &Store, profit: bool, json: bool) -> CliResult<String> {
    let metric = if profit {
        DailyMetric::Profit
    } else {
        DailyMetric::Revenue
    };
    let series = daily_totals(&store.ledger_table().entries, metric);
    render(&series, json, |s| daily_text(s, metric))
}

fn daily_text(series: &DailySeries, metric: DailyMetric) -> String {
    if series.days.is_empty() {
        return "No sales".to_string();
    }
    let mut lines: Vec<String> = series
        .days
        .iter()
        .map(|d| format!("{:<12} {:>14}", d.date, Baht(d.amount).to_string()))
        .collect();
    let label = match metric {
        DailyMetric::Revenue => "revenue",
        DailyMetric::Profit => "profit",
    };
    lines.push(format!("Average daily {}: {}", label, Baht(series.average)));
    lines.join("\n")
}

#[derive(Serialize)]
struct Categories {
    categories: Vec<CategoryBreakdown>,
}

pub fn categories(store: &Store, json: bool) -> CliResult<String> {
    let value = Categories {
        categories: category_breakdown(&store.ledger_table().entries),
    };
    render(&value, json, |v| {
        let mut lines = vec![format!(
            "{:<12} {:>14} {:>14} {:>14}",
            "Category", "Revenue", "Cost", "Profit"
        )];
        lines.extend(v.categories.iter().map(|c| {
            format!(
                "{:<12} {:>14} {:>14} {:>14}",
                c.category.as_str(),
                Baht(c.revenue).to_string(),
                Baht(c.cost).to_string(),
                Baht(c.profit).to_string()
            )
        }));
        lines.join("\n")
    })
}

/// Ledger rows, newest first. Undated rows come last.
pub fn jobs(store: &Store, limit: Option<usize>, json: bool) -> CliResult<String> {
    let table = store.ledger_table();
    let mut rows = table.newest_first();
    if let Some(n) = limit {
        rows.truncate(n);
    }
    debug!(rows = rows.len(), skipped = table.skipped.len(), "Job list built");
    render(&rows, json, |rows| job_lines(rows))
}

fn job_lines(rows: &[&NormalizedEntry]) -> String {
    if rows.is_empty() {
        return "No sales".to_string();
    }
    let mut lines = vec![format!(
        "{:<12} {:<16} {:<28} {:>5} {:>14} {:<10}",
        "Date", "Customer", "Item", "Qty", "Price", "Category"
    )];
    lines.extend(rows.iter().map(|e| {
        let date = if e.date.is_empty() { "-" } else { e.date.as_str() };
        format!(
            "{:<12} {:<16} {:<28} {:>5} {:>14} {:<10}",
            date,
            e.customer,
            e.item,
            e.quantity,
            Baht(e.price).to_string(),
            e.category.as_str()
        )
    }));
    lines.join("\n")
}
