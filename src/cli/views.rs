//! Human-readable tables for report views.

use rust_decimal::Decimal;

use insight_core::{BucketMetrics, ForecastOutlook, PeriodComparison, SummaryOptions};
use insight_domain::{Bucket, ChartSeries, PaymentBreakdown, SummaryStatistics};

use crate::cli::table::{Table, TableColumn};
use crate::report::summary_windows;

pub fn money(value: Decimal) -> String {
    format!("{:.2}", value)
}

pub fn percent(value: Decimal) -> String {
    format!("{:.1}%", value)
}

pub fn summary_table(
    summary: &SummaryStatistics,
    anchor: chrono::NaiveDate,
    options: &SummaryOptions,
) -> String {
    let mut table = Table::new(vec![
        TableColumn::left("Metric"),
        TableColumn::left("Window"),
        TableColumn::right("Value"),
    ]);
    let windowed = [summary.this_week, summary.this_month, summary.this_year];
    for ((kind, window), profit) in summary_windows(anchor, options).into_iter().zip(windowed) {
        table.push_row(vec![
            format!("Profit this {kind}"),
            window.to_string(),
            money(profit),
        ]);
    }
    table.push_row(vec!["Total profit".into(), String::new(), money(summary.total_profit)]);
    table.push_row(vec![
        "Total revenue".into(),
        String::new(),
        money(summary.total_revenue),
    ]);
    table.push_row(vec![
        "Average margin".into(),
        String::new(),
        percent(summary.average_margin),
    ]);
    table.render()
}

pub fn breakdown_table(rows: &[PaymentBreakdown]) -> String {
    let mut table = Table::new(vec![
        TableColumn::left("Method"),
        TableColumn::right("Revenue"),
        TableColumn::right("Profit"),
        TableColumn::right("Count"),
        TableColumn::right("Margin"),
    ]);
    for row in rows {
        table.push_row(vec![
            row.method.to_string(),
            money(row.revenue),
            money(row.profit),
            row.count.to_string(),
            percent(row.margin),
        ]);
    }
    table.render()
}

pub fn bucket_table(buckets: &[Bucket]) -> String {
    let mut table = Table::new(vec![
        TableColumn::left("Period"),
        TableColumn::right("Revenue"),
        TableColumn::right("Profit"),
        TableColumn::right("COGS"),
        TableColumn::right("Count"),
        TableColumn::right("Margin"),
    ]);
    for bucket in buckets {
        table.push_row(vec![
            bucket.key.clone(),
            money(bucket.revenue),
            money(bucket.profit),
            money(bucket.cogs),
            bucket.count.to_string(),
            percent(bucket.margin()),
        ]);
    }
    table.render()
}

/// One row per label, one column per dataset; gaps print as `-`.
pub fn chart_table(chart: &ChartSeries) -> String {
    let mut columns = vec![TableColumn::left("Period")];
    columns.extend(chart.datasets.iter().map(|d| TableColumn::right(d.name.clone())));
    let mut table = Table::new(columns);
    for (idx, label) in chart.labels.iter().enumerate() {
        let mut row = vec![label.clone()];
        row.extend(chart.datasets.iter().map(|dataset| {
            dataset
                .values
                .get(idx)
                .copied()
                .flatten()
                .map(money)
                .unwrap_or_else(|| "-".to_string())
        }));
        table.push_row(row);
    }
    table.render()
}

pub fn outlook_line(outlook: &ForecastOutlook) -> String {
    format!(
        "{} forecast periods: revenue {}, profit {}, margin {}, confidence {}",
        outlook.periods,
        money(outlook.total_revenue),
        money(outlook.total_profit),
        percent(outlook.projected_margin),
        percent(outlook.average_confidence * Decimal::ONE_HUNDRED),
    )
}

pub fn comparison_line(comparison: &PeriodComparison) -> String {
    format!(
        "Month over month: revenue {} ({} vs {}), profit {} ({} vs {})",
        percent(comparison.revenue_growth),
        money(comparison.current.revenue),
        money(comparison.previous.revenue),
        percent(comparison.profit_growth),
        money(comparison.current.profit),
        money(comparison.previous.profit),
    )
}
