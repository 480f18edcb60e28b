//! Week/month/year-to-date and all-time figures from one fetched record set.

use chrono::{Months, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use insight_domain::{Bucket, DateWindow, ProfitPolicy, SaleRecord, SummaryStatistics, WindowKind};

use crate::{
    metrics::{growth_percent, margin_percent, safe_sum},
    window_service::WindowResolver,
};

/// Explicit per-call settings for summary computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SummaryOptions {
    pub week_start: Weekday,
    pub profit_policy: ProfitPolicy,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            week_start: Weekday::Sun,
            profit_policy: ProfitPolicy::AsSupplied,
        }
    }
}

/// Month-to-date against the same span of the previous month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodComparison {
    pub current: Bucket,
    pub previous: Bucket,
    pub revenue_growth: Decimal,
    pub profit_growth: Decimal,
}

pub struct SummaryService;

impl SummaryService {
    /// Computes summary statistics for `records` relative to `anchor`.
    ///
    /// `records` should cover the trailing year; the window figures only look
    /// at records dated inside their window while the totals span every record
    /// supplied, dated or not.
    pub fn compute(
        records: &[SaleRecord],
        anchor: NaiveDate,
        options: &SummaryOptions,
    ) -> SummaryStatistics {
        if records.is_empty() {
            return SummaryStatistics::default();
        }

        let policy = options.profit_policy;
        let profit_in = |kind: WindowKind| {
            let window = WindowResolver::resolve(kind, anchor, options.week_start);
            Self::window_totals(records, window, policy).profit
        };

        let total_revenue = safe_sum(records.iter().map(|record| record.total));
        let total_profit = safe_sum(records.iter().map(|record| Some(record.profit_with(policy))));

        SummaryStatistics {
            this_week: profit_in(WindowKind::Week),
            this_month: profit_in(WindowKind::Month),
            this_year: profit_in(WindowKind::Year),
            total_profit,
            total_revenue,
            average_margin: margin_percent(total_profit, total_revenue),
        }
    }

    /// Aggregates every record dated inside `window` into one bucket keyed by the window.
    pub fn window_totals(records: &[SaleRecord], window: DateWindow, policy: ProfitPolicy) -> Bucket {
        records
            .iter()
            .filter(|record| record.order_date.is_some_and(|date| window.contains(date)))
            .fold(Bucket::empty(window.to_string()), |mut bucket, record| {
                bucket.absorb(record.revenue(), record.cost(), record.profit_with(policy));
                bucket
            })
    }

    /// Compares month-to-date with the matching days of the previous month.
    ///
    /// The previous span ends on the same day-of-month as `anchor`, clamped to
    /// the end of a shorter month.
    pub fn month_over_month(
        records: &[SaleRecord],
        anchor: NaiveDate,
        options: &SummaryOptions,
    ) -> PeriodComparison {
        let current_window = WindowResolver::resolve(WindowKind::Month, anchor, options.week_start);
        let previous_anchor = anchor.checked_sub_months(Months::new(1)).unwrap_or(anchor);
        let previous_window =
            WindowResolver::resolve(WindowKind::Month, previous_anchor, options.week_start);

        let current = Self::window_totals(records, current_window, options.profit_policy);
        let previous = Self::window_totals(records, previous_window, options.profit_policy);
        PeriodComparison {
            revenue_growth: growth_percent(current.revenue, previous.revenue),
            profit_growth: growth_percent(current.profit, previous.profit),
            current,
            previous,
        }
    }
}
