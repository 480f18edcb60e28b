//! Guarded ratios over accumulated sums.
//!
//! Every ratio in the engine goes through these helpers so a zero or missing
//! denominator yields `0` rather than a failed division. Sums saturate at
//! the `Decimal` bounds instead of overflowing.

use rust_decimal::Decimal;
use tracing::warn;

use insight_domain::Bucket;

/// `profit / revenue * 100`, or zero when revenue is not positive.
pub fn margin_percent(profit: Decimal, revenue: Decimal) -> Decimal {
    if revenue <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    profit
        .checked_div(revenue)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

/// Sums optional amounts, counting missing ones as zero.
pub fn safe_sum<I>(values: I) -> Decimal
where
    I: IntoIterator<Item = Option<Decimal>>,
{
    let mut saturated = false;
    let total = values.into_iter().fold(Decimal::ZERO, |acc, value| {
        let value = value.unwrap_or_default();
        acc.checked_add(value).unwrap_or_else(|| {
            saturated = true;
            acc.saturating_add(value)
        })
    });
    if saturated {
        warn!(%total, "sum exceeded the decimal range and was clamped");
    }
    total
}

/// Mean of `count` items totalling `sum`; zero for an empty set.
pub fn safe_average(sum: Decimal, count: u64) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    sum.checked_div(Decimal::from(count)).unwrap_or(Decimal::ZERO)
}

/// Percentage change from `previous` to `current`; zero when there is no positive baseline.
pub fn growth_percent(current: Decimal, previous: Decimal) -> Decimal {
    if previous <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    current
        .checked_sub(previous)
        .and_then(|delta| delta.checked_div(previous))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

/// Derived figures for a bucket.
pub trait BucketMetrics {
    fn margin(&self) -> Decimal;
    fn average_order_value(&self) -> Decimal;
}

impl BucketMetrics for Bucket {
    fn margin(&self) -> Decimal {
        margin_percent(self.profit, self.revenue)
    }

    fn average_order_value(&self) -> Decimal {
        safe_average(self.revenue, self.count)
    }
}
