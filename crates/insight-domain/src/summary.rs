//! Report-level aggregates consumed by dashboards and exports.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::sale::PaymentMethod;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Profit to date per window plus whole-set totals.
pub struct SummaryStatistics {
    pub this_week: Decimal,
    pub this_month: Decimal,
    pub this_year: Decimal,
    pub total_profit: Decimal,
    pub total_revenue: Decimal,
    /// Percentage; zero when there is no revenue.
    pub average_margin: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Totals for one payment-method partition.
pub struct PaymentBreakdown {
    pub method: PaymentMethod,
    pub profit: Decimal,
    pub revenue: Decimal,
    pub count: u64,
    pub margin: Decimal,
}
