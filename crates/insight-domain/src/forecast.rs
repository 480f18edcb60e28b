//! Upstream forecast artifacts. The model producing them is opaque to this crate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    #[serde(alias = "period_identifier", alias = "period")]
    pub period_identifier: String,
    #[serde(default, alias = "forecasted_revenue")]
    pub forecasted_revenue: Decimal,
    #[serde(default, alias = "forecasted_profit")]
    pub forecasted_profit: Decimal,
    #[serde(default, alias = "forecasted_sales_count")]
    pub forecasted_sales_count: u64,
    #[serde(default, alias = "confidence_level")]
    pub confidence_level: Decimal,
}

impl ForecastPoint {
    pub fn new(
        period_identifier: impl Into<String>,
        forecasted_revenue: Decimal,
        forecasted_profit: Decimal,
    ) -> Self {
        Self {
            period_identifier: period_identifier.into(),
            forecasted_revenue,
            forecasted_profit,
            forecasted_sales_count: 0,
            confidence_level: Decimal::ZERO,
        }
    }

    pub fn with_sales_count(mut self, count: u64) -> Self {
        self.forecasted_sales_count = count;
        self
    }

    pub fn with_confidence(mut self, confidence: Decimal) -> Self {
        self.confidence_level = confidence;
        self
    }

    /// Projected cost of goods, implied by revenue minus profit.
    pub fn forecasted_cogs(&self) -> Decimal {
        self.forecasted_revenue.saturating_sub(self.forecasted_profit)
    }

    /// Confidence clamped into `[0, 1]`.
    pub fn confidence(&self) -> Decimal {
        self.confidence_level.clamp(Decimal::ZERO, Decimal::ONE)
    }
}
