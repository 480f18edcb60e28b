//! Forecast request validation and roll-ups over upstream predictions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use insight_domain::{ForecastPoint, PeriodType};

use crate::{
    metrics::{margin_percent, safe_average, safe_sum},
    CoreError,
};

/// Parameters sent to the forecast endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastRequest {
    pub period_type: PeriodType,
    pub periods_ahead: u32,
}

impl ForecastRequest {
    pub const MAX_PERIODS_AHEAD: u32 = 24;

    /// Validates the request. Forecasts are produced monthly or yearly only.
    pub fn new(period_type: PeriodType, periods_ahead: u32) -> Result<Self, CoreError> {
        if period_type == PeriodType::Daily {
            return Err(CoreError::InvalidForecastRequest(
                "daily forecasts are not offered; use monthly or yearly".into(),
            ));
        }
        if periods_ahead == 0 || periods_ahead > Self::MAX_PERIODS_AHEAD {
            return Err(CoreError::InvalidForecastRequest(format!(
                "periods ahead must be between 1 and {}, got {}",
                Self::MAX_PERIODS_AHEAD,
                periods_ahead
            )));
        }
        Ok(Self {
            period_type,
            periods_ahead,
        })
    }
}

/// Totals across a forecast horizon, as shown on performance panels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastOutlook {
    pub periods: usize,
    pub total_revenue: Decimal,
    pub total_profit: Decimal,
    pub total_sales_count: u64,
    pub projected_margin: Decimal,
    pub average_confidence: Decimal,
}

pub struct ForecastService;

impl ForecastService {
    pub fn outlook(points: &[ForecastPoint]) -> ForecastOutlook {
        let total_revenue = safe_sum(points.iter().map(|point| Some(point.forecasted_revenue)));
        let total_profit = safe_sum(points.iter().map(|point| Some(point.forecasted_profit)));
        let confidence = safe_sum(points.iter().map(|point| Some(point.confidence())));
        ForecastOutlook {
            periods: points.len(),
            total_revenue,
            total_profit,
            total_sales_count: points
                .iter()
                .fold(0u64, |acc, point| acc.saturating_add(point.forecasted_sales_count)),
            projected_margin: margin_percent(total_profit, total_revenue),
            average_confidence: safe_average(confidence, points.len() as u64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn request_rejects_daily_and_out_of_range_horizons() {
        assert!(ForecastRequest::new(PeriodType::Daily, 3).is_err());
        assert!(ForecastRequest::new(PeriodType::Monthly, 0).is_err());
        assert!(ForecastRequest::new(PeriodType::Yearly, 25).is_err());
        let request = ForecastRequest::new(PeriodType::Monthly, 12).expect("valid request");
        assert_eq!(request.periods_ahead, 12);
    }

    #[test]
    fn outlook_totals_and_clamps_confidence() {
        let points = vec![
            ForecastPoint::new("2024-03", dec!(300), dec!(60))
                .with_sales_count(10)
                .with_confidence(dec!(0.8)),
            ForecastPoint::new("2024-04", dec!(100), dec!(20))
                .with_sales_count(4)
                .with_confidence(dec!(1.4)),
        ];
        let outlook = ForecastService::outlook(&points);
        assert_eq!(outlook.periods, 2);
        assert_eq!(outlook.total_revenue, dec!(400));
        assert_eq!(outlook.total_profit, dec!(80));
        assert_eq!(outlook.total_sales_count, 14);
        assert_eq!(outlook.projected_margin, dec!(20));
        assert_eq!(outlook.average_confidence, dec!(0.9));
    }

    #[test]
    fn outlook_saturates_on_huge_projections() {
        let near_max = dec!(50000000000000000000000000000);
        let points = vec![
            ForecastPoint::new("2024-03", near_max, dec!(1)).with_sales_count(u64::MAX),
            ForecastPoint::new("2024-04", near_max, dec!(1)).with_sales_count(1),
        ];
        let outlook = ForecastService::outlook(&points);
        assert_eq!(outlook.total_revenue, Decimal::MAX);
        assert_eq!(outlook.total_profit, dec!(2));
        assert_eq!(outlook.total_sales_count, u64::MAX);
    }

    #[test]
    fn empty_outlook_is_zeroed() {
        assert_eq!(ForecastService::outlook(&[]), ForecastOutlook::default());
    }
}
