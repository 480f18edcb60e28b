//! Merges historical buckets and an upstream forecast into one chart timeline.

use std::{collections::HashSet, iter};

use rust_decimal::Decimal;
use tracing::debug;

use insight_domain::{Bucket, ChartSeries, Dataset, ForecastPoint};

use crate::CoreError;

/// Which metrics get a historical/forecast dataset pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MetricSet {
    /// Revenue and profit.
    #[default]
    Standard,
    /// Revenue, profit, and cost of goods.
    ProfitReport,
}

impl MetricSet {
    pub fn metrics(self) -> &'static [ChartMetric] {
        match self {
            MetricSet::Standard => &[ChartMetric::Revenue, ChartMetric::Profit],
            MetricSet::ProfitReport => &[ChartMetric::Revenue, ChartMetric::Profit, ChartMetric::Cogs],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartMetric {
    Revenue,
    Profit,
    Cogs,
}

impl ChartMetric {
    pub fn label(self) -> &'static str {
        match self {
            ChartMetric::Revenue => "Revenue",
            ChartMetric::Profit => "Profit",
            ChartMetric::Cogs => "COGS",
        }
    }

    pub fn historical_name(self) -> String {
        format!("Historical {}", self.label())
    }

    pub fn forecast_name(self) -> String {
        format!("Forecast {}", self.label())
    }

    fn actual(self, bucket: &Bucket) -> Decimal {
        match self {
            ChartMetric::Revenue => bucket.revenue,
            ChartMetric::Profit => bucket.profit,
            ChartMetric::Cogs => bucket.cogs,
        }
    }

    fn projected(self, point: &ForecastPoint) -> Decimal {
        match self {
            ChartMetric::Revenue => point.forecasted_revenue,
            ChartMetric::Profit => point.forecasted_profit,
            ChartMetric::Cogs => point.forecasted_cogs(),
        }
    }
}

pub struct ChartService;

impl ChartService {
    /// Builds a label-aligned series from chronologically sorted `historical`
    /// buckets followed by the `forecast` periods.
    ///
    /// Each metric yields a `Historical <Metric>` dataset (actuals, then gaps)
    /// and a `Forecast <Metric>` dataset (gaps, then projections). When both
    /// inputs are non-empty the forecast dataset also carries the last actual
    /// value at the last historical label so the two lines meet.
    ///
    /// A forecast period that repeats any other label is rejected.
    pub fn merge(
        historical: &[Bucket],
        forecast: &[ForecastPoint],
        metrics: MetricSet,
    ) -> Result<ChartSeries, CoreError> {
        Self::ensure_unique_labels(historical, forecast)?;

        let labels: Vec<String> = historical
            .iter()
            .map(|bucket| bucket.key.clone())
            .chain(forecast.iter().map(|point| point.period_identifier.clone()))
            .collect();

        let bridge = historical.last().filter(|_| !forecast.is_empty());
        let mut datasets = Vec::with_capacity(metrics.metrics().len() * 2);
        for &metric in metrics.metrics() {
            let actual: Vec<Option<Decimal>> = historical
                .iter()
                .map(|bucket| Some(metric.actual(bucket)))
                .chain(iter::repeat(None).take(forecast.len()))
                .collect();

            let mut projected: Vec<Option<Decimal>> = vec![None; historical.len()];
            if let (Some(last), Some(slot)) = (bridge, projected.last_mut()) {
                *slot = Some(metric.actual(last));
            }
            projected.extend(forecast.iter().map(|point| Some(metric.projected(point))));

            datasets.push(Dataset {
                name: metric.historical_name(),
                values: actual,
            });
            datasets.push(Dataset {
                name: metric.forecast_name(),
                values: projected,
            });
        }

        debug!(
            historical = historical.len(),
            forecast = forecast.len(),
            datasets = datasets.len(),
            "merged chart series"
        );
        Ok(ChartSeries { labels, datasets })
    }

    fn ensure_unique_labels(historical: &[Bucket], forecast: &[ForecastPoint]) -> Result<(), CoreError> {
        let mut seen: HashSet<&str> = HashSet::with_capacity(historical.len() + forecast.len());
        let labels = historical
            .iter()
            .map(|bucket| bucket.key.as_str())
            .chain(forecast.iter().map(|point| point.period_identifier.as_str()));
        for label in labels {
            if !seen.insert(label) {
                return Err(CoreError::PeriodCollision(label.to_string()));
            }
        }
        Ok(())
    }
}
