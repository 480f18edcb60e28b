//! Profit report orchestration: one sales fetch feeds every derived view.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{Months, NaiveDate};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use insight_config::Config;
use insight_core::{
    week_start_from_index, BreakdownService, BucketService, ChartService, Clock, CoreError,
    ForecastOutlook, ForecastRequest, ForecastService, ForecastSource, LatestResult, MetricSet, RequestSequencer,
    PeriodComparison, RequestTicket, SalesQuery, SalesSnapshot, SalesSource, SummaryCache,
    SummaryOptions, SummaryService, SystemClock, WindowResolver,
};
use insight_domain::{
    Bucket, ChartSeries, DateWindow, ForecastPoint, PaymentBreakdown, PeriodType,
    SummaryStatistics, WindowKind,
};

use crate::InsightError;

/// Everything a refresh needs to know, passed explicitly on each call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub summary: SummaryOptions,
    /// Granularity of the charted history buckets.
    pub history_period: PeriodType,
    /// `None` charts history only; daily history has no forecast counterpart.
    pub forecast: Option<ForecastRequest>,
    pub history_months: u32,
    pub metrics: MetricSet,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            summary: SummaryOptions::default(),
            history_period: PeriodType::Monthly,
            forecast: Some(ForecastRequest {
                period_type: PeriodType::Monthly,
                periods_ahead: Config::default_forecast_periods_ahead(),
            }),
            history_months: Config::default_history_months(),
            metrics: MetricSet::ProfitReport,
        }
    }
}

impl ReportOptions {
    pub fn from_config(config: &Config) -> Result<Self, InsightError> {
        config.validate()?;
        let week_start = week_start_from_index(config.week_starts_on).ok_or_else(|| {
            InsightError::Usage(format!("invalid week start {}", config.week_starts_on))
        })?;
        let forecast = match config.period_type {
            PeriodType::Daily => None,
            period => Some(ForecastRequest::new(period, config.forecast_periods_ahead)?),
        };
        Ok(Self {
            summary: SummaryOptions {
                week_start,
                profit_policy: config.profit_policy,
            },
            history_period: config.period_type,
            forecast,
            history_months: config.history_months,
            metrics: MetricSet::ProfitReport,
        })
    }

    /// Span fetched for one report: the trailing history, widened so the
    /// to-date windows and the previous month-to-date span are fully covered.
    pub fn fetch_window(&self, anchor: NaiveDate) -> DateWindow {
        let trailing = WindowResolver::trailing_months(anchor, self.history_months);
        let previous_month = anchor
            .checked_sub_months(Months::new(1))
            .map(|date| WindowResolver::resolve(WindowKind::Month, date, self.summary.week_start))
            .map_or(anchor, |window| window.from);
        let from = WindowResolver::resolve_all(anchor, self.summary.week_start)
            .iter()
            .map(|(_, window)| window.from)
            .fold(trailing.from.min(previous_month), NaiveDate::min);
        DateWindow { from, to: anchor }
    }
}

/// The derived views of one refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitReport {
    pub anchor: NaiveDate,
    pub window: DateWindow,
    pub records_version: Uuid,
    pub record_count: usize,
    pub summary: SummaryStatistics,
    pub month_over_month: PeriodComparison,
    pub daily: Vec<Bucket>,
    pub monthly: Vec<Bucket>,
    /// Buckets at the history granularity, as charted.
    pub history: Vec<Bucket>,
    pub breakdown: Vec<PaymentBreakdown>,
    pub forecast: Vec<ForecastPoint>,
    pub outlook: ForecastOutlook,
    /// Absent when the forecast overlaps the history.
    pub chart: Option<ChartSeries>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_collision: Option<String>,
}

impl ProfitReport {
    /// The merged chart, or the collision that kept it from being built.
    pub fn chart_series(&self) -> Result<&ChartSeries, CoreError> {
        self.chart.as_ref().ok_or_else(|| {
            CoreError::PeriodCollision(self.chart_collision.clone().unwrap_or_default())
        })
    }
}

/// Coordinates the sales and forecast feeds with the aggregation services.
///
/// Concurrent refreshes are ordered by ticket: a refresh that completes after
/// a newer one has been published is dropped instead of replacing it.
pub struct ReportService {
    sales: Box<dyn SalesSource>,
    forecast: Box<dyn ForecastSource>,
    clock: Box<dyn Clock>,
    sequencer: RequestSequencer,
    cache: Mutex<SummaryCache>,
    snapshot: Mutex<Option<(RequestTicket, Arc<SalesSnapshot>)>>,
    latest: LatestResult<ProfitReport>,
}

impl ReportService {
    pub fn new(sales: Box<dyn SalesSource>, forecast: Box<dyn ForecastSource>) -> Self {
        Self::with_clock(sales, forecast, Box::new(SystemClock))
    }

    pub fn with_clock(
        sales: Box<dyn SalesSource>,
        forecast: Box<dyn ForecastSource>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            sales,
            forecast,
            clock,
            sequencer: RequestSequencer::new(),
            cache: Mutex::new(SummaryCache::new()),
            snapshot: Mutex::new(None),
            latest: LatestResult::new(),
        }
    }

    /// Refreshes relative to the clock's current date.
    pub fn refresh_today(
        &self,
        options: &ReportOptions,
    ) -> Result<Option<ProfitReport>, InsightError> {
        self.refresh(self.clock.today(), options)
    }

    /// Fetches sales once and derives every view for `anchor`.
    ///
    /// Returns `Ok(None)` when a newer refresh published first; the computed
    /// report is discarded in that case.
    pub fn refresh(
        &self,
        anchor: NaiveDate,
        options: &ReportOptions,
    ) -> Result<Option<ProfitReport>, InsightError> {
        let ticket = self.sequencer.next();
        let window = options.fetch_window(anchor);
        info!(ticket = ticket.sequence(), %window, "refreshing profit report");

        let records = self.sales.fetch_sales(&SalesQuery::for_window(window))?;
        let snapshot = Arc::new(SalesSnapshot::new(records, self.clock.now()));
        let points = match &options.forecast {
            Some(request) => self.forecast.fetch_forecast(request)?,
            None => Vec::new(),
        };

        let summary = self.summary_for(&snapshot, anchor, &options.summary);
        let policy = options.summary.profit_policy;
        let daily = BucketService::ordered(&BucketService::by_day(&snapshot.records, policy));
        let monthly = BucketService::ordered(&BucketService::by_month(&snapshot.records, policy));
        let history = match options.history_period {
            PeriodType::Daily => daily.clone(),
            PeriodType::Monthly => monthly.clone(),
            period => BucketService::ordered(&BucketService::by_period(
                &snapshot.records,
                period,
                policy,
            )),
        };
        let (chart, chart_collision) = match ChartService::merge(&history, &points, options.metrics)
        {
            Ok(chart) => (Some(chart), None),
            Err(CoreError::PeriodCollision(period)) => {
                warn!(%period, "forecast overlaps history; chart withheld");
                (None, Some(period))
            }
            Err(err) => return Err(err.into()),
        };

        let report = ProfitReport {
            anchor,
            window,
            records_version: snapshot.version,
            record_count: snapshot.records.len(),
            summary,
            month_over_month: SummaryService::month_over_month(
                &snapshot.records,
                anchor,
                &options.summary,
            ),
            daily,
            monthly,
            history,
            breakdown: BreakdownService::by_payment_method(&snapshot.records, policy),
            outlook: ForecastService::outlook(&points),
            forecast: points,
            chart,
            chart_collision,
        };

        if !self.latest.publish(ticket, report.clone()) {
            self.cache
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .invalidate(snapshot.version);
            return Ok(None);
        }
        self.replace_snapshot(ticket, snapshot);
        info!(
            ticket = ticket.sequence(),
            records = report.record_count,
            labels = report.chart.as_ref().map_or(0, |chart| chart.labels.len()),
            "profit report published"
        );
        Ok(Some(report))
    }

    /// Summary for another anchor over the last published record set, without refetching.
    pub fn summary_at(
        &self,
        anchor: NaiveDate,
        options: &SummaryOptions,
    ) -> Option<SummaryStatistics> {
        let snapshot = self
            .snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|(_, snapshot)| Arc::clone(snapshot))?;
        Some(self.summary_for(&snapshot, anchor, options))
    }

    /// The most recently published report.
    pub fn latest(&self) -> Option<ProfitReport> {
        self.latest.get()
    }

    pub fn cached_summaries(&self) -> usize {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn summary_for(
        &self,
        snapshot: &SalesSnapshot,
        anchor: NaiveDate,
        options: &SummaryOptions,
    ) -> SummaryStatistics {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_or_compute(snapshot, anchor, options)
    }

    /// Keeps the snapshot of the newest published ticket and evicts the
    /// summaries of whichever snapshot loses.
    fn replace_snapshot(&self, ticket: RequestTicket, snapshot: Arc<SalesSnapshot>) {
        let evicted = {
            let mut slot = self.snapshot.lock().unwrap_or_else(PoisonError::into_inner);
            let newer_held = slot.as_ref().is_some_and(|(held, _)| *held > ticket);
            if newer_held {
                Some(snapshot)
            } else {
                slot.replace((ticket, snapshot)).map(|(_, previous)| previous)
            }
        };
        if let Some(previous) = evicted {
            let dropped = self
                .cache
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .invalidate(previous.version);
            debug!(version = %previous.version, dropped, "invalidated superseded summaries");
        }
    }
}

/// Week, month and year windows for `anchor`, as shown next to the summary figures.
pub fn summary_windows(
    anchor: NaiveDate,
    options: &SummaryOptions,
) -> [(WindowKind, DateWindow); 3] {
    WindowResolver::resolve_all(anchor, options.week_start)
}

#[cfg(test)]
mod tests;
