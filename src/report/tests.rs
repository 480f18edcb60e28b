use std::sync::{
    atomic::{AtomicUsize, Ordering},
    mpsc, Arc, Mutex,
};

use chrono::{NaiveDate, Weekday};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use insight_config::Config;
use insight_core::{
    CoreError, FixedClock, ForecastRequest, ForecastSource, SalesQuery, SalesSource,
    SummaryOptions,
};
use insight_domain::{ForecastPoint, PeriodType, SaleRecord, SaleStatus};

use super::{ProfitReport, ReportOptions, ReportService};
use crate::InsightError;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn anchor() -> NaiveDate {
    date(2024, 2, 15)
}

fn records() -> Vec<SaleRecord> {
    vec![
        SaleRecord::new("1", Some(date(2024, 1, 5)), dec!(100))
            .with_profit(dec!(20))
            .with_payment_method("cash"),
        SaleRecord::new("2", Some(date(2024, 1, 5)), dec!(50))
            .with_profit(dec!(10))
            .with_payment_method("cash"),
        SaleRecord::new("3", Some(date(2024, 2, 10)), dec!(200))
            .with_profit(dec!(40))
            .with_payment_method("online"),
        SaleRecord::new("old", Some(date(2022, 6, 1)), dec!(999)).with_profit(dec!(1)),
        SaleRecord::new("void", Some(date(2024, 2, 12)), dec!(70))
            .with_profit(dec!(7))
            .with_status(SaleStatus::Cancelled),
    ]
}

#[derive(Default)]
struct StubSales {
    records: Vec<SaleRecord>,
    calls: Arc<AtomicUsize>,
}

impl SalesSource for StubSales {
    fn fetch_sales(&self, query: &SalesQuery) -> Result<Vec<SaleRecord>, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(query.apply(self.records.clone()))
    }
}

struct FailingSales;

impl SalesSource for FailingSales {
    fn fetch_sales(&self, _query: &SalesQuery) -> Result<Vec<SaleRecord>, CoreError> {
        Err(CoreError::Upstream("sales endpoint returned 503".into()))
    }
}

/// Blocks its first fetch until released, announcing when it has started.
struct GatedSales {
    records: Vec<SaleRecord>,
    entered: Mutex<Option<mpsc::Sender<()>>>,
    release: Mutex<Option<mpsc::Receiver<()>>>,
}

impl SalesSource for GatedSales {
    fn fetch_sales(&self, query: &SalesQuery) -> Result<Vec<SaleRecord>, CoreError> {
        let release = self.release.lock().unwrap().take();
        if let Some(release) = release {
            if let Some(entered) = self.entered.lock().unwrap().take() {
                entered.send(()).unwrap();
            }
            release.recv().unwrap();
        }
        Ok(query.apply(self.records.clone()))
    }
}

struct StubForecast(Vec<ForecastPoint>);

impl ForecastSource for StubForecast {
    fn fetch_forecast(&self, request: &ForecastRequest) -> Result<Vec<ForecastPoint>, CoreError> {
        Ok(self
            .0
            .iter()
            .take(request.periods_ahead as usize)
            .cloned()
            .collect())
    }
}

fn march_forecast() -> StubForecast {
    StubForecast(vec![ForecastPoint::new("2024-03", dec!(300), dec!(60))
        .with_sales_count(9)
        .with_confidence(dec!(0.8))])
}

fn service_with(records: Vec<SaleRecord>) -> (ReportService, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let sales = StubSales {
        records,
        calls: Arc::clone(&calls),
    };
    let service = ReportService::with_clock(
        Box::new(sales),
        Box::new(march_forecast()),
        Box::new(FixedClock::at_date(anchor())),
    );
    (service, calls)
}

fn refresh(service: &ReportService) -> ProfitReport {
    service
        .refresh(anchor(), &ReportOptions::default())
        .expect("refresh succeeds")
        .expect("report published")
}

#[test]
fn refresh_derives_every_view_from_one_fetch() {
    let (service, calls) = service_with(records());
    let report = refresh(&service);

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(report.window.from, date(2023, 2, 16));
    assert_eq!(report.window.to, anchor());
    assert_eq!(report.record_count, 3);

    assert_eq!(report.summary.this_week, Decimal::ZERO);
    assert_eq!(report.summary.this_month, dec!(40));
    assert_eq!(report.summary.this_year, dec!(70));
    assert_eq!(report.summary.total_revenue, dec!(350));
    assert_eq!(report.summary.total_profit, dec!(70));
    assert_eq!(report.summary.average_margin, dec!(20));

    assert_eq!(report.month_over_month.current.profit, dec!(40));
    assert_eq!(report.month_over_month.previous.profit, dec!(30));
    assert_eq!(report.month_over_month.profit_growth.round_dp(2), dec!(33.33));

    let days: Vec<&str> = report.daily.iter().map(|b| b.key.as_str()).collect();
    assert_eq!(days, vec!["2024-01-05", "2024-02-10"]);
    let months: Vec<&str> = report.monthly.iter().map(|b| b.key.as_str()).collect();
    assert_eq!(months, vec!["2024-01", "2024-02"]);
    assert_eq!(report.history, report.monthly);

    assert_eq!(report.breakdown.len(), 5);
    assert_eq!(report.breakdown[0].revenue, dec!(150));
    assert_eq!(report.outlook.total_revenue, dec!(300));
    assert_eq!(report.outlook.total_sales_count, 9);

    let chart = report.chart_series().expect("chart built");
    assert_eq!(chart.labels, vec!["2024-01", "2024-02", "2024-03"]);
    assert_eq!(chart.datasets.len(), 6);
    assert!(chart.is_aligned());
    let forecast_revenue = chart.dataset("Forecast Revenue").unwrap();
    assert_eq!(
        forecast_revenue.values,
        vec![None, Some(dec!(200)), Some(dec!(300))]
    );
    let forecast_cogs = chart.dataset("Forecast COGS").unwrap();
    assert_eq!(forecast_cogs.values[2], Some(dec!(240)));

    assert_eq!(service.latest(), Some(report));
}

#[test]
fn upstream_failure_propagates_and_publishes_nothing() {
    let service = ReportService::new(Box::new(FailingSales), Box::new(march_forecast()));
    let err = service
        .refresh(anchor(), &ReportOptions::default())
        .expect_err("upstream failure");
    assert!(matches!(err, InsightError::Core(CoreError::Upstream(_))));
    assert!(service.latest().is_none());
}

#[test]
fn forecast_overlapping_history_withholds_only_the_chart() {
    let forecast = StubForecast(vec![ForecastPoint::new("2024-02", dec!(1), dec!(1))]);
    let sales = StubSales {
        records: records(),
        ..StubSales::default()
    };
    let service = ReportService::new(Box::new(sales), Box::new(forecast));
    let report = service
        .refresh(anchor(), &ReportOptions::default())
        .expect("refresh succeeds")
        .expect("report published");

    assert_eq!(report.summary.total_profit, dec!(70));
    assert_eq!(report.breakdown[0].revenue, dec!(150));
    assert_eq!(report.history.len(), 2);
    assert!(report.chart.is_none());
    assert_eq!(report.chart_collision.as_deref(), Some("2024-02"));
    let err = report.chart_series().expect_err("collision");
    assert!(matches!(err, CoreError::PeriodCollision(ref period) if period == "2024-02"));
    assert!(service.latest().is_some());
}

#[test]
fn superseded_refresh_is_discarded() {
    let (entered_tx, entered_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    let sales = GatedSales {
        records: records(),
        entered: Mutex::new(Some(entered_tx)),
        release: Mutex::new(Some(release_rx)),
    };
    let service = Arc::new(ReportService::new(
        Box::new(sales),
        Box::new(march_forecast()),
    ));

    let slow = {
        let service = Arc::clone(&service);
        std::thread::spawn(move || service.refresh(anchor(), &ReportOptions::default()))
    };
    entered_rx.recv().expect("slow refresh started");

    let fresh = refresh(&service);
    release_tx.send(()).expect("release slow refresh");
    let stale = slow.join().expect("thread joins").expect("refresh succeeds");

    assert!(stale.is_none());
    let latest = service.latest().expect("published report");
    assert_eq!(latest.records_version, fresh.records_version);
    assert_eq!(service.cached_summaries(), 1);
}

#[test]
fn summaries_are_cached_per_snapshot() {
    let (service, calls) = service_with(records());
    assert!(service.summary_at(anchor(), &SummaryOptions::default()).is_none());

    let report = refresh(&service);
    assert_eq!(service.cached_summaries(), 1);

    let again = service
        .summary_at(anchor(), &SummaryOptions::default())
        .expect("snapshot available");
    assert_eq!(again, report.summary);
    assert_eq!(service.cached_summaries(), 1);

    let january = service
        .summary_at(date(2024, 1, 31), &SummaryOptions::default())
        .expect("snapshot available");
    assert_eq!(january.this_month, dec!(30));
    assert_eq!(service.cached_summaries(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    refresh(&service);
    assert_eq!(service.cached_summaries(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn refresh_today_uses_the_clock() {
    let (service, _) = service_with(records());
    let report = service
        .refresh_today(&ReportOptions::default())
        .expect("refresh succeeds")
        .expect("published");
    assert_eq!(report.anchor, anchor());
}

#[test]
fn options_follow_config() {
    let config = Config {
        week_starts_on: 1,
        period_type: PeriodType::Yearly,
        forecast_periods_ahead: 2,
        ..Config::default()
    };
    let options = ReportOptions::from_config(&config).expect("valid config");
    assert_eq!(options.summary.week_start, Weekday::Mon);
    assert_eq!(options.history_period, PeriodType::Yearly);
    let forecast = options.forecast.expect("yearly forecast requested");
    assert_eq!(forecast.period_type, PeriodType::Yearly);
    assert_eq!(forecast.periods_ahead, 2);
}

#[test]
fn daily_config_charts_daily_history_without_forecast() {
    let config = Config {
        period_type: PeriodType::Daily,
        ..Config::default()
    };
    let options = ReportOptions::from_config(&config).expect("daily config accepted");
    assert_eq!(options.history_period, PeriodType::Daily);
    assert!(options.forecast.is_none());

    let (service, _) = service_with(records());
    let report = service
        .refresh(anchor(), &options)
        .expect("refresh succeeds")
        .expect("report published");
    assert_eq!(report.history, report.daily);
    assert!(report.forecast.is_empty());
    assert_eq!(report.outlook.periods, 0);
    let chart = report.chart_series().expect("chart built");
    assert_eq!(chart.labels, vec!["2024-01-05", "2024-02-10"]);
    assert_eq!(report.summary.this_month, dec!(40));
}

#[test]
fn fetch_window_covers_previous_month_and_week_across_new_year() {
    let options = ReportOptions {
        history_months: 0,
        ..ReportOptions::default()
    };
    let window = options.fetch_window(date(2024, 1, 2));
    assert_eq!(window.from, date(2023, 12, 1));
    assert_eq!(window.to, date(2024, 1, 2));
}
