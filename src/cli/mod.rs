pub mod output;
pub mod table;
pub mod views;

use std::{env, path::PathBuf};

use chrono::NaiveDate;
use serde::Serialize;

use insight_config::{Config, ConfigManager};
use insight_core::{CoreError, ForecastRequest, ForecastSource};
use insight_domain::{ChartSeries, ForecastPoint, PeriodType};
use insight_feed_json::{JsonForecastFeed, JsonSalesFeed};

use crate::{
    report::{ProfitReport, ReportOptions, ReportService},
    utils::build_info,
    InsightError,
};

const SALES_FILE: &str = "sales.json";
const FORECAST_FILE: &str = "forecast.json";

const USAGE: &str = "\
Usage: sales_insight_cli <command> [options]

Commands:
  summary     Week/month/year-to-date profit and all-time totals
  breakdown   Revenue and profit per payment method
  buckets     Per-period totals (use --period daily|monthly|yearly)
  chart       Historical and forecast series on one timeline
  version     Build information
  help        This message

Options:
  --records PATH     Sales feed file (default: <feed root>/sales.json)
  --forecast PATH    Forecast feed file (default: <feed root>/forecast.json)
  --anchor DATE      Anchor date as YYYY-MM-DD (default: today)
  --config PATH      Configuration file
  --period PERIOD    Bucket granularity for `buckets`
  --json             Print JSON instead of tables
  --plain            Disable colors and box-drawing characters";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Summary,
    Breakdown,
    Buckets,
    Chart,
    Version,
    Help,
}

impl Command {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "summary" => Some(Command::Summary),
            "breakdown" => Some(Command::Breakdown),
            "buckets" => Some(Command::Buckets),
            "chart" => Some(Command::Chart),
            "version" | "--version" => Some(Command::Version),
            "help" | "--help" | "-h" => Some(Command::Help),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub command: Command,
    pub records: Option<PathBuf>,
    pub forecast: Option<PathBuf>,
    pub anchor: Option<NaiveDate>,
    pub config: Option<PathBuf>,
    pub period: Option<PeriodType>,
    pub json: bool,
    pub plain: bool,
}

impl CliArgs {
    pub fn parse<I>(args: I) -> Result<Self, InsightError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let mut parsed = CliArgs {
            command: Command::Help,
            records: None,
            forecast: None,
            anchor: None,
            config: None,
            period: None,
            json: false,
            plain: false,
        };
        let mut command = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--records" => parsed.records = Some(value_for(&arg, args.next())?.into()),
                "--forecast" => parsed.forecast = Some(value_for(&arg, args.next())?.into()),
                "--config" => parsed.config = Some(value_for(&arg, args.next())?.into()),
                "--anchor" => {
                    let raw = value_for(&arg, args.next())?;
                    let date = NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
                        InsightError::Usage(format!("`{raw}` is not a YYYY-MM-DD date"))
                    })?;
                    parsed.anchor = Some(date);
                }
                "--period" => {
                    let raw = value_for(&arg, args.next())?;
                    let period = PeriodType::parse(&raw).ok_or_else(|| {
                        InsightError::Usage(format!("unknown period `{raw}`"))
                    })?;
                    parsed.period = Some(period);
                }
                "--json" => parsed.json = true,
                "--plain" => parsed.plain = true,
                other if command.is_none() => {
                    command = Some(Command::parse(other).ok_or_else(|| {
                        InsightError::Usage(format!("unknown command `{other}`"))
                    })?);
                }
                other => {
                    return Err(InsightError::Usage(format!(
                        "unexpected argument `{other}`"
                    )))
                }
            }
        }

        parsed.command = command.unwrap_or(Command::Help);
        Ok(parsed)
    }
}

fn value_for(flag: &str, value: Option<String>) -> Result<String, InsightError> {
    value.ok_or_else(|| InsightError::Usage(format!("{flag} expects a value")))
}

/// Stands in for the forecast feed when no forecast file is available.
struct NoForecast;

impl ForecastSource for NoForecast {
    fn fetch_forecast(&self, _request: &ForecastRequest) -> Result<Vec<ForecastPoint>, CoreError> {
        Ok(Vec::new())
    }
}

pub fn run_cli() -> Result<(), InsightError> {
    run(env::args().skip(1))
}

pub fn run<I>(args: I) -> Result<(), InsightError>
where
    I: IntoIterator<Item = String>,
{
    let args = CliArgs::parse(args)?;
    output::set_preferences(output::OutputPreferences {
        plain_mode: args.plain,
    });

    match args.command {
        Command::Help => {
            println!("{USAGE}");
            return Ok(());
        }
        Command::Version => {
            println!("{}", build_info::current().summary_line());
            return Ok(());
        }
        _ => {}
    }

    let config = match &args.config {
        Some(path) => ConfigManager::new(path.clone()).load()?,
        None => ConfigManager::default_location().load()?,
    };
    let mut options = ReportOptions::from_config(&config)?;
    if let Some(period) = args.period.filter(|period| *period != PeriodType::Daily) {
        options.history_period = period;
        options.forecast = Some(ForecastRequest::new(period, config.forecast_periods_ahead)?);
    }

    let service = build_service(&args, &config);
    let report = match args.anchor {
        Some(anchor) => service.refresh(anchor, &options)?,
        None => service.refresh_today(&options)?,
    }
    .ok_or_else(|| InsightError::Usage("no report was produced".into()))?;

    match args.command {
        Command::Summary => {
            emit(&args, &report.summary, || {
                output::section(format!("Summary as of {}", report.anchor));
                output::info(views::summary_table(
                    &report.summary,
                    report.anchor,
                    &options.summary,
                ));
                output::info(views::comparison_line(&report.month_over_month));
            })?;
        }
        Command::Breakdown => {
            emit(&args, &report.breakdown, || {
                output::section("Payment methods");
                output::info(views::breakdown_table(&report.breakdown));
            })?;
        }
        Command::Buckets => {
            let buckets = match args.period {
                Some(PeriodType::Daily) => &report.daily,
                _ => &report.history,
            };
            emit(&args, buckets, || {
                output::section(format!("Buckets in {}", report.window));
                output::info(views::bucket_table(buckets));
            })?;
        }
        Command::Chart => {
            let chart = report.chart_series()?;
            emit(&args, chart, || print_chart(&report, chart))?;
        }
        Command::Version | Command::Help => {}
    }
    Ok(())
}

fn build_service(args: &CliArgs, config: &Config) -> ReportService {
    let root = config.resolve_feed_root();
    let records = args.records.clone().unwrap_or_else(|| root.join(SALES_FILE));
    let sales = JsonSalesFeed::new(records);

    let forecast_path = args.forecast.clone().or_else(|| {
        let default = root.join(FORECAST_FILE);
        default.exists().then_some(default)
    });
    let forecast: Box<dyn ForecastSource> = match forecast_path {
        Some(path) => Box::new(JsonForecastFeed::new(path)),
        None => {
            output::warning("no forecast feed found; charting history only");
            Box::new(NoForecast)
        }
    };
    ReportService::new(Box::new(sales), forecast)
}

fn emit<T: Serialize>(args: &CliArgs, value: &T, human: impl FnOnce()) -> Result<(), InsightError> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        human();
    }
    Ok(())
}

fn print_chart(report: &ProfitReport, chart: &ChartSeries) {
    output::section("Historical and forecast series");
    output::info(views::chart_table(chart));
    if report.outlook.periods > 0 {
        output::info(views::outlook_line(&report.outlook));
    }
}
