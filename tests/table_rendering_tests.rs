use chrono::NaiveDate;
use insta::assert_snapshot;
use rust_decimal_macros::dec;

use insight_core::{BreakdownService, BucketService, ChartService, MetricSet};
use insight_domain::{ForecastPoint, ProfitPolicy, SaleRecord};
use sales_insight::cli::{
    output::{set_preferences, OutputPreferences},
    views,
};

fn plain() {
    set_preferences(OutputPreferences { plain_mode: true });
}

fn records() -> Vec<SaleRecord> {
    let day = |m, d| NaiveDate::from_ymd_opt(2024, m, d);
    vec![
        SaleRecord::new("1", day(1, 5), dec!(100))
            .with_profit(dec!(20))
            .with_payment_method("cash"),
        SaleRecord::new("2", day(1, 5), dec!(50)).with_profit(dec!(10)),
        SaleRecord::new("3", day(2, 10), dec!(200))
            .with_profit(dec!(40))
            .with_payment_method("online"),
    ]
}

#[test]
fn breakdown_table_layout() {
    plain();
    let rows = BreakdownService::by_payment_method(&records(), ProfitPolicy::AsSupplied);
    assert_snapshot!(views::breakdown_table(&rows), @r###"
    Method  Revenue  Profit  Count  Margin
    --------------------------------------
    cash     150.00   30.00      2   20.0%
    cod        0.00    0.00      0    0.0%
    term       0.00    0.00      0    0.0%
    cheque     0.00    0.00      0    0.0%
    online   200.00   40.00      1   20.0%
    "###);
}

#[test]
fn bucket_table_layout() {
    plain();
    let buckets = BucketService::ordered(&BucketService::by_month(
        &records(),
        ProfitPolicy::AsSupplied,
    ));
    assert_snapshot!(views::bucket_table(&buckets), @r###"
    Period   Revenue  Profit  COGS  Count  Margin
    ---------------------------------------------
    2024-01   150.00   30.00  0.00      2   20.0%
    2024-02   200.00   40.00  0.00      1   20.0%
    "###);
}

#[test]
fn chart_table_marks_gaps() {
    plain();
    let history = BucketService::ordered(&BucketService::by_month(
        &records(),
        ProfitPolicy::AsSupplied,
    ));
    let forecast = vec![ForecastPoint::new("2024-03", dec!(300), dec!(60))];
    let chart = ChartService::merge(&history, &forecast, MetricSet::Standard).expect("merge");
    assert_snapshot!(views::chart_table(&chart), @r###"
    Period   Historical Revenue  Forecast Revenue  Historical Profit  Forecast Profit
    ---------------------------------------------------------------------------------
    2024-01              150.00                 -              30.00                -
    2024-02              200.00            200.00              40.00            40.00
    2024-03                   -            300.00                  -            60.00
    "###);
}
