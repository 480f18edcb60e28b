use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_decimal::Decimal;

use insight_core::{
    BreakdownService, BucketService, ChartService, MetricSet, SummaryOptions, SummaryService,
};
use insight_domain::{ForecastPoint, ProfitPolicy, SaleRecord};

const METHODS: [&str; 6] = ["cash", "cod", "term", "cheque", "online", "voucher"];

fn build_sample_sales(count: usize) -> Vec<SaleRecord> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (0..count)
        .map(|idx| {
            let date = start + Duration::days((idx % 366) as i64);
            let total = Decimal::from(50 + (idx % 100) as i64);
            SaleRecord::new(idx.to_string(), Some(date), total)
                .with_cogs(total * Decimal::new(7, 1))
                .with_profit(total * Decimal::new(3, 1))
                .with_payment_method(METHODS[idx % METHODS.len()])
        })
        .collect()
}

fn bench_bucketing(c: &mut Criterion) {
    let sales = build_sample_sales(black_box(50_000));

    c.bench_function("bucket_by_day_50k", |b| {
        b.iter(|| black_box(BucketService::by_day(&sales, ProfitPolicy::AsSupplied)))
    });

    c.bench_function("bucket_by_month_50k", |b| {
        b.iter(|| black_box(BucketService::by_month(&sales, ProfitPolicy::DeriveFromCogs)))
    });

    c.bench_function("breakdown_50k", |b| {
        b.iter(|| {
            black_box(BreakdownService::by_payment_method(
                &sales,
                ProfitPolicy::AsSupplied,
            ))
        })
    });
}

fn bench_summary_and_chart(c: &mut Criterion) {
    let sales = build_sample_sales(black_box(50_000));
    let anchor = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
    let options = SummaryOptions::default();

    c.bench_function("summary_50k", |b| {
        b.iter(|| black_box(SummaryService::compute(&sales, anchor, &options)))
    });

    let history = BucketService::ordered(&BucketService::by_month(&sales, ProfitPolicy::AsSupplied));
    let forecast: Vec<ForecastPoint> = (1..=12)
        .map(|month| {
            ForecastPoint::new(
                format!("2025-{month:02}"),
                Decimal::from(1_000 * month),
                Decimal::from(250 * month),
            )
        })
        .collect();

    c.bench_function("chart_merge_monthly", |b| {
        b.iter(|| {
            let chart = ChartService::merge(&history, &forecast, MetricSet::ProfitReport)
                .expect("no collisions");
            black_box(chart)
        })
    });
}

criterion_group!(benches, bench_bucketing, bench_summary_and_chart);
criterion_main!(benches);
