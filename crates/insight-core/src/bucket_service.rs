//! Folds sale records into per-day, per-month, or per-year buckets.

use tracing::debug;

use insight_domain::{Bucket, BucketMap, PeriodType, ProfitPolicy, SaleRecord};

/// Groups sale records by the calendar key of their order date.
pub struct BucketService;

impl BucketService {
    pub fn by_day(records: &[SaleRecord], policy: ProfitPolicy) -> BucketMap {
        Self::by_period(records, PeriodType::Daily, policy)
    }

    pub fn by_month(records: &[SaleRecord], policy: ProfitPolicy) -> BucketMap {
        Self::by_period(records, PeriodType::Monthly, policy)
    }

    pub fn by_year(records: &[SaleRecord], policy: ProfitPolicy) -> BucketMap {
        Self::by_period(records, PeriodType::Yearly, policy)
    }

    /// Buckets `records` by `period`. Records without a usable order date are skipped.
    ///
    /// A bucket exists only for keys at least one record maps to; no empty
    /// periods are filled in.
    pub fn by_period(records: &[SaleRecord], period: PeriodType, policy: ProfitPolicy) -> BucketMap {
        let mut buckets = BucketMap::new();
        let mut skipped = 0usize;
        for record in records {
            let Some(date) = record.order_date else {
                skipped += 1;
                continue;
            };
            let key = period.key_for(date);
            buckets
                .entry(key.clone())
                .or_insert_with(|| Bucket::empty(key))
                .absorb(record.revenue(), record.cost(), record.profit_with(policy));
        }
        if skipped > 0 {
            debug!(skipped, %period, "skipped sale records without an order date");
        }
        buckets
    }

    /// Buckets in ascending key order, ready to be charted.
    pub fn ordered(buckets: &BucketMap) -> Vec<Bucket> {
        buckets.values().cloned().collect()
    }
}
