//! Per-period accumulators produced by folding sale records.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Buckets keyed by zero-padded period key; iteration order is chronological.
pub type BucketMap = BTreeMap<String, Bucket>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Running totals for every record sharing one calendar key.
pub struct Bucket {
    pub key: String,
    pub revenue: Decimal,
    pub profit: Decimal,
    pub cogs: Decimal,
    pub count: u64,
}

impl Bucket {
    pub fn empty(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            revenue: Decimal::ZERO,
            profit: Decimal::ZERO,
            cogs: Decimal::ZERO,
            count: 0,
        }
    }

    /// Folds one record's amounts into the bucket. Totals saturate at the
    /// `Decimal` bounds.
    pub fn absorb(&mut self, revenue: Decimal, cogs: Decimal, profit: Decimal) {
        self.revenue = self.revenue.saturating_add(revenue);
        self.cogs = self.cogs.saturating_add(cogs);
        self.profit = self.profit.saturating_add(profit);
        self.count = self.count.saturating_add(1);
    }
}
