//! Partitions sales by payment method.

use std::collections::{hash_map::Entry, HashMap};

use insight_domain::{Bucket, PaymentBreakdown, PaymentMethod, ProfitPolicy, SaleRecord};

use crate::metrics::margin_percent;

pub struct BreakdownService;

impl BreakdownService {
    /// Totals per payment method.
    ///
    /// Output order: the baseline methods (cash, cod, term, cheque, online),
    /// always present even when empty, then any other method in the order it
    /// first appears in `records`.
    pub fn by_payment_method(records: &[SaleRecord], policy: ProfitPolicy) -> Vec<PaymentBreakdown> {
        let mut order: Vec<PaymentMethod> = PaymentMethod::BASELINE.to_vec();
        let mut totals: HashMap<PaymentMethod, Bucket> = HashMap::new();

        for record in records {
            let bucket = match totals.entry(record.method()) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    if !entry.key().is_baseline() {
                        order.push(entry.key().clone());
                    }
                    let key = entry.key().to_string();
                    entry.insert(Bucket::empty(key))
                }
            };
            bucket.absorb(record.revenue(), record.cost(), record.profit_with(policy));
        }

        order
            .into_iter()
            .map(|method| {
                let bucket = totals
                    .remove(&method)
                    .unwrap_or_else(|| Bucket::empty(method.as_str()));
                PaymentBreakdown {
                    margin: margin_percent(bucket.profit, bucket.revenue),
                    profit: bucket.profit,
                    revenue: bucket.revenue,
                    count: bucket.count,
                    method,
                }
            })
            .collect()
    }
}
