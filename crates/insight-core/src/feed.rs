//! Seams to the upstream sales and forecast feeds.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use insight_domain::{DateWindow, ForecastPoint, SaleRecord};

use crate::{forecast_service::ForecastRequest, CoreError};

/// Filters a sales fetch the way the upstream endpoint does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalesQuery {
    pub window: Option<DateWindow>,
    pub exclude_cancelled: bool,
}

impl SalesQuery {
    /// Non-cancelled sales dated inside `window`.
    pub fn for_window(window: DateWindow) -> Self {
        Self {
            window: Some(window),
            exclude_cancelled: true,
        }
    }

    pub fn matches(&self, record: &SaleRecord) -> bool {
        if self.exclude_cancelled && record.is_cancelled() {
            return false;
        }
        match self.window {
            Some(window) => record.order_date.is_some_and(|date| window.contains(date)),
            None => true,
        }
    }

    /// Applies the query to an unfiltered payload, for sources that cannot filter remotely.
    pub fn apply(&self, records: Vec<SaleRecord>) -> Vec<SaleRecord> {
        records.into_iter().filter(|record| self.matches(record)).collect()
    }
}

/// Supplies sale records. Errors are upstream failures, never data-shape problems.
pub trait SalesSource: Send + Sync {
    fn fetch_sales(&self, query: &SalesQuery) -> Result<Vec<SaleRecord>, CoreError>;
}

/// Supplies per-period predictions from the forecasting model.
pub trait ForecastSource: Send + Sync {
    fn fetch_forecast(&self, request: &ForecastRequest) -> Result<Vec<ForecastPoint>, CoreError>;
}

/// One fetched record set. Each fetch gets a fresh version so caches can key on it.
#[derive(Debug, Clone)]
pub struct SalesSnapshot {
    pub version: Uuid,
    pub fetched_at: DateTime<Utc>,
    pub records: Vec<SaleRecord>,
}

impl SalesSnapshot {
    pub fn new(records: Vec<SaleRecord>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            version: Uuid::new_v4(),
            fetched_at,
            records,
        }
    }
}
