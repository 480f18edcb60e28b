use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use insight_core::{CoreError, ForecastRequest, ForecastSource, SalesQuery, SalesSource};
use insight_domain::{ForecastPoint, PeriodType, SaleRecord};

const ENVELOPE_FIELD: &str = "data";

/// Sales feed backed by an exported JSON file.
///
/// The file holds either a bare array of sale payloads or a
/// `{ "data": [...] }` envelope as returned by the sales endpoint.
#[derive(Debug, Clone)]
pub struct JsonSalesFeed {
    path: PathBuf,
}

impl JsonSalesFeed {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every record in the file, unfiltered.
    pub fn load_all(&self) -> Result<Vec<SaleRecord>, CoreError> {
        read_payload(&self.path)
    }
}

impl SalesSource for JsonSalesFeed {
    fn fetch_sales(&self, query: &SalesQuery) -> Result<Vec<SaleRecord>, CoreError> {
        let records = self.load_all()?;
        let total = records.len();
        let kept = query.apply(records);
        debug!(
            path = %self.path.display(),
            total,
            kept = kept.len(),
            "loaded sales feed"
        );
        Ok(kept)
    }
}

/// Forecast feed backed by an exported JSON file of forecast points.
#[derive(Debug, Clone)]
pub struct JsonForecastFeed {
    path: PathBuf,
}

impl JsonForecastFeed {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ForecastSource for JsonForecastFeed {
    /// Returns the points whose identifiers match the requested granularity,
    /// truncated to the requested horizon.
    fn fetch_forecast(&self, request: &ForecastRequest) -> Result<Vec<ForecastPoint>, CoreError> {
        let points: Vec<ForecastPoint> = read_payload(&self.path)?;
        let selected: Vec<ForecastPoint> = points
            .into_iter()
            .filter(|point| matches_granularity(&point.period_identifier, request.period_type))
            .take(request.periods_ahead as usize)
            .collect();
        debug!(
            path = %self.path.display(),
            period_type = %request.period_type,
            points = selected.len(),
            "loaded forecast feed"
        );
        Ok(selected)
    }
}

fn matches_granularity(identifier: &str, period_type: PeriodType) -> bool {
    let expected = match period_type {
        PeriodType::Daily => 10,
        PeriodType::Monthly => 7,
        PeriodType::Yearly => 4,
    };
    identifier.len() == expected
}

fn read_payload<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, CoreError> {
    let data = fs::read_to_string(path)
        .map_err(|err| CoreError::Upstream(format!("{}: {}", path.display(), err)))?;
    let value: Value =
        serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove(ENVELOPE_FIELD) {
            Some(Value::Array(items)) => items,
            Some(Value::Null) | None => Vec::new(),
            Some(other) => {
                return Err(CoreError::Serde(format!(
                    "`{}` must be an array, found {}",
                    ENVELOPE_FIELD, other
                )))
            }
        },
        other => {
            return Err(CoreError::Serde(format!(
                "expected an array or an envelope object, found {}",
                other
            )))
        }
    };
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(|err| CoreError::Serde(err.to_string())))
        .collect()
}
