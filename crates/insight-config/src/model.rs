use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use insight_domain::{PeriodType, ProfitPolicy};

use crate::ConfigError;

/// Reporting preferences. Every field has a default so partial files load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// First day of the week, 0 = Sunday through 6 = Saturday.
    #[serde(default)]
    pub week_starts_on: u8,
    #[serde(default)]
    pub period_type: PeriodType,
    #[serde(default = "Config::default_forecast_periods_ahead")]
    pub forecast_periods_ahead: u32,
    #[serde(default)]
    pub profit_policy: ProfitPolicy,
    /// Months of history fetched for one report.
    #[serde(default = "Config::default_history_months")]
    pub history_months: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional directory holding exported feed files. Defaults to `~/Documents/SalesInsight`.
    pub default_feed_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            week_starts_on: 0,
            period_type: PeriodType::default(),
            forecast_periods_ahead: Self::default_forecast_periods_ahead(),
            profit_policy: ProfitPolicy::default(),
            history_months: Self::default_history_months(),
            default_feed_root: None,
        }
    }
}

impl Config {
    pub const MAX_FORECAST_PERIODS: u32 = 24;
    pub const MAX_HISTORY_MONTHS: u32 = 36;

    pub fn default_forecast_periods_ahead() -> u32 {
        6
    }

    pub fn default_history_months() -> u32 {
        12
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.week_starts_on > 6 {
            return Err(ConfigError::Invalid(format!(
                "week_starts_on must be 0-6, got {}",
                self.week_starts_on
            )));
        }
        if !(1..=Self::MAX_FORECAST_PERIODS).contains(&self.forecast_periods_ahead) {
            return Err(ConfigError::Invalid(format!(
                "forecast_periods_ahead must be 1-{}, got {}",
                Self::MAX_FORECAST_PERIODS,
                self.forecast_periods_ahead
            )));
        }
        if !(1..=Self::MAX_HISTORY_MONTHS).contains(&self.history_months) {
            return Err(ConfigError::Invalid(format!(
                "history_months must be 1-{}, got {}",
                Self::MAX_HISTORY_MONTHS,
                self.history_months
            )));
        }
        Ok(())
    }

    pub fn resolve_feed_root(&self) -> PathBuf {
        if let Some(path) = &self.default_feed_root {
            return path.clone();
        }

        let base = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join("SalesInsight")
    }
}
