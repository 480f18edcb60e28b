//! Shared enums and calendar-key helpers for sales analytics primitives.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Calendar granularity used for bucketing and forecast requests.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Daily,
    #[default]
    Monthly,
    Yearly,
}

impl PeriodType {
    /// Formats the zero-padded bucket key for `date` (`YYYY-MM-DD`, `YYYY-MM` or `YYYY`).
    ///
    /// Keys of one granularity sort chronologically when compared as strings.
    pub fn key_for(self, date: NaiveDate) -> String {
        match self {
            PeriodType::Daily => date.format("%Y-%m-%d").to_string(),
            PeriodType::Monthly => format!("{:04}-{:02}", date.year(), date.month()),
            PeriodType::Yearly => format!("{:04}", date.year()),
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" => Some(PeriodType::Daily),
            "monthly" | "month" => Some(PeriodType::Monthly),
            "yearly" | "year" => Some(PeriodType::Yearly),
            _ => None,
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PeriodType::Daily => "daily",
            PeriodType::Monthly => "monthly",
            PeriodType::Yearly => "yearly",
        };
        f.write_str(label)
    }
}

/// Decides how a record's profit is read when the upstream omits it.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProfitPolicy {
    /// Use the server-supplied profit; a missing value counts as zero.
    #[default]
    AsSupplied,
    /// Fall back to `total - cogs` when profit is missing.
    DeriveFromCogs,
}

impl fmt::Display for ProfitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProfitPolicy::AsSupplied => "as_supplied",
            ProfitPolicy::DeriveFromCogs => "derive_from_cogs",
        };
        f.write_str(label)
    }
}
