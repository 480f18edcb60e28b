//! Inclusive calendar windows used to slice sale records.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
/// Defines an inclusive `[from, to]` range of calendar dates.
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateWindow {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, DateWindowError> {
        if to < from {
            return Err(DateWindowError::InvalidRange);
        }
        Ok(Self { from, to })
    }

    /// A window covering exactly one day.
    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            from: date,
            to: date,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date <= self.to
    }

    /// Checks a `YYYY-MM-DD` bucket key against the window without parsing it.
    pub fn contains_key(&self, key: &str) -> bool {
        let from = self.from.format("%Y-%m-%d").to_string();
        let to = self.to.format("%Y-%m-%d").to_string();
        key >= from.as_str() && key <= to.as_str()
    }

    /// Number of calendar days covered, both ends included.
    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} .. {}",
            self.from.format("%Y-%m-%d"),
            self.to.format("%Y-%m-%d")
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Errors that can occur when constructing [`DateWindow`] values.
pub enum DateWindowError {
    InvalidRange,
}

impl fmt::Display for DateWindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateWindowError::InvalidRange => f.write_str("date window end must not precede start"),
        }
    }
}

impl std::error::Error for DateWindowError {}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
/// To-date windows resolved relative to an anchor date.
pub enum WindowKind {
    Week,
    Month,
    Year,
}

impl WindowKind {
    pub const ALL: [WindowKind; 3] = [WindowKind::Week, WindowKind::Month, WindowKind::Year];
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WindowKind::Week => "week",
            WindowKind::Month => "month",
            WindowKind::Year => "year",
        };
        f.write_str(label)
    }
}
