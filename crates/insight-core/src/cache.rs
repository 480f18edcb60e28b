//! Explicit memoization of summary statistics.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

use insight_domain::SummaryStatistics;

use crate::{
    feed::SalesSnapshot,
    summary_service::{SummaryOptions, SummaryService},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SummaryCacheKey {
    pub records_version: Uuid,
    pub anchor: NaiveDate,
    pub options: SummaryOptions,
}

/// Summaries keyed by `(records version, anchor, options)`.
///
/// Entries are only dropped through [`SummaryCache::invalidate`] or
/// [`SummaryCache::clear`].
#[derive(Debug, Default)]
pub struct SummaryCache {
    entries: HashMap<SummaryCacheKey, SummaryStatistics>,
}

impl SummaryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute(
        &mut self,
        snapshot: &SalesSnapshot,
        anchor: NaiveDate,
        options: &SummaryOptions,
    ) -> SummaryStatistics {
        let key = SummaryCacheKey {
            records_version: snapshot.version,
            anchor,
            options: *options,
        };
        if let Some(hit) = self.entries.get(&key) {
            debug!(version = %snapshot.version, %anchor, "summary cache hit");
            return hit.clone();
        }
        let summary = SummaryService::compute(&snapshot.records, anchor, options);
        self.entries.insert(key, summary.clone());
        summary
    }

    /// Drops every entry computed from `version`; returns how many were removed.
    pub fn invalidate(&mut self, version: Uuid) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.records_version != version);
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
