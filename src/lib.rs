#![doc(test(attr(deny(warnings))))]

//! Sales Insight turns raw sale records and upstream forecasts into the
//! summary figures, breakdowns, and merged chart series shown on sales
//! analytics dashboards.

pub mod cli;
pub mod errors;
pub mod report;
pub mod utils;

pub use errors::InsightError;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Sales Insight tracing initialized.");
    });
}
