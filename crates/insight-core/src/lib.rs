//! insight-core
//!
//! Aggregation, metric, and chart-merge services for sales analytics.
//! Depends on insight-domain. No CLI, no terminal I/O, no network access.

pub mod breakdown_service;
pub mod bucket_service;
pub mod cache;
pub mod chart_service;
pub mod error;
pub mod feed;
pub mod forecast_service;
pub mod metrics;
pub mod sequencing;
pub mod summary_service;
pub mod time;
pub mod window_service;

pub use breakdown_service::*;
pub use bucket_service::*;
pub use cache::*;
pub use chart_service::*;
pub use error::CoreError;
pub use feed::*;
pub use forecast_service::*;
pub use metrics::*;
pub use sequencing::*;
pub use summary_service::*;
pub use time::*;
pub use window_service::*;
