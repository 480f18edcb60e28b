//! insight-domain
//!
//! Pure data model for sales analytics (SaleRecord, Bucket, ForecastPoint, ChartSeries, etc.).
//! No I/O, no aggregation logic. Only data types, enums, and payload decoding.

pub mod bucket;
pub mod chart;
pub mod common;
pub mod forecast;
pub mod sale;
pub mod summary;
pub mod window;

pub use bucket::*;
pub use chart::*;
pub use common::*;
pub use forecast::*;
pub use sale::*;
pub use summary::*;
pub use window::*;
