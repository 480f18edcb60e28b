//! insight-config
//!
//! Report configuration model and JSON persistence.
//! Values are loaded here and handed to the engine explicitly on every call.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::Config;
