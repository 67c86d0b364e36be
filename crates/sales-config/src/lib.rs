//! sales-config
//!
//! Persistent user preferences for the sales tracker.
//! Owns the Config data structure plus disk persistence helpers.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::{app_data_dir, ConfigManager};
pub use model::Config;
