//! Engine configuration value objects

pub mod config;

pub use config::{ConfigUpdate, ConfigValidationError, ExtractorConfig};
