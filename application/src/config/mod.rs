//! Application configuration

pub mod extraction_params;

pub use extraction_params::ExtractionParams;
