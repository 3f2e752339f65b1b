//! Infrastructure layer for vignette
//!
//! This crate contains adapters that implement the ports defined in
//! the application layer: the built-in extraction engines, the rule
//! based sentence segmenter, and configuration file loading.

pub mod config;
pub mod engines;
pub mod segment;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileConfig, FileEngineConfig, FileExtractionConfig, FileOutputConfig,
    OutputKind,
};
pub use engines::{LexiconEngine, PatternEngine, ProseEngine, build_registry};
pub use segment::RuleSegmenter;
