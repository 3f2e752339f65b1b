//! Configuration file support

pub mod file_config;
pub mod loader;

pub use file_config::{
    FileConfig, FileEngineConfig, FileExtractionConfig, FileOutputConfig, OutputKind,
};
pub use loader::ConfigLoader;
