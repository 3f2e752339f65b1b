//! Application layer for vignette
//!
//! This crate contains the engine registry, port definitions, and the
//! scene-extraction use case. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod registry;
pub mod use_cases;

// Re-export commonly used types
pub use config::ExtractionParams;
pub use ports::{
    engine::{EngineError, ExtractionEngine},
    progress::{ExtractionPhase, NoProgress, ProgressNotifier},
    segmenter::{SentenceSegmenter, WholeTextSegmenter},
};
pub use registry::{EngineRegistry, EngineStatus, RegistryError, RegistrySnapshot, SnapshotEntry};
pub use use_cases::extract_scenes::{
    ExtractScenesError, ExtractScenesInput, ExtractScenesUseCase, SceneReport,
};
