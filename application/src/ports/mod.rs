//! Port definitions
//!
//! Interfaces the application layer needs from the outside world.
//! Implementations (adapters) live in the infrastructure layer.

pub mod engine;
pub mod progress;
pub mod segmenter;

pub use engine::{EngineError, ExtractionEngine};
pub use progress::{ExtractionPhase, NoProgress, ProgressNotifier};
pub use segmenter::{SentenceSegmenter, WholeTextSegmenter};
