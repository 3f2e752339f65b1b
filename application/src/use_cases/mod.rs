//! Use cases

pub mod extract_scenes;

pub use extract_scenes::{
    ExtractScenesError, ExtractScenesInput, ExtractScenesUseCase, SceneReport,
};
