//! Built-in extraction engines
//!
//! Three in-process engines with deliberately different biases, so the
//! ensemble has genuine disagreement to reconcile:
//!
//! - [`LexiconEngine`]: gazetteer lookup of scene vocabulary
//! - [`PatternEngine`]: contextual cue phrases via regex
//! - [`ProseEngine`]: sentence-level cue density
//!
//! Each one is a black box behind the [`ExtractionEngine`] port; the
//! coordinator only ever sees ids, weights and candidate spans.

pub mod lexicon;
pub mod pattern;
pub mod prose;

pub use lexicon::LexiconEngine;
pub use pattern::PatternEngine;
pub use prose::ProseEngine;

use crate::config::FileConfig;
use std::sync::Arc;
use vignette_application::{EngineRegistry, ExtractionEngine, RegistryError};
use vignette_domain::ExtractorConfig;

/// Default weights reflecting observed precision of each engine
const BUILTIN_ENGINES: [(&str, f64); 3] = [
    (lexicon::ENGINE_ID, 1.0),
    (pattern::ENGINE_ID, 1.2),
    (prose::ENGINE_ID, 0.8),
];

/// Build a registry with the built-in engines, applying any per-engine
/// overrides from the config file.
pub fn build_registry(config: &FileConfig) -> Result<EngineRegistry, RegistryError> {
    let registry = EngineRegistry::new();

    for (id, default_weight) in BUILTIN_ENGINES {
        let engine: Arc<dyn ExtractionEngine> = match id {
            lexicon::ENGINE_ID => Arc::new(LexiconEngine::new()),
            pattern::ENGINE_ID => Arc::new(PatternEngine::new()),
            _ => Arc::new(ProseEngine::new()),
        };

        let overrides = config.engines.get(id);
        let mut engine_config = ExtractorConfig::new(id)
            .with_weight(overrides.and_then(|o| o.weight).unwrap_or(default_weight))?;
        if let Some(threshold) = overrides.and_then(|o| o.confidence_threshold) {
            engine_config = engine_config.with_confidence_threshold(threshold)?;
        }
        if let Some(enabled) = overrides.and_then(|o| o.enabled) {
            engine_config = engine_config.with_enabled(enabled);
        }

        registry.register(engine, engine_config)?;
    }

    Ok(registry)
}
