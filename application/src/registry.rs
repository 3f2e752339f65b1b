//! Engine registry
//!
//! Owns the set of extraction engines, their load/availability state,
//! and the admin-tunable configuration. This is the only shared mutable
//! state in the system: reads take an immutable [`RegistrySnapshot`],
//! writes are serialized under a single lock, and a config write never
//! affects a request already in flight.
//!
//! # Lock Behavior
//!
//! Methods that acquire the internal lock panic if it is poisoned.
//! Poisoning means another thread panicked while mutating registry
//! state; continuing with possibly half-applied config could silently
//! change voting outcomes.

use crate::ports::engine::ExtractionEngine;
use futures::future::join_all;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};
use vignette_domain::{ConfigUpdate, ConfigValidationError, ExtractorConfig, ExtractorId};

/// Errors surfaced at the registry boundary
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("engine already registered: {0}")]
    DuplicateEngine(ExtractorId),

    #[error("unknown engine: {0}")]
    UnknownEngine(ExtractorId),

    #[error("engine id {engine} does not match config id {config}")]
    IdMismatch {
        engine: ExtractorId,
        config: ExtractorId,
    },

    #[error(transparent)]
    InvalidConfig(#[from] ConfigValidationError),
}

struct EngineEntry {
    engine: Arc<dyn ExtractionEngine>,
    config: ExtractorConfig,
    loaded: bool,
    available: bool,
    last_error: Option<String>,
}

/// Registry of extraction engines with synchronized config mutation.
///
/// # Example
///
/// ```no_run
/// use vignette_application::EngineRegistry;
/// use vignette_domain::ConfigUpdate;
///
/// # fn demo(registry: EngineRegistry) -> Result<(), vignette_application::RegistryError> {
/// let snapshot = registry.snapshot();
/// registry.update_config(&"pattern".into(), ConfigUpdate::new().weight(1.5))?;
/// // `snapshot` still sees the old weight; only later requests see 1.5
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct EngineRegistry {
    entries: RwLock<BTreeMap<ExtractorId, EngineEntry>>,
}

impl EngineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an engine under its config's id.
    ///
    /// The engine is not available until [`load`](Self::load) succeeds.
    pub fn register(
        &self,
        engine: Arc<dyn ExtractionEngine>,
        config: ExtractorConfig,
    ) -> Result<(), RegistryError> {
        config.validate()?;
        if engine.id() != config.id {
            return Err(RegistryError::IdMismatch {
                engine: engine.id(),
                config: config.id,
            });
        }

        let mut entries = self.entries.write().expect("registry lock poisoned");
        if entries.contains_key(&config.id) {
            return Err(RegistryError::DuplicateEngine(config.id));
        }

        debug!("Registered engine {}", config.id);
        entries.insert(
            config.id.clone(),
            EngineEntry {
                engine,
                config,
                loaded: false,
                available: false,
                last_error: None,
            },
        );
        Ok(())
    }

    /// Attempt to initialize one engine.
    ///
    /// Load failure is recorded, not raised: the engine simply stays
    /// out of every snapshot until a later load succeeds. Returns
    /// whether the engine is now available.
    pub async fn load(&self, id: &ExtractorId) -> Result<bool, RegistryError> {
        let engine = {
            let entries = self.entries.read().expect("registry lock poisoned");
            let entry = entries
                .get(id)
                .ok_or_else(|| RegistryError::UnknownEngine(id.clone()))?;
            Arc::clone(&entry.engine)
        };

        let outcome = engine.load().await;

        let mut entries = self.entries.write().expect("registry lock poisoned");
        let entry = entries
            .get_mut(id)
            .ok_or_else(|| RegistryError::UnknownEngine(id.clone()))?;
        match outcome {
            Ok(()) => {
                info!("Engine {} loaded", id);
                entry.loaded = true;
                entry.available = true;
                entry.last_error = None;
                Ok(true)
            }
            Err(e) => {
                warn!("Engine {} failed to load: {}", id, e);
                entry.loaded = false;
                entry.available = false;
                entry.last_error = Some(e.to_string());
                Ok(false)
            }
        }
    }

    /// Load every registered engine, concurrently. Returns the number
    /// of engines that came up available.
    pub async fn load_all(&self) -> usize {
        let ids: Vec<ExtractorId> = {
            let entries = self.entries.read().expect("registry lock poisoned");
            entries.keys().cloned().collect()
        };

        let results = join_all(ids.iter().map(|id| self.load(id))).await;
        results
            .into_iter()
            .filter(|r| matches!(r, Ok(true)))
            .count()
    }

    /// Immutable view of the engines usable right now: enabled and
    /// available, ordered by descending weight with ascending id as the
    /// tie-break. Taken once at request start; later config writes do
    /// not touch it.
    pub fn snapshot(&self) -> RegistrySnapshot {
        let entries = self.entries.read().expect("registry lock poisoned");
        let mut selected: Vec<SnapshotEntry> = entries
            .values()
            .filter(|e| e.config.enabled && e.available)
            .map(|e| SnapshotEntry {
                engine: Arc::clone(&e.engine),
                config: e.config.clone(),
            })
            .collect();

        selected.sort_by(|a, b| {
            b.config
                .weight
                .partial_cmp(&a.config.weight)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.config.id.cmp(&b.config.id))
        });

        RegistrySnapshot { entries: selected }
    }

    /// Apply a validated config update.
    ///
    /// Effective for requests starting after the write; a rejected
    /// update leaves the prior config unchanged. Returns the updated
    /// config.
    pub fn update_config(
        &self,
        id: &ExtractorId,
        update: ConfigUpdate,
    ) -> Result<ExtractorConfig, RegistryError> {
        let mut entries = self.entries.write().expect("registry lock poisoned");
        let entry = entries
            .get_mut(id)
            .ok_or_else(|| RegistryError::UnknownEngine(id.clone()))?;

        let updated = update.apply_to(&entry.config)?;
        info!(
            "Engine {} config updated: weight {}, threshold {}, enabled {}",
            id, updated.weight, updated.confidence_threshold, updated.enabled
        );
        entry.config = updated.clone();
        Ok(updated)
    }

    /// Read-only status of every registered engine, for admin tooling.
    pub fn status(&self) -> Vec<EngineStatus> {
        let entries = self.entries.read().expect("registry lock poisoned");
        entries
            .values()
            .map(|e| EngineStatus {
                id: e.config.id.clone(),
                loaded: e.loaded,
                available: e.available,
                enabled: e.config.enabled,
                weight: e.config.weight,
                confidence_threshold: e.config.confidence_threshold,
                last_error: e.last_error.clone(),
            })
            .collect()
    }

    /// Number of registered engines (regardless of availability)
    pub fn len(&self) -> usize {
        self.entries.read().expect("registry lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One engine in a snapshot, with the config fixed for the request
#[derive(Clone)]
pub struct SnapshotEntry {
    pub engine: Arc<dyn ExtractionEngine>,
    pub config: ExtractorConfig,
}

/// Point-in-time view of the usable engines for one request
#[derive(Clone, Default)]
pub struct RegistrySnapshot {
    entries: Vec<SnapshotEntry>,
}

impl RegistrySnapshot {
    pub fn entries(&self) -> &[SnapshotEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest-weight engine, the one Single mode uses
    pub fn top(&self) -> Option<&SnapshotEntry> {
        self.entries.first()
    }

    /// Weight table for consensus voting
    pub fn weights(&self) -> BTreeMap<ExtractorId, f64> {
        self.entries
            .iter()
            .map(|e| (e.config.id.clone(), e.config.weight))
            .collect()
    }
}

/// Observability view of one engine's state
#[derive(Debug, Clone, Serialize)]
pub struct EngineStatus {
    pub id: ExtractorId,
    pub loaded: bool,
    pub available: bool,
    pub enabled: bool,
    pub weight: f64,
    pub confidence_threshold: f64,
    pub last_error: Option<String>,
}
