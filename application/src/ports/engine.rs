//! Extraction engine port
//!
//! Defines the interface the coordinator uses to talk to the individual
//! text-extraction engines. Engines are black boxes behind this trait:
//! the application layer never inspects what kind of engine produced a
//! span, only its id, weight and output.

use async_trait::async_trait;
use thiserror::Error;
use vignette_domain::{CandidateSpan, ExtractorId};

/// Errors an engine can surface to the coordinator.
///
/// None of these fail a request on their own; the coordinator drops the
/// failing engine's results and proceeds with whatever the others
/// produced.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("engine unavailable: {0}")]
    Unavailable(String),

    #[error("extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("extraction timed out")]
    Timeout,
}

/// One text-extraction engine.
///
/// Implementations must be stateless during `extract` (or treat their
/// state as read-only): the coordinator may call them concurrently from
/// several in-flight requests.
#[async_trait]
pub trait ExtractionEngine: Send + Sync {
    /// Stable identifier, used as the registry key and for provenance
    fn id(&self) -> ExtractorId;

    /// Initialize the underlying engine (load lexicons, compile
    /// patterns, warm caches). Called once by the registry before the
    /// engine enters any snapshot.
    async fn load(&self) -> Result<(), EngineError> {
        Ok(())
    }

    /// Propose candidate spans over the chapter text.
    async fn extract(&self, text: &str) -> Result<Vec<CandidateSpan>, EngineError>;

    /// Sequential-mode variant: the accumulated result set from
    /// higher-weight engines is passed as context so this engine can
    /// supplement rather than duplicate.
    ///
    /// Default implementation ignores the prior spans and calls
    /// `extract`, so engines without supplement logic work unchanged.
    async fn extract_with_prior(
        &self,
        text: &str,
        _prior: &[CandidateSpan],
    ) -> Result<Vec<CandidateSpan>, EngineError> {
        self.extract(text).await
    }
}
