//! Progress notification port
//!
//! Lets a front-end surface per-engine progress without coupling the
//! use case to any terminal or UI concern.

use std::fmt;
use vignette_domain::ExtractorId;

/// Phases of one extraction request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionPhase {
    /// Engines proposing candidate spans
    Extract,
    /// Voting, deduplication
    Reconcile,
    /// Attaching sentence context
    Enrich,
}

impl fmt::Display for ExtractionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionPhase::Extract => write!(f, "extract"),
            ExtractionPhase::Reconcile => write!(f, "reconcile"),
            ExtractionPhase::Enrich => write!(f, "enrich"),
        }
    }
}

/// Callback for progress updates during extraction
pub trait ProgressNotifier: Send + Sync {
    /// Called when a phase starts
    fn on_phase_start(&self, phase: &ExtractionPhase, total_tasks: usize);

    /// Called when an engine finishes (or fails) within a phase
    fn on_engine_complete(&self, phase: &ExtractionPhase, engine: &ExtractorId, success: bool);

    /// Called when a phase completes
    fn on_phase_complete(&self, phase: &ExtractionPhase);
}

/// No-op progress notifier
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_phase_start(&self, _phase: &ExtractionPhase, _total_tasks: usize) {}
    fn on_engine_complete(&self, _phase: &ExtractionPhase, _engine: &ExtractorId, _success: bool) {}
    fn on_phase_complete(&self, _phase: &ExtractionPhase) {}
}
