//! Extract scenes use case
//!
//! The ensemble coordinator: takes one chapter text, invokes the active
//! engines according to the processing mode, reconciles their candidate
//! spans, and returns the final ordered description list.
//!
//! Failure semantics: an engine that errors or times out is excluded
//! from this request and logged; the request itself fails only when no
//! engine produced a result at all. A degraded-but-non-empty result
//! always beats failing the whole chapter.

use crate::config::ExtractionParams;
use crate::ports::engine::{EngineError, ExtractionEngine};
use crate::ports::progress::{ExtractionPhase, NoProgress, ProgressNotifier};
use crate::ports::segmenter::SentenceSegmenter;
use crate::registry::{EngineRegistry, RegistrySnapshot, SnapshotEntry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use vignette_domain::{
    CandidateSpan, ConsensusVoter, Deduplicator, Description, ExtractorId, ProcessingMode,
    enrich, overlap_ratio,
};

/// Errors that can fail a whole extraction request
#[derive(Error, Debug)]
pub enum ExtractScenesError {
    #[error("chapter text is empty or whitespace-only")]
    EmptyText,

    #[error("no extraction engines available")]
    NoEnginesAvailable,

    #[error("request cancelled")]
    Cancelled,
}

impl ExtractScenesError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ExtractScenesError::Cancelled)
    }
}

/// Input for one extraction request
#[derive(Debug, Clone)]
pub struct ExtractScenesInput {
    /// Chapter plaintext, already parsed out of the book file
    pub text: String,
    /// How engines are invoked; `Adaptive` delegates to the selector
    pub mode: ProcessingMode,
    /// Per-request tuning overrides
    pub params: ExtractionParams,
    /// Request-level cancellation handle
    pub cancel: CancellationToken,
}

impl ExtractScenesInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mode: ProcessingMode::default(),
            params: ExtractionParams::default(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_mode(mut self, mode: ProcessingMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_params(mut self, params: ExtractionParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

/// Result of one extraction request.
///
/// `descriptions` is ordered by priority score, descending. A caller
/// judging degraded quality can inspect `failed` or the per-description
/// contributor counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneReport {
    /// The mode the caller asked for
    pub requested_mode: ProcessingMode,
    /// The mode actually executed (differs under `Adaptive`)
    pub mode_used: ProcessingMode,
    /// Engines that returned a result in time
    pub responded: Vec<ExtractorId>,
    /// Engines that errored or timed out
    pub failed: Vec<ExtractorId>,
    /// Final reconciled descriptions
    pub descriptions: Vec<Description>,
}

impl SceneReport {
    /// Whether any engine dropped out of this request
    pub fn is_degraded(&self) -> bool {
        !self.failed.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.descriptions.len()
    }
}

/// Outcome of the engine-invocation half of a request, before the
/// shared reconciliation tail runs.
struct RoundOutcome {
    descriptions: Vec<Description>,
    responded: Vec<ExtractorId>,
    failed: Vec<ExtractorId>,
}

/// Use case for extracting visual descriptions from one chapter
pub struct ExtractScenesUseCase<S: SentenceSegmenter> {
    registry: Arc<EngineRegistry>,
    segmenter: Arc<S>,
}

impl<S: SentenceSegmenter + 'static> ExtractScenesUseCase<S> {
    pub fn new(registry: Arc<EngineRegistry>, segmenter: Arc<S>) -> Self {
        Self {
            registry,
            segmenter,
        }
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: ExtractScenesInput,
    ) -> Result<SceneReport, ExtractScenesError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: ExtractScenesInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<SceneReport, ExtractScenesError> {
        if input.text.trim().is_empty() {
            return Err(ExtractScenesError::EmptyText);
        }
        if input.cancel.is_cancelled() {
            return Err(ExtractScenesError::Cancelled);
        }

        // One snapshot per request: weights, thresholds, and ordering
        // stay fixed even if an admin reconfigures engines mid-flight.
        let snapshot = self.registry.snapshot();
        if snapshot.is_empty() {
            return Err(ExtractScenesError::NoEnginesAvailable);
        }

        let deadline = input.params.request_deadline.map(|d| Instant::now() + d);
        let requested_mode = input.mode;
        let mode_used = self.resolve_mode(&input, &snapshot);

        info!(
            "Extracting from {} chars with {} engines in {} mode",
            input.text.len(),
            snapshot.len(),
            mode_used
        );

        let text: Arc<str> = Arc::from(input.text.as_str());
        let mut round = match mode_used {
            ProcessingMode::Single => {
                self.run_single(&text, &snapshot, deadline, &input, progress)
                    .await?
            }
            ProcessingMode::Parallel => {
                self.run_parallel(&text, &snapshot, deadline, &input, progress)
                    .await?
            }
            ProcessingMode::Sequential => {
                self.run_sequential(&text, &snapshot, deadline, &input, progress)
                    .await?
            }
            ProcessingMode::Ensemble => {
                self.run_ensemble(&text, &snapshot, deadline, &input, progress)
                    .await?
            }
            // resolve_mode never returns Adaptive
            ProcessingMode::Adaptive => unreachable!("adaptive mode resolves before dispatch"),
        };

        if round.responded.is_empty() {
            warn!("Every engine failed for this request");
            return Err(ExtractScenesError::NoEnginesAvailable);
        }

        // Reconciliation tail shared by all modes
        progress.on_phase_start(&ExtractionPhase::Reconcile, 1);
        let dedup = Deduplicator::new(input.params.dedup_threshold);
        let descriptions = dedup.merge(round.descriptions);
        progress.on_phase_complete(&ExtractionPhase::Reconcile);

        progress.on_phase_start(&ExtractionPhase::Enrich, descriptions.len());
        let sentences = self.segmenter.sentence_ranges(&input.text);
        let mut descriptions: Vec<Description> = descriptions
            .into_iter()
            .map(|d| {
                let context = enrich::context_snippet(&input.text, &sentences, &d.range());
                d.with_context(context)
            })
            .collect();
        progress.on_phase_complete(&ExtractionPhase::Enrich);

        descriptions.sort_by(|a, b| {
            b.priority_score
                .partial_cmp(&a.priority_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| (a.start, a.end).cmp(&(b.start, b.end)))
        });

        round.responded.sort();
        round.failed.sort();

        info!(
            "Extraction complete: {} descriptions from {} engines ({} failed)",
            descriptions.len(),
            round.responded.len(),
            round.failed.len()
        );

        Ok(SceneReport {
            requested_mode,
            mode_used,
            responded: round.responded,
            failed: round.failed,
            descriptions,
        })
    }

    /// Resolve `Adaptive` into a concrete mode; other modes pass through.
    fn resolve_mode(
        &self,
        input: &ExtractScenesInput,
        snapshot: &RegistrySnapshot,
    ) -> ProcessingMode {
        match input.mode {
            ProcessingMode::Adaptive => {
                let chosen = input.params.selector().select(
                    &input.text,
                    input.params.request_deadline,
                    snapshot.len(),
                );
                debug!("Adaptive selector chose {} mode", chosen);
                chosen
            }
            other => other,
        }
    }

    /// SINGLE: the highest-weight engine only, spans pass through
    /// unvoted with the engine's own confidence.
    async fn run_single(
        &self,
        text: &Arc<str>,
        snapshot: &RegistrySnapshot,
        deadline: Option<Instant>,
        input: &ExtractScenesInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<RoundOutcome, ExtractScenesError> {
        let top = &snapshot.entries()[..1];
        let (spans, responded, failed) = self
            .fan_out(text, top, deadline, input, progress)
            .await?;

        Ok(RoundOutcome {
            descriptions: spans.iter().map(Description::from_span).collect(),
            responded,
            failed,
        })
    }

    /// PARALLEL: all engines concurrently, plain union of everything
    /// above threshold. Duplicates are possible by design; the caller
    /// chose coverage over precision.
    async fn run_parallel(
        &self,
        text: &Arc<str>,
        snapshot: &RegistrySnapshot,
        deadline: Option<Instant>,
        input: &ExtractScenesInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<RoundOutcome, ExtractScenesError> {
        let (spans, responded, failed) = self
            .fan_out(text, snapshot.entries(), deadline, input, progress)
            .await?;

        Ok(RoundOutcome {
            descriptions: spans.iter().map(Description::from_span).collect(),
            responded,
            failed,
        })
    }

    /// ENSEMBLE: all engines concurrently, reconciled by the weighted
    /// consensus vote.
    async fn run_ensemble(
        &self,
        text: &Arc<str>,
        snapshot: &RegistrySnapshot,
        deadline: Option<Instant>,
        input: &ExtractScenesInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<RoundOutcome, ExtractScenesError> {
        let (spans, responded, failed) = self
            .fan_out(text, snapshot.entries(), deadline, input, progress)
            .await?;

        let voter = ConsensusVoter::new(input.params.voter_config());
        let descriptions = voter.vote(&spans, &snapshot.weights());
        debug!(
            "Consensus accepted {} descriptions from {} spans",
            descriptions.len(),
            spans.len()
        );

        Ok(RoundOutcome {
            descriptions,
            responded,
            failed,
        })
    }

    /// SEQUENTIAL: engines run one at a time in weight order; each sees
    /// the accumulated result set, and a new span overlapping an
    /// accepted one beyond the threshold is dropped. Later engines
    /// supplement, they do not re-litigate.
    async fn run_sequential(
        &self,
        text: &Arc<str>,
        snapshot: &RegistrySnapshot,
        deadline: Option<Instant>,
        input: &ExtractScenesInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<RoundOutcome, ExtractScenesError> {
        let entries = snapshot.entries();
        progress.on_phase_start(&ExtractionPhase::Extract, entries.len());

        let mut accepted: Vec<CandidateSpan> = Vec::new();
        let mut responded = Vec::new();
        let mut failed = Vec::new();

        for entry in entries {
            let id = entry.config.id.clone();
            let call_timeout = per_call_timeout(deadline, input.params.engine_timeout);

            let outcome = tokio::select! {
                _ = input.cancel.cancelled() => return Err(ExtractScenesError::Cancelled),
                r = tokio::time::timeout(
                    call_timeout,
                    entry.engine.extract_with_prior(text, &accepted),
                ) => r.unwrap_or(Err(EngineError::Timeout)),
            };

            match outcome {
                Ok(spans) => {
                    progress.on_engine_complete(&ExtractionPhase::Extract, &id, true);
                    responded.push(id);
                    let threshold = entry.config.confidence_threshold;
                    for span in spans {
                        if span.confidence < threshold {
                            continue;
                        }
                        let duplicates_accepted = accepted.iter().any(|a| {
                            overlap_ratio(&a.range(), &span.range())
                                > input.params.overlap_threshold
                        });
                        if !duplicates_accepted {
                            accepted.push(span);
                        }
                    }
                }
                Err(e) => {
                    warn!("Engine {} dropped from request: {}", id, e);
                    progress.on_engine_complete(&ExtractionPhase::Extract, &id, false);
                    failed.push(id);
                }
            }
        }

        progress.on_phase_complete(&ExtractionPhase::Extract);
        Ok(RoundOutcome {
            descriptions: accepted.iter().map(Description::from_span).collect(),
            responded,
            failed,
        })
    }

    /// Invoke a set of engines concurrently with per-call timeouts and
    /// collect their threshold-filtered spans.
    ///
    /// The per-call timeout is bounded by the remaining request
    /// deadline, so a slow engine can neither block the request nor
    /// invalidate results that already arrived.
    async fn fan_out(
        &self,
        text: &Arc<str>,
        entries: &[SnapshotEntry],
        deadline: Option<Instant>,
        input: &ExtractScenesInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<(Vec<CandidateSpan>, Vec<ExtractorId>, Vec<ExtractorId>), ExtractScenesError>
    {
        progress.on_phase_start(&ExtractionPhase::Extract, entries.len());

        let thresholds: BTreeMap<ExtractorId, f64> = entries
            .iter()
            .map(|e| (e.config.id.clone(), e.config.confidence_threshold))
            .collect();

        let mut join_set = JoinSet::new();
        for entry in entries {
            let engine = Arc::clone(&entry.engine);
            let text = Arc::clone(text);
            let id = entry.config.id.clone();
            let call_timeout = per_call_timeout(deadline, input.params.engine_timeout);

            join_set.spawn(async move {
                let result = match tokio::time::timeout(call_timeout, engine.extract(&text)).await
                {
                    Ok(r) => r,
                    Err(_) => Err(EngineError::Timeout),
                };
                (id, result)
            });
        }

        let mut spans = Vec::new();
        let mut responded = Vec::new();
        let mut failed = Vec::new();

        loop {
            let joined = tokio::select! {
                _ = input.cancel.cancelled() => {
                    join_set.abort_all();
                    return Err(ExtractScenesError::Cancelled);
                }
                joined = join_set.join_next() => joined,
            };

            match joined {
                None => break,
                Some(Ok((id, Ok(engine_spans)))) => {
                    debug!("Engine {} proposed {} spans", id, engine_spans.len());
                    progress.on_engine_complete(&ExtractionPhase::Extract, &id, true);
                    let threshold = thresholds.get(&id).copied().unwrap_or(0.0);
                    spans.extend(
                        engine_spans
                            .into_iter()
                            .filter(|s| s.confidence >= threshold),
                    );
                    responded.push(id);
                }
                Some(Ok((id, Err(e)))) => {
                    warn!("Engine {} dropped from request: {}", id, e);
                    progress.on_engine_complete(&ExtractionPhase::Extract, &id, false);
                    failed.push(id);
                }
                Some(Err(e)) => {
                    warn!("Task join error: {}", e);
                }
            }
        }

        progress.on_phase_complete(&ExtractionPhase::Extract);

        // Completion order is nondeterministic; restore a stable order
        // before anything downstream consumes the union directly.
        spans.sort_by(|a, b| {
            (a.start, a.end, &a.extractor, a.kind.vote_priority())
                .cmp(&(b.start, b.end, &b.extractor, b.kind.vote_priority()))
        });

        Ok((spans, responded, failed))
    }
}

/// Per-call timeout bounded by the remaining request deadline.
fn per_call_timeout(deadline: Option<Instant>, engine_timeout: Duration) -> Duration {
    match deadline {
        Some(d) => engine_timeout.min(d.saturating_duration_since(Instant::now())),
        None => engine_timeout,
    }
}
