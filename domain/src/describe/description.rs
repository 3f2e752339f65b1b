//! Reconciled description records

use crate::core::error::DomainError;
use crate::describe::kind::SpanKind;
use crate::describe::span::{CandidateSpan, ExtractorId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::Range;

/// The final, reconciled output record for one visual description.
///
/// Produced from one voting cluster (or a single pass-through span in
/// modes that skip voting). Immutable once constructed; the deduplicator
/// builds replacement records rather than mutating in place.
///
/// Invariants: `contributors` is non-empty, `confidence ∈ [0.0, 1.0]`.
///
/// # Example
///
/// ```
/// use vignette_domain::{Description, SpanKind};
///
/// let desc = Description::new(4, 14, "old castle", SpanKind::Location, 0.8, ["lexicon"]).unwrap();
/// assert_eq!(desc.contributors.len(), 1);
/// assert!(desc.priority_score > 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Description {
    /// Start byte offset of the merged span
    pub start: usize,
    /// End byte offset of the merged span
    pub end: usize,
    /// The covered substring
    pub text: String,
    /// Category decided by the vote (or carried through unvoted)
    pub kind: SpanKind,
    /// Weighted aggregate confidence in `[0.0, 1.0]`
    pub confidence: f64,
    /// Engines whose proposals agreed on this description
    pub contributors: BTreeSet<ExtractorId>,
    /// Surrounding-sentence snippet, if enrichment found one
    pub context: Option<String>,
    /// Derived rank for downstream generation ordering
    pub priority_score: f64,
}

impl Description {
    /// Create a description.
    ///
    /// Confidence is clamped to `[0.0, 1.0]`; `priority_score` is
    /// derived from the kind's base weight and the confidence.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NoContributors` when `contributors` is empty.
    pub fn new<I, T>(
        start: usize,
        end: usize,
        text: impl Into<String>,
        kind: SpanKind,
        confidence: f64,
        contributors: I,
    ) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = T>,
        T: Into<ExtractorId>,
    {
        let contributors: BTreeSet<ExtractorId> =
            contributors.into_iter().map(Into::into).collect();
        if contributors.is_empty() {
            return Err(DomainError::NoContributors);
        }

        let confidence = confidence.clamp(0.0, 1.0);
        Ok(Self {
            start,
            end,
            text: text.into(),
            kind,
            confidence,
            contributors,
            context: None,
            priority_score: kind.priority_weight() * confidence,
        })
    }

    /// Build a pass-through description from a single candidate span.
    ///
    /// Used by modes that skip voting: the span's own confidence is
    /// kept and its engine is the sole contributor.
    pub fn from_span(span: &CandidateSpan) -> Self {
        Self {
            start: span.start,
            end: span.end,
            text: span.text.clone(),
            kind: span.kind,
            confidence: span.confidence,
            contributors: BTreeSet::from([span.extractor.clone()]),
            context: None,
            priority_score: span.kind.priority_weight() * span.confidence,
        }
    }

    /// Attach the enrichment snippet
    pub fn with_context(mut self, context: Option<String>) -> Self {
        self.context = context;
        self
    }

    /// Build a new record that keeps this description's span and
    /// confidence but absorbs the other's contributor set.
    ///
    /// Used by the deduplicator when merging near-duplicates.
    pub fn absorb(&self, other: &Description) -> Self {
        let mut merged = self.clone();
        merged
            .contributors
            .extend(other.contributors.iter().cloned());
        merged
    }

    /// The description's byte range
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}
