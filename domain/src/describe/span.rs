//! Candidate spans proposed by extraction engines

use crate::core::error::DomainError;
use crate::describe::kind::SpanKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Unique identifier for an extraction engine.
///
/// Used for provenance on candidate spans and as the weighting key
/// during consensus voting.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractorId(String);

impl ExtractorId {
    /// Create a new extractor ID from a string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ExtractorId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ExtractorId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for ExtractorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single engine's proposed description span, before reconciliation.
///
/// Offsets are byte offsets into the source chapter text, aligned to
/// character boundaries; `text` always equals `source[start..end]`.
/// Candidate spans live for one coordinator invocation and are never
/// persisted.
///
/// # Example
///
/// ```
/// use vignette_domain::{CandidateSpan, SpanKind};
///
/// let source = "The old castle loomed over the valley.";
/// let span = CandidateSpan::new(source, 4, 14, SpanKind::Location, 0.8, "lexicon").unwrap();
/// assert_eq!(span.text, "old castle");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSpan {
    /// Start byte offset into the source text (inclusive)
    pub start: usize,
    /// End byte offset into the source text (exclusive)
    pub end: usize,
    /// The covered substring
    pub text: String,
    /// Category of the proposed description
    pub kind: SpanKind,
    /// Self-reported confidence in `[0.0, 1.0]`
    pub confidence: f64,
    /// Engine that proposed this span
    pub extractor: ExtractorId,
}

impl CandidateSpan {
    /// Create a span over `source[start..end]`.
    ///
    /// Confidence is clamped to `[0.0, 1.0]`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSpan` when the offsets are empty,
    /// out of bounds, or not on character boundaries.
    pub fn new(
        source: &str,
        start: usize,
        end: usize,
        kind: SpanKind,
        confidence: f64,
        extractor: impl Into<ExtractorId>,
    ) -> Result<Self, DomainError> {
        if start >= end
            || end > source.len()
            || !source.is_char_boundary(start)
            || !source.is_char_boundary(end)
        {
            return Err(DomainError::InvalidSpan {
                start,
                end,
                len: source.len(),
            });
        }

        Ok(Self {
            start,
            end,
            text: source[start..end].to_string(),
            kind,
            confidence: confidence.clamp(0.0, 1.0),
            extractor: extractor.into(),
        })
    }

    /// The span's byte range
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Length of the span in bytes
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Spans are never empty by construction
    pub fn is_empty(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "The old castle loomed over the valley.";

    #[test]
    fn test_new_takes_text_from_source() {
        let span = CandidateSpan::new(SOURCE, 8, 14, SpanKind::Location, 0.9, "lexicon").unwrap();
        assert_eq!(span.text, "castle");
        assert_eq!(span.range(), 8..14);
        assert_eq!(span.len(), 6);
    }

    #[test]
    fn test_rejects_empty_range() {
        let result = CandidateSpan::new(SOURCE, 4, 4, SpanKind::Location, 0.9, "lexicon");
        assert_eq!(
            result,
            Err(DomainError::InvalidSpan {
                start: 4,
                end: 4,
                len: SOURCE.len()
            })
        );
    }

    #[test]
    fn test_rejects_out_of_bounds() {
        let result = CandidateSpan::new(SOURCE, 4, 999, SpanKind::Location, 0.9, "lexicon");
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_misaligned_boundary() {
        // "é" is two bytes; offset 2 falls inside it
        let source = "aébc";
        let result = CandidateSpan::new(source, 0, 2, SpanKind::Object, 0.5, "lexicon");
        assert!(result.is_err());
    }

    #[test]
    fn test_confidence_clamped() {
        let span = CandidateSpan::new(SOURCE, 0, 3, SpanKind::Object, 1.7, "lexicon").unwrap();
        assert_eq!(span.confidence, 1.0);

        let span = CandidateSpan::new(SOURCE, 0, 3, SpanKind::Object, -0.2, "lexicon").unwrap();
        assert_eq!(span.confidence, 0.0);
    }

    #[test]
    fn test_extractor_id_from_str() {
        let id: ExtractorId = "pattern".into();
        assert_eq!(id.as_str(), "pattern");
        assert_eq!(id.to_string(), "pattern");
    }
}
