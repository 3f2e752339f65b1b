//! Sentence boundary port
//!
//! Context enrichment needs sentence boundaries, which come from an
//! external collaborator. The port is synchronous: segmentation is pure
//! string work with no I/O.

use std::ops::Range;

/// Splits chapter text into sentence ranges.
///
/// Ranges must be non-overlapping, in ascending order, and lie on
/// character boundaries of the input.
pub trait SentenceSegmenter: Send + Sync {
    fn sentence_ranges(&self, text: &str) -> Vec<Range<usize>>;
}

/// Trivial segmenter treating the whole text as one sentence.
///
/// Useful in tests and as a degraded fallback; real deployments use the
/// rule-based segmenter from the infrastructure layer.
pub struct WholeTextSegmenter;

impl SentenceSegmenter for WholeTextSegmenter {
    fn sentence_ranges(&self, text: &str) -> Vec<Range<usize>> {
        if text.is_empty() {
            Vec::new()
        } else {
            vec![0..text.len()]
        }
    }
}
