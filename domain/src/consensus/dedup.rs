//! Post-consensus deduplication
//!
//! Voting (or the union modes) can still leave two near-identical
//! descriptions of the same kind, e.g. when two clusters settle on
//! almost the same region. This pass merges them, keeping the more
//! confident record and unioning contributor sets.

use crate::consensus::overlap::overlap_ratio;
use crate::describe::description::Description;

/// Merges same-kind descriptions whose spans overlap almost entirely.
///
/// O(n²) over the descriptions of one chapter, which is tens of records
/// at most. Idempotent: the survivors are pairwise below the threshold,
/// so a second run is a no-op.
///
/// # Example
///
/// ```
/// use vignette_domain::{Deduplicator, Description, SpanKind};
///
/// let a = Description::new(0, 20, "the fog-bound moor", SpanKind::Location, 0.9, ["alpha"]).unwrap();
/// let b = Description::new(0, 19, "the fog-bound moo", SpanKind::Location, 0.7, ["beta"]).unwrap();
///
/// let merged = Deduplicator::default().merge(vec![a, b]);
/// assert_eq!(merged.len(), 1);
/// assert_eq!(merged[0].confidence, 0.9);
/// assert_eq!(merged[0].contributors.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Deduplicator {
    threshold: f64,
}

impl Default for Deduplicator {
    fn default() -> Self {
        Self { threshold: 0.9 }
    }
}

impl Deduplicator {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Merge near-duplicates, returning survivors ordered by offset.
    ///
    /// Candidates are considered in confidence order so the keeper of
    /// each duplicate group is always the most confident record; ties
    /// break by offset for determinism.
    pub fn merge(&self, descriptions: Vec<Description>) -> Vec<Description> {
        let mut ordered = descriptions;
        ordered.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| (a.start, a.end).cmp(&(b.start, b.end)))
        });

        let mut kept: Vec<Description> = Vec::with_capacity(ordered.len());
        for candidate in ordered {
            let duplicate_of = kept.iter().position(|existing| {
                existing.kind == candidate.kind
                    && overlap_ratio(&existing.range(), &candidate.range()) > self.threshold
            });
            match duplicate_of {
                Some(i) => kept[i] = kept[i].absorb(&candidate),
                None => kept.push(candidate),
            }
        }

        kept.sort_by(|a, b| (a.start, a.end).cmp(&(b.start, b.end)));
        kept
    }
}
