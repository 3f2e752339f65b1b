//! Weighted consensus voting
//!
//! Given all candidate spans of one coordinator invocation (with the
//! engine weights fixed by that invocation's snapshot), the voter
//! clusters overlapping spans, runs a weighted type vote per cluster,
//! and emits a [`Description`] for every cluster whose agreement ratio
//! clears the consensus threshold.
//!
//! Rejected clusters are dropped without error; the voter trades recall
//! for precision relative to the plain union of engine outputs.

use crate::consensus::cluster::cluster_indices;
use crate::describe::description::Description;
use crate::describe::kind::SpanKind;
use crate::describe::span::{CandidateSpan, ExtractorId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Tolerance for the acceptance comparison, so a cluster whose score
/// lands exactly on the threshold is accepted despite float rounding.
const SCORE_EPSILON: f64 = 1e-9;

/// Thresholds governing clustering and acceptance.
///
/// Both values are tunable per deployment; the defaults reproduce the
/// reference behavior (IoU ≥ 0.5 clusters, 60% agreeing weight accepts).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoterConfig {
    /// Minimum pairwise IoU for two spans to share a cluster
    pub overlap_threshold: f64,
    /// Minimum fraction of cluster weight that must agree on one kind
    pub consensus_threshold: f64,
}

impl Default for VoterConfig {
    fn default() -> Self {
        Self {
            overlap_threshold: 0.5,
            consensus_threshold: 0.6,
        }
    }
}

impl VoterConfig {
    pub fn with_overlap_threshold(mut self, threshold: f64) -> Self {
        self.overlap_threshold = threshold;
        self
    }

    pub fn with_consensus_threshold(mut self, threshold: f64) -> Self {
        self.consensus_threshold = threshold;
        self
    }
}

/// Pure weighted-majority voter over candidate spans.
///
/// Deterministic for a fixed span set and weight table: clustering
/// visits spans in sorted order, ties between kinds break by the fixed
/// kind priority, and ties between boundary candidates break by span
/// length, then offset, then engine id.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use vignette_domain::{CandidateSpan, ConsensusVoter, ExtractorId, SpanKind, VoterConfig};
///
/// let text = "A weathered knight rode in.";
/// let spans = vec![
///     CandidateSpan::new(text, 2, 18, SpanKind::Character, 0.8, "lexicon").unwrap(),
///     CandidateSpan::new(text, 2, 18, SpanKind::Character, 0.7, "pattern").unwrap(),
/// ];
/// let weights = BTreeMap::from([
///     (ExtractorId::new("lexicon"), 1.0),
///     (ExtractorId::new("pattern"), 1.2),
/// ]);
///
/// let voter = ConsensusVoter::new(VoterConfig::default());
/// let accepted = voter.vote(&spans, &weights);
/// assert_eq!(accepted.len(), 1);
/// assert_eq!(accepted[0].contributors.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConsensusVoter {
    config: VoterConfig,
}

impl ConsensusVoter {
    pub fn new(config: VoterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VoterConfig {
        &self.config
    }

    /// Reconcile candidate spans into accepted descriptions.
    ///
    /// Engines missing from `weights` count with weight `1.0`.
    /// Output is ordered by start offset.
    pub fn vote(
        &self,
        spans: &[CandidateSpan],
        weights: &BTreeMap<ExtractorId, f64>,
    ) -> Vec<Description> {
        let clusters = cluster_indices(spans, self.config.overlap_threshold);

        let mut accepted: Vec<Description> = clusters
            .iter()
            .filter_map(|cluster| self.decide_cluster(spans, cluster, weights))
            .collect();

        accepted.sort_by(|a, b| (a.start, a.end).cmp(&(b.start, b.end)));
        accepted
    }

    /// Run the type vote for one cluster and build its description if
    /// the consensus threshold is met.
    fn decide_cluster(
        &self,
        spans: &[CandidateSpan],
        cluster: &[usize],
        weights: &BTreeMap<ExtractorId, f64>,
    ) -> Option<Description> {
        // Which kinds each distinct engine proposed; an engine proposing
        // the same kind twice in one cluster still counts once.
        let mut proposals: BTreeMap<&ExtractorId, BTreeSet<SpanKind>> = BTreeMap::new();
        for &i in cluster {
            proposals
                .entry(&spans[i].extractor)
                .or_default()
                .insert(spans[i].kind);
        }

        let total_weight: f64 = proposals.keys().map(|id| engine_weight(weights, id)).sum();
        if total_weight <= 0.0 {
            return None;
        }

        // Majority kind by summed weight; kinds are visited in priority
        // order, so a strict comparison resolves ties toward the
        // higher-priority kind.
        let mut majority: Option<(SpanKind, f64)> = None;
        for kind in SpanKind::ALL {
            let kind_weight: f64 = proposals
                .iter()
                .filter(|(_, kinds)| kinds.contains(&kind))
                .map(|(id, _)| engine_weight(weights, id))
                .sum();
            if kind_weight > 0.0 && majority.is_none_or(|(_, best)| kind_weight > best) {
                majority = Some((kind, kind_weight));
            }
        }
        let (majority_kind, majority_weight) = majority?;

        let consensus_score = majority_weight / total_weight;
        if consensus_score + SCORE_EPSILON < self.config.consensus_threshold {
            return None;
        }

        let agreeing: Vec<&CandidateSpan> = cluster
            .iter()
            .map(|&i| &spans[i])
            .filter(|s| s.kind == majority_kind)
            .collect();

        let boundary = select_boundary(&agreeing, weights)?;
        let confidence = aggregate_confidence(&agreeing, weights);
        let contributors: BTreeSet<ExtractorId> =
            agreeing.iter().map(|s| s.extractor.clone()).collect();

        Description::new(
            boundary.start,
            boundary.end,
            boundary.text.clone(),
            majority_kind,
            confidence,
            contributors,
        )
        .ok()
    }
}

fn engine_weight(weights: &BTreeMap<ExtractorId, f64>, id: &ExtractorId) -> f64 {
    weights.get(id).copied().unwrap_or(1.0)
}

/// The accepted description keeps the span of the highest-weight
/// agreeing engine rather than a naive union, which drifts into
/// adjacent unrelated text. Ties go to the longer span, then to the
/// earlier offset and smaller engine id.
fn select_boundary<'a>(
    agreeing: &[&'a CandidateSpan],
    weights: &BTreeMap<ExtractorId, f64>,
) -> Option<&'a CandidateSpan> {
    agreeing.iter().copied().max_by(|a, b| {
        engine_weight(weights, &a.extractor)
            .partial_cmp(&engine_weight(weights, &b.extractor))
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.len().cmp(&b.len()))
            // max_by keeps the later of equal elements, so invert the
            // positional keys to prefer earlier start and smaller id
            .then_with(|| b.start.cmp(&a.start))
            .then_with(|| b.extractor.cmp(&a.extractor))
    })
}

/// Weighted mean of the agreeing spans' confidences, restricted to the
/// winning-kind contributors. An engine with several agreeing spans in
/// the cluster contributes its most confident one.
fn aggregate_confidence(agreeing: &[&CandidateSpan], weights: &BTreeMap<ExtractorId, f64>) -> f64 {
    let mut best_per_engine: BTreeMap<&ExtractorId, f64> = BTreeMap::new();
    for span in agreeing {
        let entry = best_per_engine.entry(&span.extractor).or_insert(0.0);
        if span.confidence > *entry {
            *entry = span.confidence;
        }
    }

    let mut weighted_sum = 0.0;
    let mut weight_sum = 0.0;
    for (id, confidence) in &best_per_engine {
        let w = engine_weight(weights, id);
        weighted_sum += w * confidence;
        weight_sum += w;
    }

    if weight_sum <= 0.0 {
        0.0
    } else {
        (weighted_sum / weight_sum).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str =
        "The weathered knight dismounted by the gate while fog rolled across the moor.";

    fn weights() -> BTreeMap<ExtractorId, f64> {
        BTreeMap::from([
            (ExtractorId::new("alpha"), 1.0),
            (ExtractorId::new("beta"), 1.2),
            (ExtractorId::new("gamma"), 0.8),
        ])
    }

    fn span(
        start: usize,
        end: usize,
        kind: SpanKind,
        confidence: f64,
        extractor: &str,
    ) -> CandidateSpan {
        CandidateSpan::new(SOURCE, start, end, kind, confidence, extractor).unwrap()
    }

    // ==========================================
    // Acceptance Scenarios
    // ==========================================

    #[test]
    fn test_two_agreeing_engines_accepted() {
        // alpha and beta propose overlapping CHARACTER spans; gamma is
        // silent. All proposers agree, so the score is 1.0.
        let spans = vec![
            span(4, 20, SpanKind::Character, 0.8, "alpha"),
            span(4, 20, SpanKind::Character, 0.6, "beta"),
        ];

        let voter = ConsensusVoter::new(VoterConfig::default());
        let accepted = voter.vote(&spans, &weights());

        assert_eq!(accepted.len(), 1);
        let desc = &accepted[0];
        assert_eq!(desc.kind, SpanKind::Character);
        assert_eq!(desc.contributors.len(), 2);
        assert!(desc.contributors.contains(&ExtractorId::new("alpha")));
        assert!(desc.contributors.contains(&ExtractorId::new("beta")));
    }

    #[test]
    fn test_split_vote_below_threshold_rejected() {
        // alpha says LOCATION, beta says CHARACTER on the same region.
        // Majority is beta (1.2 of 2.2 ≈ 0.545 < 0.6), so the cluster
        // is dropped entirely.
        let spans = vec![
            span(4, 20, SpanKind::Location, 0.9, "alpha"),
            span(4, 20, SpanKind::Character, 0.9, "beta"),
        ];

        let voter = ConsensusVoter::new(VoterConfig::default());
        assert!(voter.vote(&spans, &weights()).is_empty());
    }

    #[test]
    fn test_score_exactly_at_threshold_accepted() {
        // beta (1.2) agrees, gamma (0.8) disagrees: 1.2 / 2.0 = 0.6
        let spans = vec![
            span(4, 20, SpanKind::Character, 0.8, "beta"),
            span(4, 20, SpanKind::Object, 0.8, "gamma"),
        ];

        let voter = ConsensusVoter::new(VoterConfig::default());
        let accepted = voter.vote(&spans, &weights());

        assert_eq!(accepted.len(), 1, "inclusive threshold comparison");
        assert_eq!(accepted[0].kind, SpanKind::Character);
    }

    #[test]
    fn test_equal_weight_tie_breaks_by_kind_priority() {
        let even = BTreeMap::from([
            (ExtractorId::new("alpha"), 1.0),
            (ExtractorId::new("beta"), 1.0),
        ]);
        let spans = vec![
            span(4, 20, SpanKind::Action, 0.8, "beta"),
            span(4, 20, SpanKind::Location, 0.8, "alpha"),
        ];

        let voter = ConsensusVoter::new(VoterConfig::default().with_consensus_threshold(0.5));
        let accepted = voter.vote(&spans, &even);

        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].kind, SpanKind::Location);
    }

    // ==========================================
    // Boundary and Confidence Rules
    // ==========================================

    #[test]
    fn test_boundary_from_highest_weight_engine() {
        let spans = vec![
            span(4, 31, SpanKind::Character, 0.8, "alpha"),
            span(4, 20, SpanKind::Character, 0.6, "beta"),
        ];

        let voter = ConsensusVoter::new(VoterConfig::default());
        let accepted = voter.vote(&spans, &weights());

        // beta outweighs alpha, so its narrower span wins over the union
        assert_eq!(accepted[0].range(), 4..20);
        assert_eq!(accepted[0].text, &SOURCE[4..20]);
    }

    #[test]
    fn test_boundary_tie_goes_to_longer_span() {
        let even = BTreeMap::from([
            (ExtractorId::new("alpha"), 1.0),
            (ExtractorId::new("beta"), 1.0),
        ]);
        let spans = vec![
            span(4, 20, SpanKind::Character, 0.8, "alpha"),
            span(4, 31, SpanKind::Character, 0.8, "beta"),
        ];

        let voter = ConsensusVoter::new(VoterConfig::default());
        let accepted = voter.vote(&spans, &even);

        assert_eq!(accepted[0].range(), 4..31);
    }

    #[test]
    fn test_confidence_is_weighted_mean_of_agreeing() {
        let spans = vec![
            span(4, 20, SpanKind::Character, 0.8, "alpha"),
            span(4, 20, SpanKind::Character, 0.6, "beta"),
        ];

        let voter = ConsensusVoter::new(VoterConfig::default());
        let accepted = voter.vote(&spans, &weights());

        let expected = (1.0 * 0.8 + 1.2 * 0.6) / 2.2;
        assert!((accepted[0].confidence - expected).abs() < 1e-9);
    }

    #[test]
    fn test_engine_voting_twice_counts_once() {
        // alpha proposes the same kind twice in one cluster; beta
        // disagrees. Weights must be 1.0 vs 1.2, not 2.0 vs 1.2.
        let spans = vec![
            span(4, 20, SpanKind::Character, 0.8, "alpha"),
            span(5, 20, SpanKind::Character, 0.7, "alpha"),
            span(4, 20, SpanKind::Object, 0.9, "beta"),
        ];

        let voter = ConsensusVoter::new(VoterConfig::default());
        let accepted = voter.vote(&spans, &weights());

        // majority is beta's OBJECT at 1.2 / 2.2 < 0.6 — rejected
        assert!(accepted.is_empty());
    }

    // ==========================================
    // Properties
    // ==========================================

    #[test]
    fn test_raising_threshold_never_accepts_more() {
        let spans = vec![
            span(4, 20, SpanKind::Character, 0.8, "alpha"),
            span(4, 20, SpanKind::Character, 0.7, "beta"),
            span(4, 20, SpanKind::Location, 0.9, "gamma"),
            span(39, 43, SpanKind::Atmosphere, 0.6, "alpha"),
            span(39, 49, SpanKind::Atmosphere, 0.7, "beta"),
            span(50, 77, SpanKind::Location, 0.8, "gamma"),
        ];

        let mut previous = usize::MAX;
        for threshold in [0.0, 0.2, 0.4, 0.6, 0.8, 1.0] {
            let voter =
                ConsensusVoter::new(VoterConfig::default().with_consensus_threshold(threshold));
            let count = voter.vote(&spans, &weights()).len();
            assert!(count <= previous, "threshold {} accepted more", threshold);
            previous = count;
        }
    }

    #[test]
    fn test_deterministic_across_runs_and_orderings() {
        let spans = vec![
            span(4, 20, SpanKind::Character, 0.8, "alpha"),
            span(4, 20, SpanKind::Character, 0.7, "beta"),
            span(39, 49, SpanKind::Atmosphere, 0.7, "gamma"),
        ];
        let mut reversed = spans.clone();
        reversed.reverse();

        let voter = ConsensusVoter::new(VoterConfig::default());
        let first = voter.vote(&spans, &weights());
        let second = voter.vote(&spans, &weights());
        let third = voter.vote(&reversed, &weights());

        assert_eq!(first, second);
        assert_eq!(first, third);
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let voter = ConsensusVoter::new(VoterConfig::default());
        assert!(voter.vote(&[], &weights()).is_empty());
    }
}
