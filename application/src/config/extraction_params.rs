//! Extraction parameters — per-request tuning knobs.
//!
//! [`ExtractionParams`] groups the static parameters that control one
//! run of [`ExtractScenesUseCase`](crate::use_cases::extract_scenes::ExtractScenesUseCase):
//! timeouts, reconciliation thresholds, and the adaptive selector
//! cut-offs. These are application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use vignette_domain::{AdaptiveSelector, AdaptiveThresholds, VoterConfig};

/// Tuning parameters for one extraction request.
///
/// The thresholds are deployment defaults inferred from observed
/// behavior, not hard requirements; all of them are overridable per
/// request or from the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionParams {
    /// Timeout for each engine's extract call.
    pub engine_timeout: Duration,
    /// Overall deadline for the request; also the adaptive selector's
    /// time budget. `None` means unbounded.
    pub request_deadline: Option<Duration>,
    /// Minimum pairwise IoU for spans to share a voting cluster, and
    /// the sequential-mode supplement cut-off.
    pub overlap_threshold: f64,
    /// Minimum agreeing-weight fraction to accept a cluster.
    pub consensus_threshold: f64,
    /// IoU above which same-kind descriptions merge in deduplication.
    pub dedup_threshold: f64,
    /// Adaptive selector cut-offs.
    pub adaptive: AdaptiveThresholds,
}

impl Default for ExtractionParams {
    fn default() -> Self {
        Self {
            engine_timeout: Duration::from_secs(10),
            request_deadline: None,
            overlap_threshold: 0.5,
            consensus_threshold: 0.6,
            dedup_threshold: 0.9,
            adaptive: AdaptiveThresholds::default(),
        }
    }
}

impl ExtractionParams {
    // ==================== Builder Methods ====================

    pub fn with_engine_timeout(mut self, timeout: Duration) -> Self {
        self.engine_timeout = timeout;
        self
    }

    pub fn with_request_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.request_deadline = deadline;
        self
    }

    pub fn with_overlap_threshold(mut self, threshold: f64) -> Self {
        self.overlap_threshold = threshold;
        self
    }

    pub fn with_consensus_threshold(mut self, threshold: f64) -> Self {
        self.consensus_threshold = threshold;
        self
    }

    pub fn with_dedup_threshold(mut self, threshold: f64) -> Self {
        self.dedup_threshold = threshold;
        self
    }

    pub fn with_adaptive(mut self, thresholds: AdaptiveThresholds) -> Self {
        self.adaptive = thresholds;
        self
    }

    // ==================== Derived Views ====================

    /// Voter thresholds for ensemble mode
    pub fn voter_config(&self) -> VoterConfig {
        VoterConfig {
            overlap_threshold: self.overlap_threshold,
            consensus_threshold: self.consensus_threshold,
        }
    }

    /// Selector configured with this request's cut-offs
    pub fn selector(&self) -> AdaptiveSelector {
        AdaptiveSelector::new(self.adaptive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = ExtractionParams::default();
        assert_eq!(params.engine_timeout, Duration::from_secs(10));
        assert!(params.request_deadline.is_none());
        assert_eq!(params.overlap_threshold, 0.5);
        assert_eq!(params.consensus_threshold, 0.6);
        assert_eq!(params.dedup_threshold, 0.9);
    }

    #[test]
    fn test_builder() {
        let params = ExtractionParams::default()
            .with_engine_timeout(Duration::from_secs(3))
            .with_request_deadline(Some(Duration::from_secs(20)))
            .with_consensus_threshold(0.75);

        assert_eq!(params.engine_timeout, Duration::from_secs(3));
        assert_eq!(params.request_deadline, Some(Duration::from_secs(20)));
        assert_eq!(params.consensus_threshold, 0.75);
    }

    #[test]
    fn test_voter_config_view() {
        let params = ExtractionParams::default().with_overlap_threshold(0.4);
        let voter = params.voter_config();
        assert_eq!(voter.overlap_threshold, 0.4);
        assert_eq!(voter.consensus_threshold, 0.6);
    }
}
