//! Adaptive mode selection
//!
//! Picks a [`ProcessingMode`] per request from text features and the
//! time budget. The policy is documented, not hidden: short text and
//! single-engine setups go Single, tight budgets go Parallel, and
//! everything else gets the full Ensemble treatment.

use crate::mode::ProcessingMode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunable cut-offs for the selector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveThresholds {
    /// Texts shorter than this (in characters) are not worth the
    /// ensemble overhead
    pub short_text_len: usize,
    /// Budgets below this duration skip voting latency entirely
    pub tight_deadline: Duration,
}

impl Default for AdaptiveThresholds {
    fn default() -> Self {
        Self {
            short_text_len: 200,
            tight_deadline: Duration::from_secs(2),
        }
    }
}

/// Side-effect-free mode selection.
///
/// Never touches an engine; fully unit-testable in isolation.
///
/// # Example
///
/// ```
/// use vignette_domain::{AdaptiveSelector, ProcessingMode};
///
/// let selector = AdaptiveSelector::default();
/// let mode = selector.select("A short line.", None, 3);
/// assert_eq!(mode, ProcessingMode::Single);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AdaptiveSelector {
    thresholds: AdaptiveThresholds,
}

impl AdaptiveSelector {
    pub fn new(thresholds: AdaptiveThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &AdaptiveThresholds {
        &self.thresholds
    }

    /// Choose the execution mode for one request.
    ///
    /// Policy, in order:
    /// 1. trivially short text → `Single`
    /// 2. one engine or fewer → `Single` (voting is meaningless)
    /// 3. tight time budget → `Parallel` (coverage without voting latency)
    /// 4. otherwise → `Ensemble`
    pub fn select(
        &self,
        text: &str,
        time_budget: Option<Duration>,
        engine_count: usize,
    ) -> ProcessingMode {
        if text.chars().count() < self.thresholds.short_text_len {
            return ProcessingMode::Single;
        }
        if engine_count <= 1 {
            return ProcessingMode::Single;
        }
        if let Some(budget) = time_budget {
            if budget < self.thresholds.tight_deadline {
                return ProcessingMode::Parallel;
            }
        }
        ProcessingMode::Ensemble
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_text() -> String {
        "The caravan crossed the dunes as evening settled over the basin. ".repeat(8)
    }

    #[test]
    fn test_short_text_selects_single_regardless_of_budget() {
        let selector = AdaptiveSelector::default();
        let text = "a".repeat(50);

        assert_eq!(selector.select(&text, None, 3), ProcessingMode::Single);
        assert_eq!(
            selector.select(&text, Some(Duration::from_millis(1)), 3),
            ProcessingMode::Single
        );
        assert_eq!(
            selector.select(&text, Some(Duration::from_secs(3600)), 3),
            ProcessingMode::Single
        );
    }

    #[test]
    fn test_single_engine_selects_single() {
        let selector = AdaptiveSelector::default();
        assert_eq!(selector.select(&long_text(), None, 1), ProcessingMode::Single);
        assert_eq!(selector.select(&long_text(), None, 0), ProcessingMode::Single);
    }

    #[test]
    fn test_tight_budget_selects_parallel() {
        let selector = AdaptiveSelector::default();
        assert_eq!(
            selector.select(&long_text(), Some(Duration::from_millis(500)), 3),
            ProcessingMode::Parallel
        );
    }

    #[test]
    fn test_default_selects_ensemble() {
        let selector = AdaptiveSelector::default();
        assert_eq!(selector.select(&long_text(), None, 3), ProcessingMode::Ensemble);
        assert_eq!(
            selector.select(&long_text(), Some(Duration::from_secs(30)), 3),
            ProcessingMode::Ensemble
        );
    }

    #[test]
    fn test_threshold_boundaries() {
        let selector = AdaptiveSelector::new(AdaptiveThresholds {
            short_text_len: 10,
            tight_deadline: Duration::from_secs(2),
        });

        // Exactly at the length threshold is no longer "short"
        let at_threshold = "a".repeat(10);
        assert_eq!(selector.select(&at_threshold, None, 2), ProcessingMode::Ensemble);

        // Exactly at the deadline is not "tight"
        assert_eq!(
            selector.select(&at_threshold, Some(Duration::from_secs(2)), 2),
            ProcessingMode::Ensemble
        );
    }

    #[test]
    fn test_char_counting_not_bytes() {
        let selector = AdaptiveSelector::new(AdaptiveThresholds {
            short_text_len: 5,
            tight_deadline: Duration::from_secs(2),
        });

        // Five multibyte characters: not short, even though byte length is larger
        assert_eq!(selector.select("ééééé", None, 2), ProcessingMode::Ensemble);
    }
}
