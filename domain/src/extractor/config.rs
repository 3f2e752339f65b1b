//! Per-engine tuning configuration
//!
//! [`ExtractorConfig`] is the admin-tunable state governing one engine:
//! its relative trust (weight), the minimum self-reported confidence it
//! must clear to emit a span, and whether it participates at all.
//! All mutation goes through the registry, which validates via
//! [`ConfigUpdate::apply_to`] before any field is written.

use crate::describe::span::ExtractorId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation failures for engine configuration
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigValidationError {
    #[error("weight must be positive, got {0}")]
    NonPositiveWeight(f64),

    #[error("confidence threshold must be within [0.0, 1.0], got {0}")]
    ThresholdOutOfRange(f64),
}

/// Tuning state for one extraction engine.
///
/// # Example
///
/// ```
/// use vignette_domain::ExtractorConfig;
///
/// let config = ExtractorConfig::new("pattern")
///     .with_weight(1.2).unwrap()
///     .with_confidence_threshold(0.4).unwrap();
/// assert!(config.enabled);
/// assert!(config.with_weight(0.0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Engine identifier
    pub id: ExtractorId,
    /// Relative trust used in consensus voting; must be positive
    pub weight: f64,
    /// Minimum self-reported confidence for a span to be kept
    pub confidence_threshold: f64,
    /// Disabled engines are excluded from every snapshot
    pub enabled: bool,
}

impl ExtractorConfig {
    /// Create a config with neutral defaults: weight 1.0, threshold
    /// 0.0 (keep everything), enabled.
    pub fn new(id: impl Into<ExtractorId>) -> Self {
        Self {
            id: id.into(),
            weight: 1.0,
            confidence_threshold: 0.0,
            enabled: true,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Result<Self, ConfigValidationError> {
        validate_weight(weight)?;
        self.weight = weight;
        Ok(self)
    }

    pub fn with_confidence_threshold(
        mut self,
        threshold: f64,
    ) -> Result<Self, ConfigValidationError> {
        validate_threshold(threshold)?;
        self.confidence_threshold = threshold;
        Ok(self)
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Re-check the invariants, e.g. after deserializing from a file.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        validate_weight(self.weight)?;
        validate_threshold(self.confidence_threshold)
    }
}

fn validate_weight(weight: f64) -> Result<(), ConfigValidationError> {
    if weight > 0.0 && weight.is_finite() {
        Ok(())
    } else {
        Err(ConfigValidationError::NonPositiveWeight(weight))
    }
}

fn validate_threshold(threshold: f64) -> Result<(), ConfigValidationError> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(ConfigValidationError::ThresholdOutOfRange(threshold))
    }
}

/// A partial, validated update to an [`ExtractorConfig`].
///
/// Fields left as `None` keep their current value. Validation happens
/// against the combined result before anything is written, so a
/// rejected update leaves the prior config untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigUpdate {
    pub weight: Option<f64>,
    pub confidence_threshold: Option<f64>,
    pub enabled: Option<bool>,
}

impl ConfigUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = Some(threshold);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.weight.is_none() && self.confidence_threshold.is_none() && self.enabled.is_none()
    }

    /// Produce the updated config, or the validation error that
    /// rejected it.
    pub fn apply_to(&self, config: &ExtractorConfig) -> Result<ExtractorConfig, ConfigValidationError> {
        let mut updated = config.clone();
        if let Some(weight) = self.weight {
            validate_weight(weight)?;
            updated.weight = weight;
        }
        if let Some(threshold) = self.confidence_threshold {
            validate_threshold(threshold)?;
            updated.confidence_threshold = threshold;
        }
        if let Some(enabled) = self.enabled {
            updated.enabled = enabled;
        }
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExtractorConfig::new("lexicon");
        assert_eq!(config.weight, 1.0);
        assert_eq!(config.confidence_threshold, 0.0);
        assert!(config.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_weight() {
        assert_eq!(
            ExtractorConfig::new("lexicon").with_weight(0.0).unwrap_err(),
            ConfigValidationError::NonPositiveWeight(0.0)
        );
        assert!(ExtractorConfig::new("lexicon").with_weight(-1.5).is_err());
        assert!(ExtractorConfig::new("lexicon").with_weight(f64::NAN).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_threshold() {
        assert_eq!(
            ExtractorConfig::new("lexicon")
                .with_confidence_threshold(1.5)
                .unwrap_err(),
            ConfigValidationError::ThresholdOutOfRange(1.5)
        );
        assert!(
            ExtractorConfig::new("lexicon")
                .with_confidence_threshold(-0.1)
                .is_err()
        );
    }

    #[test]
    fn test_update_applies_only_set_fields() {
        let config = ExtractorConfig::new("lexicon");
        let updated = ConfigUpdate::new().weight(2.5).apply_to(&config).unwrap();

        assert_eq!(updated.weight, 2.5);
        assert_eq!(updated.confidence_threshold, config.confidence_threshold);
        assert_eq!(updated.enabled, config.enabled);
    }

    #[test]
    fn test_invalid_update_rejected_whole() {
        let config = ExtractorConfig::new("lexicon");
        let result = ConfigUpdate::new()
            .weight(2.5)
            .confidence_threshold(7.0)
            .apply_to(&config);

        assert!(result.is_err());
        // caller keeps the prior config; nothing was mutated in place
        assert_eq!(config.weight, 1.0);
    }

    #[test]
    fn test_empty_update() {
        assert!(ConfigUpdate::new().is_empty());
        assert!(!ConfigUpdate::new().enabled(false).is_empty());
    }
}
