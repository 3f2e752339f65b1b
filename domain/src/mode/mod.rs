//! Processing mode definitions
//!
//! [`ProcessingMode`] is the single user-facing axis controlling how
//! the coordinator invokes engines and whether consensus voting runs.
//! [`adaptive`] holds the heuristic that picks a mode per request.

pub mod adaptive;

use serde::{Deserialize, Serialize};
use std::fmt;

/// How engines are invoked for one request.
///
/// | Mode | Invocation | Voting |
/// |------|------------|--------|
/// | Single | highest-weight engine only | none, spans pass through |
/// | Parallel | all engines, concurrently | none, plain union |
/// | Sequential | all engines, serial by weight | implicit overlap-drop |
/// | Ensemble | all engines, concurrently | full weighted consensus |
/// | Adaptive | delegates to the selector | inherited from chosen mode |
///
/// # Example
///
/// ```
/// use vignette_domain::ProcessingMode;
///
/// assert_eq!(ProcessingMode::default(), ProcessingMode::Ensemble);
/// assert_eq!("seq".parse::<ProcessingMode>().ok(), Some(ProcessingMode::Sequential));
/// assert!(ProcessingMode::Ensemble.uses_voting());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingMode {
    /// One engine, fastest; development and trivial inputs
    Single,
    /// All engines concurrently, plain union; maximum coverage, accepts noise
    Parallel,
    /// All engines serially, later engines supplement earlier ones
    Sequential,
    /// All engines concurrently with weighted consensus voting
    #[default]
    Ensemble,
    /// Per-request mode selection from text features and time budget
    Adaptive,
}

impl ProcessingMode {
    /// Whether this mode fans engines out concurrently
    pub fn is_concurrent(&self) -> bool {
        matches!(self, ProcessingMode::Parallel | ProcessingMode::Ensemble)
    }

    /// Whether the consensus voter runs for this mode
    pub fn uses_voting(&self) -> bool {
        matches!(self, ProcessingMode::Ensemble)
    }

    /// Get a human-readable description of this mode
    pub fn description(&self) -> &'static str {
        match self {
            ProcessingMode::Single => "single engine, no voting",
            ProcessingMode::Parallel => "all engines concurrently, plain union",
            ProcessingMode::Sequential => "all engines serially, incremental supplement",
            ProcessingMode::Ensemble => "all engines concurrently, weighted consensus",
            ProcessingMode::Adaptive => "mode chosen per request",
        }
    }
}

impl fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessingMode::Single => write!(f, "single"),
            ProcessingMode::Parallel => write!(f, "parallel"),
            ProcessingMode::Sequential => write!(f, "sequential"),
            ProcessingMode::Ensemble => write!(f, "ensemble"),
            ProcessingMode::Adaptive => write!(f, "adaptive"),
        }
    }
}

impl std::str::FromStr for ProcessingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" | "solo" => Ok(ProcessingMode::Single),
            "parallel" | "par" => Ok(ProcessingMode::Parallel),
            "sequential" | "seq" => Ok(ProcessingMode::Sequential),
            "ensemble" | "ens" => Ok(ProcessingMode::Ensemble),
            "adaptive" | "auto" => Ok(ProcessingMode::Adaptive),
            _ => Err(format!(
                "Unknown processing mode: {}. Valid: single, parallel, sequential, ensemble, adaptive",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_ensemble() {
        assert_eq!(ProcessingMode::default(), ProcessingMode::Ensemble);
    }

    #[test]
    fn test_display_roundtrip() {
        for mode in [
            ProcessingMode::Single,
            ProcessingMode::Parallel,
            ProcessingMode::Sequential,
            ProcessingMode::Ensemble,
            ProcessingMode::Adaptive,
        ] {
            assert_eq!(mode.to_string().parse::<ProcessingMode>().ok(), Some(mode));
        }
    }

    #[test]
    fn test_from_str_aliases() {
        assert_eq!("seq".parse::<ProcessingMode>().ok(), Some(ProcessingMode::Sequential));
        assert_eq!("ens".parse::<ProcessingMode>().ok(), Some(ProcessingMode::Ensemble));
        assert_eq!("auto".parse::<ProcessingMode>().ok(), Some(ProcessingMode::Adaptive));
        assert!("turbo".parse::<ProcessingMode>().is_err());
    }

    #[test]
    fn test_concurrency_and_voting_flags() {
        assert!(ProcessingMode::Parallel.is_concurrent());
        assert!(ProcessingMode::Ensemble.is_concurrent());
        assert!(!ProcessingMode::Sequential.is_concurrent());
        assert!(ProcessingMode::Ensemble.uses_voting());
        assert!(!ProcessingMode::Parallel.uses_voting());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&ProcessingMode::Sequential).unwrap(),
            "\"sequential\""
        );
    }
}
