//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application-layer
//! parameter types.
//!
//! Example configuration:
//!
//! ```toml
//! [extraction]
//! mode = "ensemble"
//! consensus_threshold = 0.65
//!
//! [engines.pattern]
//! weight = 1.4
//!
//! [engines.prose]
//! enabled = false
//!
//! [output]
//! format = "json"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use vignette_application::ExtractionParams;
use vignette_domain::{AdaptiveThresholds, ProcessingMode};

/// Root of the TOML config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Per-engine overrides, keyed by engine id
    pub engines: BTreeMap<String, FileEngineConfig>,
    /// Extraction tuning
    pub extraction: FileExtractionConfig,
    /// Output preferences
    pub output: FileOutputConfig,
}

/// Per-engine overrides from TOML; unset fields keep the built-in
/// defaults for that engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEngineConfig {
    pub weight: Option<f64>,
    pub confidence_threshold: Option<f64>,
    pub enabled: Option<bool>,
}

/// Raw extraction tuning from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExtractionConfig {
    /// Default processing mode
    pub mode: ProcessingMode,
    /// Per-engine call timeout in seconds
    pub engine_timeout_secs: u64,
    /// Overall request deadline in milliseconds; absent means unbounded
    pub request_deadline_ms: Option<u64>,
    /// Clustering / supplement overlap threshold
    pub overlap_threshold: f64,
    /// Consensus acceptance threshold
    pub consensus_threshold: f64,
    /// Deduplication overlap threshold
    pub dedup_threshold: f64,
    /// Adaptive selector: short-text cut-off in characters
    pub short_text_len: usize,
    /// Adaptive selector: tight-deadline cut-off in milliseconds
    pub tight_deadline_ms: u64,
}

impl Default for FileExtractionConfig {
    fn default() -> Self {
        Self {
            mode: ProcessingMode::default(),
            engine_timeout_secs: 10,
            request_deadline_ms: None,
            overlap_threshold: 0.5,
            consensus_threshold: 0.6,
            dedup_threshold: 0.9,
            short_text_len: 200,
            tight_deadline_ms: 2000,
        }
    }
}

impl FileExtractionConfig {
    /// Convert into the application-layer parameter type
    pub fn to_params(&self) -> ExtractionParams {
        ExtractionParams::default()
            .with_engine_timeout(Duration::from_secs(self.engine_timeout_secs))
            .with_request_deadline(self.request_deadline_ms.map(Duration::from_millis))
            .with_overlap_threshold(self.overlap_threshold)
            .with_consensus_threshold(self.consensus_threshold)
            .with_dedup_threshold(self.dedup_threshold)
            .with_adaptive(AdaptiveThresholds {
                short_text_len: self.short_text_len,
                tight_deadline: Duration::from_millis(self.tight_deadline_ms),
            })
    }
}

/// Output format for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// Human-readable grouped listing
    #[default]
    Text,
    /// The full scene report as JSON
    Json,
}

impl std::str::FromStr for OutputKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputKind::Text),
            "json" => Ok(OutputKind::Json),
            _ => Err(format!("Unknown output format: {}. Valid: text, json", s)),
        }
    }
}

/// Raw output configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Output format
    pub format: OutputKind,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: OutputKind::Text,
            color: true,
        }
    }
}
