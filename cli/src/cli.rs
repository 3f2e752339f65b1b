//! Command-line argument definitions

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::PathBuf;
use vignette_domain::{ConfigUpdate, ExtractorId};

/// Extract visual descriptions from narrative chapter text by running
/// an ensemble of extraction engines and reconciling their output.
#[derive(Parser, Debug)]
#[command(name = "vignette", version, about)]
pub struct Cli {
    /// Chapter text file; reads stdin when omitted
    pub chapter: Option<PathBuf>,

    /// Processing mode: single, parallel, sequential, ensemble, adaptive
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Path to a config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Skip config file discovery, use built-in defaults
    #[arg(long)]
    pub no_config: bool,

    /// Request time budget in milliseconds
    #[arg(long, value_name = "MS")]
    pub time_budget_ms: Option<u64>,

    /// Output format: text, json
    #[arg(short, long)]
    pub output: Option<String>,

    /// Suppress progress display
    #[arg(short, long)]
    pub quiet: bool,

    /// Print engine status and exit
    #[arg(long)]
    pub status: bool,

    /// Engine config override, e.g. --set pattern.weight=1.5
    #[arg(long, value_name = "ID.FIELD=VALUE")]
    pub set: Vec<String>,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Parse an `id.field=value` override into a registry update.
///
/// Supported fields: `weight`, `confidence_threshold` (alias
/// `threshold`), `enabled`.
pub fn parse_set(spec: &str) -> Result<(ExtractorId, ConfigUpdate)> {
    let (target, value) = spec
        .split_once('=')
        .with_context(|| format!("expected ID.FIELD=VALUE, got '{}'", spec))?;
    let (id, field) = target
        .split_once('.')
        .with_context(|| format!("expected ID.FIELD=VALUE, got '{}'", spec))?;

    let update = match field {
        "weight" => ConfigUpdate::new().weight(
            value
                .parse()
                .with_context(|| format!("invalid weight '{}'", value))?,
        ),
        "confidence_threshold" | "threshold" => ConfigUpdate::new().confidence_threshold(
            value
                .parse()
                .with_context(|| format!("invalid threshold '{}'", value))?,
        ),
        "enabled" => ConfigUpdate::new().enabled(
            value
                .parse()
                .with_context(|| format!("invalid enabled flag '{}'", value))?,
        ),
        other => bail!(
            "unknown field '{}'; valid: weight, confidence_threshold, enabled",
            other
        ),
    };

    Ok((ExtractorId::new(id), update))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_set_weight() {
        let (id, update) = parse_set("pattern.weight=1.5").unwrap();
        assert_eq!(id.as_str(), "pattern");
        assert_eq!(update.weight, Some(1.5));
        assert!(update.confidence_threshold.is_none());
    }

    #[test]
    fn test_parse_set_threshold_alias() {
        let (_, update) = parse_set("lexicon.threshold=0.4").unwrap();
        assert_eq!(update.confidence_threshold, Some(0.4));
    }

    #[test]
    fn test_parse_set_enabled() {
        let (id, update) = parse_set("prose.enabled=false").unwrap();
        assert_eq!(id.as_str(), "prose");
        assert_eq!(update.enabled, Some(false));
    }

    #[test]
    fn test_parse_set_rejects_malformed() {
        assert!(parse_set("pattern.weight").is_err());
        assert!(parse_set("weight=1.5").is_err());
        assert!(parse_set("pattern.speed=9").is_err());
        assert!(parse_set("pattern.weight=fast").is_err());
    }
}
