//! Console output formatting

use colored::Colorize;
use vignette_application::{EngineStatus, SceneReport};
use vignette_domain::SpanKind;

/// Formats scene reports and engine status for the terminal
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Human-readable listing, grouped by kind in priority order.
    pub fn format(report: &SceneReport) -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "mode: {} ({} responded, {} failed)\n",
            report.mode_used,
            report.responded.len(),
            report.failed.len()
        ));
        if report.is_degraded() {
            let failed: Vec<String> = report.failed.iter().map(|id| id.to_string()).collect();
            out.push_str(&format!("degraded: {} dropped out\n", failed.join(", ")));
        }
        out.push('\n');

        if report.is_empty() {
            out.push_str("No descriptions survived reconciliation.\n");
            return out;
        }

        for kind in SpanKind::ALL {
            let of_kind: Vec<_> = report
                .descriptions
                .iter()
                .filter(|d| d.kind == kind)
                .collect();
            if of_kind.is_empty() {
                continue;
            }

            out.push_str(&format!("{}\n", kind.to_string().to_uppercase().bold()));
            for desc in of_kind {
                let contributors: Vec<&str> =
                    desc.contributors.iter().map(|id| id.as_str()).collect();
                out.push_str(&format!(
                    "  [{:.2}] {} {}\n",
                    desc.confidence,
                    desc.text,
                    format!("({})", contributors.join(", ")).dimmed()
                ));
                if let Some(context) = &desc.context {
                    out.push_str(&format!("        {}\n", context.italic().dimmed()));
                }
            }
            out.push('\n');
        }

        out
    }

    /// The full report as JSON, stamped with the generation time.
    pub fn format_json(report: &SceneReport) -> String {
        let envelope = serde_json::json!({
            "generated_at": chrono::Utc::now().to_rfc3339(),
            "report": report,
        });
        serde_json::to_string_pretty(&envelope).unwrap_or_else(|e| {
            format!("{{\"error\": \"failed to serialize report: {}\"}}", e)
        })
    }

    /// Engine status table for `--status`.
    pub fn format_status(status: &[EngineStatus]) -> String {
        let mut out = String::from("engine      state      weight  threshold\n");
        for s in status {
            let state = if !s.enabled {
                "disabled"
            } else if s.available {
                "available"
            } else if s.loaded {
                "loaded"
            } else {
                "failed"
            };
            out.push_str(&format!(
                "{:<11} {:<10} {:<7.2} {:.2}\n",
                s.id.to_string(),
                state,
                s.weight,
                s.confidence_threshold
            ));
            if let Some(error) = &s.last_error {
                out.push_str(&format!("            last error: {}\n", error));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vignette_domain::{Description, ExtractorId, ProcessingMode};

    fn sample_report() -> SceneReport {
        SceneReport {
            requested_mode: ProcessingMode::Ensemble,
            mode_used: ProcessingMode::Ensemble,
            responded: vec![ExtractorId::new("lexicon"), ExtractorId::new("pattern")],
            failed: vec![ExtractorId::new("prose")],
            descriptions: vec![
                Description::new(4, 14, "old castle", SpanKind::Location, 0.82, ["lexicon", "pattern"])
                    .unwrap()
                    .with_context(Some("The old castle loomed.".to_string())),
                Description::new(20, 27, "lantern", SpanKind::Object, 0.6, ["lexicon"]).unwrap(),
            ],
        }
    }

    #[test]
    fn test_text_format_groups_by_kind() {
        colored::control::set_override(false);
        let out = ConsoleFormatter::format(&sample_report());

        assert!(out.contains("mode: ensemble (2 responded, 1 failed)"));
        assert!(out.contains("degraded: prose dropped out"));
        assert!(out.contains("LOCATION"));
        assert!(out.contains("[0.82] old castle (lexicon, pattern)"));
        assert!(out.contains("The old castle loomed."));
        assert!(out.contains("OBJECT"));
        // location section precedes object section
        assert!(out.find("LOCATION").unwrap() < out.find("OBJECT").unwrap());
    }

    #[test]
    fn test_text_format_empty_report() {
        colored::control::set_override(false);
        let mut report = sample_report();
        report.descriptions.clear();

        let out = ConsoleFormatter::format(&report);
        assert!(out.contains("No descriptions survived"));
    }

    #[test]
    fn test_json_format_roundtrips() {
        let out = ConsoleFormatter::format_json(&sample_report());
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert!(value["generated_at"].is_string());
        assert_eq!(value["report"]["mode_used"], "ensemble");
        assert_eq!(value["report"]["descriptions"][0]["text"], "old castle");
    }

    #[test]
    fn test_status_table() {
        let status = vec![EngineStatus {
            id: ExtractorId::new("pattern"),
            loaded: true,
            available: true,
            enabled: true,
            weight: 1.2,
            confidence_threshold: 0.0,
            last_error: None,
        }];

        let out = ConsoleFormatter::format_status(&status);
        assert!(out.contains("pattern"));
        assert!(out.contains("available"));
        assert!(out.contains("1.20"));
    }
}
