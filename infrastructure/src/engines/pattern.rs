//! Pattern-based extraction engine
//!
//! Matches contextual cue phrases ("into the cellar", "a cold mist")
//! rather than bare vocabulary, so it proposes spans the lexicon engine
//! misses and overlapping variants of spans it finds. Patterns compile
//! in `load`, which is the engine's genuine failure point.

use async_trait::async_trait;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;
use vignette_application::{EngineError, ExtractionEngine};
use vignette_domain::{CandidateSpan, ExtractorId, SpanKind};

pub const ENGINE_ID: &str = "pattern";

/// Cue patterns with per-pattern confidence. Phrase patterns are more
/// specific than single-word lookups, hence the higher scores.
const PATTERNS: &[(SpanKind, &str, f64)] = &[
    (
        SpanKind::Location,
        r"(?i)\b(?:in|into|through|across|beneath|beyond|atop|inside)\s+the\s+[a-z]+\b",
        0.65,
    ),
    (
        SpanKind::Location,
        r"(?i)\bthe\s+(?:old|ruined|distant|narrow|great)\s+(?:castle|forest|tower|hall|road|bridge|village|keep|moor)\b",
        0.75,
    ),
    (
        SpanKind::Character,
        r"(?i)\b(?:the|a|an)\s+(?:old|young|tall|thin|weathered|mysterious|hooded|bearded)\s+(?:man|woman|figure|stranger|girl|boy|rider|soldier|knight)\b",
        0.75,
    ),
    (
        SpanKind::Atmosphere,
        r"(?i)\b(?:a\s+|the\s+)?(?:thick|cold|heavy|pale|dim|grey|gray|golden)\s+(?:fog|mist|light|darkness|silence|gloom|haze|rain|wind)\b",
        0.7,
    ),
    (
        SpanKind::Atmosphere,
        r"(?i)\bthe\s+(?:air|night|sky|room)\s+(?:was|grew|hung|turned)\s+[a-z]+\b",
        0.62,
    ),
    (
        SpanKind::Object,
        r"(?i)\b(?:a|an|the)\s+(?:rusted|gleaming|ancient|battered|dented|leather|silver|wooden|brass)\s+[a-z]+\b",
        0.68,
    ),
    (
        SpanKind::Action,
        r"(?i)\b(?:he|she|they)\s+(?:ran|fled|leapt|crept|strode|stumbled|galloped|climbed|charged|spun)\b",
        0.6,
    ),
];

struct PatternRule {
    kind: SpanKind,
    regex: Regex,
    confidence: f64,
}

/// Regex cue-phrase engine. `extract` before a successful `load` is an
/// availability error, mirroring a model-backed engine that has not
/// been initialized.
pub struct PatternEngine {
    rules: OnceLock<Vec<PatternRule>>,
}

impl PatternEngine {
    pub fn new() -> Self {
        Self {
            rules: OnceLock::new(),
        }
    }
}

impl Default for PatternEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExtractionEngine for PatternEngine {
    fn id(&self) -> ExtractorId {
        ExtractorId::new(ENGINE_ID)
    }

    async fn load(&self) -> Result<(), EngineError> {
        if self.rules.get().is_some() {
            return Ok(());
        }

        let mut rules = Vec::with_capacity(PATTERNS.len());
        for (kind, pattern, confidence) in PATTERNS {
            let regex = Regex::new(pattern).map_err(|e| {
                EngineError::Unavailable(format!("bad {} pattern: {}", kind, e))
            })?;
            rules.push(PatternRule {
                kind: *kind,
                regex,
                confidence: *confidence,
            });
        }

        debug!("Compiled {} cue patterns", rules.len());
        let _ = self.rules.set(rules);
        Ok(())
    }

    async fn extract(&self, text: &str) -> Result<Vec<CandidateSpan>, EngineError> {
        let rules = self.rules.get().ok_or_else(|| {
            EngineError::Unavailable("patterns not compiled; load the engine first".into())
        })?;

        let mut spans = Vec::new();
        for rule in rules {
            for m in rule.regex.find_iter(text) {
                let span = CandidateSpan::new(
                    text,
                    m.start(),
                    m.end(),
                    rule.kind,
                    rule.confidence,
                    ENGINE_ID,
                )
                .map_err(|e| EngineError::ExtractionFailed(e.to_string()))?;
                spans.push(span);
            }
        }

        spans.sort_by(|a, b| (a.start, a.end, a.kind.vote_priority()).cmp(&(b.start, b.end, b.kind.vote_priority())));
        Ok(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn loaded() -> PatternEngine {
        let engine = PatternEngine::new();
        engine.load().await.unwrap();
        engine
    }

    #[tokio::test]
    async fn test_extract_before_load_is_unavailable() {
        let engine = PatternEngine::new();
        let result = engine.extract("Into the cellar.").await;
        assert!(matches!(result, Err(EngineError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_load_is_idempotent() {
        let engine = PatternEngine::new();
        engine.load().await.unwrap();
        engine.load().await.unwrap();
        assert!(engine.extract("text").await.is_ok());
    }

    #[tokio::test]
    async fn test_location_cue_phrases() {
        let engine = loaded().await;
        let spans = engine.extract("She slipped into the cellar.").await.unwrap();

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].kind, SpanKind::Location);
        assert_eq!(spans[0].text, "into the cellar");
    }

    #[tokio::test]
    async fn test_character_cue_phrases() {
        let engine = loaded().await;
        let spans = engine
            .extract("A weathered stranger waited by the well.")
            .await
            .unwrap();

        let character = spans.iter().find(|s| s.kind == SpanKind::Character).unwrap();
        assert_eq!(character.text, "A weathered stranger");
    }

    #[tokio::test]
    async fn test_atmosphere_cue_phrases() {
        let engine = loaded().await;
        let spans = engine
            .extract("A cold mist settled. The night grew darker still.")
            .await
            .unwrap();

        let kinds: Vec<&str> = spans
            .iter()
            .filter(|s| s.kind == SpanKind::Atmosphere)
            .map(|s| s.text.as_str())
            .collect();
        assert!(kinds.contains(&"A cold mist"));
        assert!(kinds.contains(&"The night grew darker"));
    }

    #[tokio::test]
    async fn test_action_cue_phrases() {
        let engine = loaded().await;
        let spans = engine.extract("Then she fled before dawn.").await.unwrap();

        let action = spans.iter().find(|s| s.kind == SpanKind::Action).unwrap();
        assert_eq!(action.text, "she fled");
    }

    #[tokio::test]
    async fn test_object_cue_phrases() {
        let engine = loaded().await;
        let spans = engine
            .extract("He raised a dented lantern against the dark.")
            .await
            .unwrap();

        let object = spans.iter().find(|s| s.kind == SpanKind::Object).unwrap();
        assert_eq!(object.text, "a dented lantern");
    }

    #[tokio::test]
    async fn test_plain_text_yields_nothing() {
        let engine = loaded().await;
        let spans = engine
            .extract("Quarterly figures improved modestly.")
            .await
            .unwrap();
        assert!(spans.is_empty());
    }
}
