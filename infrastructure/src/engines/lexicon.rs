//! Gazetteer-based extraction engine
//!
//! Looks chapter text up against fixed per-kind vocabularies. High
//! precision on the terms it knows, blind to everything else; the
//! ensemble pairs it with the pattern and prose engines for coverage.

use async_trait::async_trait;
use vignette_application::{EngineError, ExtractionEngine};
use vignette_domain::{CandidateSpan, ExtractorId, SpanKind};

pub const ENGINE_ID: &str = "lexicon";

/// Scene vocabulary, lowercase. Multi-word phrases are matched as-is
/// against an ASCII-lowercased copy of the text, so offsets map
/// straight back to the original.
const LEXICON: &[(SpanKind, &[&str])] = &[
    (
        SpanKind::Location,
        &[
            "castle", "forest", "village", "tower", "valley", "courtyard", "tavern", "harbor",
            "meadow", "cathedral", "kitchen", "library", "moor", "keep", "garden", "cellar",
            "market square", "throne room", "city gate", "river bank",
        ],
    ),
    (
        SpanKind::Character,
        &[
            "knight", "stranger", "merchant", "captain", "princess", "soldier", "witch",
            "innkeeper", "old man", "old woman", "young girl", "young boy", "hooded figure",
            "horseman", "priest", "shepherd",
        ],
    ),
    (
        SpanKind::Atmosphere,
        &[
            "darkness", "fog", "mist", "silence", "twilight", "moonlight", "gloom", "dawn",
            "dusk", "storm", "shadows", "cold wind", "grey sky", "dying light", "heavy rain",
        ],
    ),
    (
        SpanKind::Object,
        &[
            "sword", "lantern", "cloak", "mirror", "chest", "candle", "letter", "ring", "dagger",
            "goblet", "saddle", "scroll", "key", "iron key", "leather satchel", "wooden door",
        ],
    ),
    (
        SpanKind::Action,
        &[
            "galloped", "leapt", "crept", "fled", "climbed", "stumbled", "charged", "knelt",
            "drew his sword", "drew her sword", "swung the blade",
        ],
    ),
];

/// Dictionary-lookup engine.
pub struct LexiconEngine;

impl LexiconEngine {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LexiconEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExtractionEngine for LexiconEngine {
    fn id(&self) -> ExtractorId {
        ExtractorId::new(ENGINE_ID)
    }

    async fn extract(&self, text: &str) -> Result<Vec<CandidateSpan>, EngineError> {
        let lowered = text.to_ascii_lowercase();
        let mut matches: Vec<(usize, usize, SpanKind, f64)> = Vec::new();

        for (kind, phrases) in LEXICON {
            for phrase in *phrases {
                for (start, _) in lowered.match_indices(phrase) {
                    let end = start + phrase.len();
                    if !word_bounded(&lowered, start, end) {
                        continue;
                    }
                    let words = phrase.split_whitespace().count();
                    let confidence = (0.6 + 0.05 * (words.saturating_sub(1)) as f64).min(0.8);
                    matches.push((start, end, *kind, confidence));
                }
            }
        }

        // A term fully inside a longer match of the same kind is noise
        // ("key" inside "iron key"); keep the longer one.
        matches.sort_by_key(|&(start, end, kind, _)| (start, end, kind.vote_priority()));
        let contained = |a: &(usize, usize, SpanKind, f64)| {
            matches.iter().any(|b| {
                b.2 == a.2 && (b.0 < a.0 && a.1 <= b.1 || b.0 <= a.0 && a.1 < b.1)
            })
        };
        let kept: Vec<_> = matches.iter().copied().filter(|m| !contained(m)).collect();

        kept.into_iter()
            .map(|(start, end, kind, confidence)| {
                CandidateSpan::new(text, start, end, kind, confidence, ENGINE_ID)
                    .map_err(|e| EngineError::ExtractionFailed(e.to_string()))
            })
            .collect()
    }
}

/// Word-boundary check: the match may not sit inside a larger word.
fn word_bounded(text: &str, start: usize, end: usize) -> bool {
    let bytes = text.as_bytes();
    let before_ok = start == 0 || !bytes[start - 1].is_ascii_alphanumeric();
    let after_ok = end >= bytes.len() || !bytes[end].is_ascii_alphanumeric();
    before_ok && after_ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_finds_known_terms() {
        let text = "The knight rode toward the castle as fog settled in.";
        let spans = LexiconEngine::new().extract(text).await.unwrap();

        let kinds: Vec<(SpanKind, &str)> =
            spans.iter().map(|s| (s.kind, s.text.as_str())).collect();
        assert!(kinds.contains(&(SpanKind::Character, "knight")));
        assert!(kinds.contains(&(SpanKind::Location, "castle")));
        assert!(kinds.contains(&(SpanKind::Atmosphere, "fog")));
    }

    #[tokio::test]
    async fn test_case_insensitive_with_original_text() {
        let text = "FOG everywhere. The Castle stood firm.";
        let spans = LexiconEngine::new().extract(text).await.unwrap();

        let fog = spans.iter().find(|s| s.kind == SpanKind::Atmosphere).unwrap();
        assert_eq!(fog.text, "FOG", "span text comes from the original");
    }

    #[tokio::test]
    async fn test_word_boundaries_respected() {
        // "forest" must not match inside "forestry", "ring" not inside "boring"
        let text = "A boring lecture on forestry.";
        let spans = LexiconEngine::new().extract(text).await.unwrap();
        assert!(spans.is_empty());
    }

    #[tokio::test]
    async fn test_longer_phrase_shadows_contained_term() {
        let text = "She found an iron key by the door.";
        let spans = LexiconEngine::new().extract(text).await.unwrap();

        let objects: Vec<&str> = spans
            .iter()
            .filter(|s| s.kind == SpanKind::Object)
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!(objects, vec!["iron key"]);
    }

    #[tokio::test]
    async fn test_multiword_phrases_score_higher() {
        let text = "A hooded figure passed the knight.";
        let spans = LexiconEngine::new().extract(text).await.unwrap();

        let figure = spans.iter().find(|s| s.text == "hooded figure").unwrap();
        let knight = spans.iter().find(|s| s.text == "knight").unwrap();
        assert!(figure.confidence > knight.confidence);
    }

    #[tokio::test]
    async fn test_no_matches_yields_empty() {
        let spans = LexiconEngine::new()
            .extract("Completely unrelated accounting report.")
            .await
            .unwrap();
        assert!(spans.is_empty());
    }
}
