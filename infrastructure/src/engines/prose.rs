//! Prose-shape extraction engine
//!
//! Works at sentence granularity: a sentence dense in cues of one kind
//! becomes a whole-sentence candidate span. Complements the other two
//! engines, which only ever propose short phrase spans.

use crate::segment::RuleSegmenter;
use async_trait::async_trait;
use vignette_application::{EngineError, ExtractionEngine, SentenceSegmenter};
use vignette_domain::{CandidateSpan, ExtractorId, SpanKind};

pub const ENGINE_ID: &str = "prose";

/// Minimum cue hits for a sentence to qualify
const MIN_CUES: usize = 2;

const CUES: &[(SpanKind, &[&str])] = &[
    (
        SpanKind::Location,
        &[
            "castle", "forest", "village", "tower", "valley", "courtyard", "hall", "road",
            "river", "harbor", "moor", "keep", "garden", "street", "bridge", "gate",
        ],
    ),
    (
        SpanKind::Character,
        &[
            "man", "woman", "knight", "stranger", "figure", "girl", "boy", "captain", "soldier",
            "rider", "priest", "merchant", "crowd", "guard",
        ],
    ),
    (
        SpanKind::Atmosphere,
        &[
            "dark", "darkness", "cold", "silent", "silence", "fog", "mist", "grey", "gray",
            "gloom", "pale", "dim", "shadow", "shadows", "moonlight", "dusk", "dawn", "storm",
            "rain", "wind",
        ],
    ),
    (
        SpanKind::Object,
        &[
            "sword", "lantern", "cloak", "ring", "book", "letter", "candle", "mirror", "chest",
            "key", "blade", "satchel", "torch", "banner",
        ],
    ),
    (
        SpanKind::Action,
        &[
            "ran", "running", "fled", "leapt", "jumped", "fought", "crept", "climbed", "charged",
            "galloped", "rode", "struck", "hurried", "swung",
        ],
    ),
];

/// Sentence-density engine.
pub struct ProseEngine {
    segmenter: RuleSegmenter,
}

impl ProseEngine {
    pub fn new() -> Self {
        Self {
            segmenter: RuleSegmenter::new(),
        }
    }

    /// Count cue hits per kind for one sentence, returning the dominant
    /// kind if it clears the density floor. Ties break by kind priority.
    fn classify(words: &[&str]) -> Option<(SpanKind, usize)> {
        let mut best: Option<(SpanKind, usize)> = None;
        for (kind, cues) in CUES {
            let count = words.iter().filter(|w| cues.contains(w)).count();
            if count >= MIN_CUES && best.is_none_or(|(_, b)| count > b) {
                best = Some((*kind, count));
            }
        }
        best
    }
}

impl Default for ProseEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExtractionEngine for ProseEngine {
    fn id(&self) -> ExtractorId {
        ExtractorId::new(ENGINE_ID)
    }

    async fn extract(&self, text: &str) -> Result<Vec<CandidateSpan>, EngineError> {
        let mut spans = Vec::new();

        for range in self.segmenter.sentence_ranges(text) {
            let sentence = &text[range.clone()];
            let lowered = sentence.to_ascii_lowercase();
            let words: Vec<&str> = lowered
                .split(|c: char| !c.is_ascii_alphanumeric())
                .filter(|w| !w.is_empty())
                .collect();

            if let Some((kind, count)) = Self::classify(&words) {
                let confidence = (0.45 + 0.1 * count as f64).min(0.85);
                let span =
                    CandidateSpan::new(text, range.start, range.end, kind, confidence, ENGINE_ID)
                        .map_err(|e| EngineError::ExtractionFailed(e.to_string()))?;
                spans.push(span);
            }
        }

        Ok(spans)
    }
}
