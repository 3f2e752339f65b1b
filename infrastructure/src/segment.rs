//! Rule-based sentence segmentation
//!
//! Splits chapter text on terminal punctuation while skipping common
//! honorific abbreviations. Good enough for context enrichment; the
//! segmenter port allows swapping in a real NLP tokenizer without
//! touching the coordinator.

use std::collections::HashSet;
use std::ops::Range;
use vignette_application::SentenceSegmenter;

/// Sentence splitter driven by terminal punctuation.
///
/// A sentence ends at a run of `.`, `!` or `?` followed by whitespace
/// or end of input, unless the period closes a known abbreviation.
/// Returned ranges start at the first non-whitespace character of each
/// sentence and include the terminal punctuation.
pub struct RuleSegmenter {
    abbreviations: HashSet<&'static str>,
}

impl Default for RuleSegmenter {
    fn default() -> Self {
        Self {
            abbreviations: HashSet::from([
                "Mr", "Mrs", "Ms", "Dr", "St", "Prof", "Sr", "Jr", "Capt", "Col", "Gen", "Lt",
            ]),
        }
    }
}

impl RuleSegmenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the period at `dot` closes an abbreviation.
    fn is_abbreviation(&self, text: &str, dot: usize) -> bool {
        let bytes = text.as_bytes();
        let mut word_start = dot;
        while word_start > 0 && bytes[word_start - 1].is_ascii_alphabetic() {
            word_start -= 1;
        }
        word_start < dot && self.abbreviations.contains(&text[word_start..dot])
    }
}

impl SentenceSegmenter for RuleSegmenter {
    fn sentence_ranges(&self, text: &str) -> Vec<Range<usize>> {
        let bytes = text.as_bytes();
        let mut ranges = Vec::new();
        let mut start: Option<usize> = None;
        let mut i = 0;

        while i < bytes.len() {
            let b = bytes[i];
            if start.is_none() && !b.is_ascii_whitespace() {
                start = Some(i);
            }

            if matches!(b, b'.' | b'!' | b'?') {
                let mut end = i + 1;
                while end < bytes.len() && matches!(bytes[end], b'.' | b'!' | b'?') {
                    end += 1;
                }

                let at_boundary = end >= bytes.len() || bytes[end].is_ascii_whitespace();
                let abbreviation = b == b'.' && end == i + 1 && self.is_abbreviation(text, i);

                if at_boundary && !abbreviation {
                    if let Some(s) = start.take() {
                        ranges.push(s..end);
                    }
                }
                i = end;
                continue;
            }

            i += 1;
        }

        // Trailing text without terminal punctuation still counts
        if let Some(s) = start {
            let end = text.trim_end().len();
            if end > s {
                ranges.push(s..end);
            }
        }

        ranges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges(text: &str) -> Vec<&str> {
        RuleSegmenter::new()
            .sentence_ranges(text)
            .into_iter()
            .map(|r| &text[r])
            .collect()
    }

    #[test]
    fn test_basic_split() {
        assert_eq!(
            ranges("First here. Second there. Third everywhere."),
            vec!["First here.", "Second there.", "Third everywhere."]
        );
    }

    #[test]
    fn test_abbreviation_not_a_boundary() {
        assert_eq!(
            ranges("Mr. Bell arrived at dusk. He left at dawn."),
            vec!["Mr. Bell arrived at dusk.", "He left at dawn."]
        );
    }

    #[test]
    fn test_punctuation_runs() {
        assert_eq!(
            ranges("What?! It cannot be... And yet."),
            vec!["What?!", "It cannot be...", "And yet."]
        );
    }

    #[test]
    fn test_trailing_unterminated_sentence() {
        assert_eq!(
            ranges("A full stop. And then nothing more"),
            vec!["A full stop.", "And then nothing more"]
        );
    }

    #[test]
    fn test_leading_whitespace_skipped() {
        let text = "   Indented start. Next.";
        let result = RuleSegmenter::new().sentence_ranges(text);
        assert_eq!(result[0], 3..18);
        assert_eq!(&text[result[0].clone()], "Indented start.");
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert!(ranges("").is_empty());
        assert!(ranges("   \n\t ").is_empty());
    }

    #[test]
    fn test_exclamation_and_question_marks() {
        assert_eq!(
            ranges("Run! Where to? Nowhere."),
            vec!["Run!", "Where to?", "Nowhere."]
        );
    }
}
