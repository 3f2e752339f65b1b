//! Context enrichment windows
//!
//! Computes the surrounding-sentence window for an accepted description.
//! Sentence boundaries come from a collaborator (the segmenter port in
//! the application layer); this module only does the pure window math.
//! Enrichment is strictly additive: a span with no usable window gets
//! `None`, never an error.

use std::ops::Range;

/// The sentence window around a span: every sentence the span touches
/// plus one neighbor on each side, merged into one range.
///
/// Returns `None` when `sentences` is empty or the span touches no
/// sentence (e.g. it falls entirely inside inter-sentence whitespace).
pub fn context_window(sentences: &[Range<usize>], span: &Range<usize>) -> Option<Range<usize>> {
    let mut first: Option<usize> = None;
    let mut last = 0;

    for (i, sentence) in sentences.iter().enumerate() {
        if sentence.start < span.end && span.start < sentence.end {
            first.get_or_insert(i);
            last = i;
        }
    }

    let first = first?;
    let lo = first.saturating_sub(1);
    let hi = (last + 1).min(sentences.len() - 1);
    Some(sentences[lo].start..sentences[hi].end)
}

/// The trimmed text of the window, for attaching to a description.
pub fn context_snippet(
    text: &str,
    sentences: &[Range<usize>],
    span: &Range<usize>,
) -> Option<String> {
    let window = context_window(sentences, span)?;
    let snippet = text.get(window)?.trim();
    if snippet.is_empty() {
        None
    } else {
        Some(snippet.to_string())
    }
}
