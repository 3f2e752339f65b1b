//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("span {start}..{end} is invalid for text of length {len}")]
    InvalidSpan {
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("description must have at least one contributing extractor")]
    NoContributors,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_span_display() {
        let error = DomainError::InvalidSpan {
            start: 5,
            end: 3,
            len: 10,
        };
        assert_eq!(error.to_string(), "span 5..3 is invalid for text of length 10");
    }

    #[test]
    fn test_no_contributors_display() {
        assert_eq!(
            DomainError::NoContributors.to_string(),
            "description must have at least one contributing extractor"
        );
    }
}
