//! Span and description entities
//!
//! [`CandidateSpan`] is an engine's proposal; [`Description`] is the
//! reconciled output record handed to downstream consumers.

pub mod description;
pub mod kind;
pub mod span;

pub use description::Description;
pub use kind::SpanKind;
pub use span::{CandidateSpan, ExtractorId};
