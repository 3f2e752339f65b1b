//! Domain layer for vignette
//!
//! This crate contains the core entities and the pure reconciliation
//! algorithms. It has no dependencies on infrastructure or presentation
//! concerns.
//!
//! # Core Concepts
//!
//! ## Candidate spans and descriptions
//!
//! Each extraction engine proposes [`CandidateSpan`]s over the chapter
//! text. The consensus layer reconciles overlapping, possibly
//! contradictory proposals from independently-weighted engines into
//! final [`Description`] records.
//!
//! ## Consensus
//!
//! The [`ConsensusVoter`] clusters overlapping spans by character-offset
//! IoU, runs a weighted type vote per cluster, and accepts clusters
//! whose agreement ratio clears the consensus threshold. Rejected
//! clusters are dropped silently; that filtering is the point.
//!
//! ## Processing modes
//!
//! [`ProcessingMode`] selects how engines are invoked (single, parallel,
//! sequential, ensemble) and whether voting applies at all.
//! [`AdaptiveSelector`] picks a mode per request from text features and
//! the time budget.

pub mod consensus;
pub mod core;
pub mod describe;
pub mod enrich;
pub mod extractor;
pub mod mode;

// Re-export commonly used types
pub use consensus::{
    cluster::cluster_indices,
    dedup::Deduplicator,
    overlap::overlap_ratio,
    voter::{ConsensusVoter, VoterConfig},
};
pub use core::error::DomainError;
pub use describe::{
    description::Description,
    kind::SpanKind,
    span::{CandidateSpan, ExtractorId},
};
pub use extractor::config::{ConfigUpdate, ConfigValidationError, ExtractorConfig};
pub use mode::{
    ProcessingMode,
    adaptive::{AdaptiveSelector, AdaptiveThresholds},
};
