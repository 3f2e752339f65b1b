//! Consensus layer — reconciling disagreeing engine outputs
//!
//! The original ensemble logic conflated clustering, voting, and
//! boundary selection in one pass. Here each rule is a separate,
//! independently testable step:
//!
//! - [`overlap`]: character-offset IoU between two spans
//! - [`cluster`]: transitive connected-components grouping by IoU
//! - [`voter`]: weighted type vote and acceptance per cluster
//! - [`dedup`]: post-consensus merge of near-duplicate descriptions

pub mod cluster;
pub mod dedup;
pub mod overlap;
pub mod voter;

pub use cluster::cluster_indices;
pub use dedup::Deduplicator;
pub use overlap::overlap_ratio;
pub use voter::{ConsensusVoter, VoterConfig};
