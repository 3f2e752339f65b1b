//! Visual description categories
//!
//! The closed set of things an engine can describe: where a scene takes
//! place, who is in it, how it feels, what is in it, and what happens.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a visual description span.
///
/// Carries a fixed priority order used in two places:
/// - vote tie-breaking when two kinds gather equal weight in a cluster
///   (`Location > Character > Atmosphere > Object > Action`)
/// - the base weight for `priority_score`, which ranks descriptions for
///   downstream image generation
///
/// # Example
///
/// ```
/// use vignette_domain::SpanKind;
///
/// assert!(SpanKind::Location.vote_priority() > SpanKind::Action.vote_priority());
/// assert_eq!("character".parse::<SpanKind>().ok(), Some(SpanKind::Character));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanKind {
    /// Where the scene takes place
    Location,
    /// A person or creature present in the scene
    Character,
    /// Mood, weather, light
    Atmosphere,
    /// A notable physical object
    Object,
    /// Something happening
    Action,
}

impl SpanKind {
    /// All kinds in descending vote priority order.
    pub const ALL: [SpanKind; 5] = [
        SpanKind::Location,
        SpanKind::Character,
        SpanKind::Atmosphere,
        SpanKind::Object,
        SpanKind::Action,
    ];

    /// Tie-break rank for cluster voting (higher wins).
    pub fn vote_priority(&self) -> u8 {
        match self {
            SpanKind::Location => 4,
            SpanKind::Character => 3,
            SpanKind::Atmosphere => 2,
            SpanKind::Object => 1,
            SpanKind::Action => 0,
        }
    }

    /// Base weight for deriving a description's priority score.
    pub fn priority_weight(&self) -> f64 {
        match self {
            SpanKind::Location => 1.0,
            SpanKind::Character => 0.9,
            SpanKind::Atmosphere => 0.7,
            SpanKind::Object => 0.6,
            SpanKind::Action => 0.5,
        }
    }
}

impl fmt::Display for SpanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpanKind::Location => write!(f, "location"),
            SpanKind::Character => write!(f, "character"),
            SpanKind::Atmosphere => write!(f, "atmosphere"),
            SpanKind::Object => write!(f, "object"),
            SpanKind::Action => write!(f, "action"),
        }
    }
}

impl std::str::FromStr for SpanKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "location" | "loc" => Ok(SpanKind::Location),
            "character" | "char" => Ok(SpanKind::Character),
            "atmosphere" | "atmo" => Ok(SpanKind::Atmosphere),
            "object" | "obj" => Ok(SpanKind::Object),
            "action" | "act" => Ok(SpanKind::Action),
            _ => Err(format!(
                "Unknown span kind: {}. Valid: location, character, atmosphere, object, action",
                s
            )),
        }
    }
}
