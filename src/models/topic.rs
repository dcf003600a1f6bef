use std::fmt;

use serde::{Deserialize, Serialize};

/// A formal proposal for council action found in a unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Motion {
    /// Text of the unit the motion was found in
    pub source_text: String,
    /// Name of the member who moved, if captured
    pub mover: Option<String>,
    /// Name of the member who seconded, if captured
    pub seconder: Option<String>,
}

impl Motion {
    /// A motion is only worth recording if at least one name was captured
    pub fn is_empty(&self) -> bool {
        self.mover.is_none() && self.seconder.is_none()
    }

    /// A bare "seconded by X" with no mover in the same unit
    pub fn is_second_only(&self) -> bool {
        self.mover.is_none() && self.seconder.is_some()
    }
}

/// Keyword verdict of a vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteResult {
    Carries,
    Passes,
    Fails,
    Denied,
}

impl VoteResult {
    /// Parse a captured verdict keyword, case-insensitively
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "carries" => Some(Self::Carries),
            "passes" => Some(Self::Passes),
            "fails" => Some(Self::Fails),
            "denied" => Some(Self::Denied),
            _ => None,
        }
    }
}

impl fmt::Display for VoteResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Carries => "carries",
            Self::Passes => "passes",
            Self::Fails => "fails",
            Self::Denied => "denied",
        };
        write!(f, "{}", s)
    }
}

/// A vote tally or verdict found in a unit
///
/// Either the counts or the result are populated, depending on which vote
/// pattern matched first; they are never derived from each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub source_text: String,
    pub ayes_count: Option<u32>,
    pub nays_count: Option<u32>,
    pub result: Option<VoteResult>,
}

/// One discrete agenda topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    /// Ordinal of the first unit belonging to this topic
    pub start_ordinal: usize,
    /// Text of the opening unit (empty for topics opened implicitly)
    pub start_text: String,
    /// All unit texts of this topic joined by single spaces
    pub full_text: String,
    pub motions: Vec<Motion>,
    pub votes: Vec<Vote>,
    /// Segmentation quality heuristic in [0, 1]
    pub confidence: f64,
}

impl Topic {
    pub fn word_count(&self) -> usize {
        self.full_text.split_whitespace().count()
    }
}
