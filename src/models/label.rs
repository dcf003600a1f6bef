use serde::{Deserialize, Serialize};

/// A hypothesized topic boundary awaiting human confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryCandidate {
    /// Ordinal of the unit that matched a topic-starter pattern
    pub unit_ordinal: usize,
    /// Char offset of that unit in the normalized transcript
    pub char_index: usize,
}

/// A human verdict on one boundary candidate
///
/// Keyed by `(transcript_id, char_index)`; never mutated once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryLabel {
    pub transcript_id: String,
    pub char_index: usize,
    /// `true` if the human confirmed the boundary
    pub label: bool,
    /// The rendered context the human was shown
    pub context_snippet: String,
    /// Labeling session that produced this row
    pub session_id: String,
    /// RFC 3339 timestamp of the decision
    pub labeled_at: String,
}

/// A transcript in the labeling backlog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptRecord {
    pub transcript_id: String,
    pub title: Option<String>,
    pub date: Option<String>,
    pub text: String,
}
