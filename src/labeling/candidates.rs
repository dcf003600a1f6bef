use crate::models::{join_units, BoundaryCandidate};
use crate::segmentation::Segmenter;

/// Boundary candidates for one transcript, with the text their offsets index into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSet {
    /// Units joined by the splitter's separator: the whitespace-normalized transcript
    pub text: String,
    pub candidates: Vec<BoundaryCandidate>,
}

impl CandidateSet {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }
}

/// Replay the splitter and record the char offset of every topic-starter unit
///
/// Offsets sum the char length of every preceding unit plus one separator per
/// boundary, matching how units are joined.
pub fn generate_candidates(segmenter: &Segmenter, transcript: &str) -> CandidateSet {
    let units = segmenter.split(transcript);
    let mut candidates = Vec::new();
    let mut position = 0;
    for unit in &units {
        if segmenter.classifier().is_topic_start(&unit.text) {
            candidates.push(BoundaryCandidate {
                unit_ordinal: unit.ordinal,
                char_index: position,
            });
        }
        // One separator char between consecutive units
        position += unit.char_len() + 1;
    }

    CandidateSet {
        text: join_units(&units),
        candidates,
    }
}
