use crate::models::{Motion, TextUnit, Vote};

use super::patterns::{first_capture, CompiledPatterns, VoteCapture};

/// Everything the classifier knows about one unit
#[derive(Debug, Clone, PartialEq)]
pub struct UnitVerdict {
    pub starts_topic: bool,
    pub ends_topic: bool,
    pub motion: Option<Motion>,
    pub vote: Option<Vote>,
}

/// Applies the compiled pattern families to individual units
#[derive(Debug, Clone)]
pub struct BoundaryClassifier {
    patterns: CompiledPatterns,
}

impl BoundaryClassifier {
    pub fn new(patterns: CompiledPatterns) -> Self {
        Self { patterns }
    }

    /// True if any topic-starter pattern matches anywhere in the text
    pub fn is_topic_start(&self, text: &str) -> bool {
        self.patterns.topic_starters.is_match(text)
    }

    /// True if any topic-ender pattern matches anywhere in the text
    pub fn is_topic_end(&self, text: &str) -> bool {
        self.patterns.topic_enders.is_match(text)
    }

    /// Extract mover and seconder independently, first match wins per field
    ///
    /// Returns `None` when neither name was captured.
    pub fn extract_motion(&self, text: &str) -> Option<Motion> {
        let motion = Motion {
            source_text: text.to_string(),
            mover: first_capture(&self.patterns.movers, text),
            seconder: first_capture(&self.patterns.seconders, text),
        };
        (!motion.is_empty()).then_some(motion)
    }

    /// Extract a vote from the first vote pattern that matches
    pub fn extract_vote(&self, text: &str) -> Option<Vote> {
        let capture = first_capture(&self.patterns.votes, text)?;
        let mut vote = Vote {
            source_text: text.to_string(),
            ayes_count: None,
            nays_count: None,
            result: None,
        };
        match capture {
            VoteCapture::Tally { ayes, nays } => {
                vote.ayes_count = Some(ayes);
                vote.nays_count = Some(nays);
            }
            VoteCapture::Verdict(result) => vote.result = Some(result),
        }
        Some(vote)
    }

    pub fn classify(&self, unit: &TextUnit) -> UnitVerdict {
        UnitVerdict {
            starts_topic: self.is_topic_start(&unit.text),
            ends_topic: self.is_topic_end(&unit.text),
            motion: self.extract_motion(&unit.text),
            vote: self.extract_vote(&unit.text),
        }
    }
}
