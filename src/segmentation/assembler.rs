use crate::models::{Motion, TextUnit, Topic, Vote, UNIT_SEPARATOR};

use super::classifier::{BoundaryClassifier, UnitVerdict};
use super::confidence::{score_topic, TopicEvidence};

/// A topic that is still accumulating units
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TopicDraft {
    pub start_ordinal: usize,
    pub start_text: String,
    pub full_text: String,
    pub motions: Vec<Motion>,
    pub votes: Vec<Vote>,
}

impl TopicDraft {
    /// An empty draft waiting for its first unit
    pub fn empty(start_ordinal: usize) -> Self {
        Self {
            start_ordinal,
            ..Default::default()
        }
    }

    /// A draft opened by a topic-starter unit
    pub fn opened_by(unit: &TextUnit) -> Self {
        Self {
            start_ordinal: unit.ordinal,
            start_text: unit.text.clone(),
            full_text: unit.text.clone(),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.full_text.is_empty()
    }

    fn push_text(&mut self, text: &str) {
        if !self.full_text.is_empty() {
            self.full_text.push(UNIT_SEPARATOR);
        }
        self.full_text.push_str(text);
    }

    /// Record a motion, folding a bare second into the preceding unseconded motion
    fn record_motion(&mut self, motion: Motion) {
        if motion.is_second_only() {
            if let Some(open) = self.motions.iter_mut().rev().find(|m| m.seconder.is_none()) {
                open.seconder = motion.seconder;
                open.source_text.push(UNIT_SEPARATOR);
                open.source_text.push_str(&motion.source_text);
                return;
            }
        }
        self.motions.push(motion);
    }

    /// Finalize confidence and turn the draft into a topic
    pub fn seal(self, classifier: &BoundaryClassifier) -> Topic {
        let evidence = TopicEvidence {
            opened_by_starter: classifier.is_topic_start(&self.start_text),
            has_motions: !self.motions.is_empty(),
            has_votes: !self.votes.is_empty(),
            word_count: self.full_text.split_whitespace().count(),
        };

        Topic {
            start_ordinal: self.start_ordinal,
            start_text: self.start_text,
            full_text: self.full_text,
            motions: self.motions,
            votes: self.votes,
            confidence: score_topic(&evidence),
        }
    }
}

/// State threaded through the fold over the unit stream
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblerState {
    pub current: TopicDraft,
    pub sealed: Vec<Topic>,
}

impl Default for AssemblerState {
    fn default() -> Self {
        Self {
            current: TopicDraft::empty(0),
            sealed: Vec::new(),
        }
    }
}

impl AssemblerState {
    /// Transition function: consume one classified unit
    pub fn advance(
        mut self,
        unit: &TextUnit,
        verdict: UnitVerdict,
        classifier: &BoundaryClassifier,
    ) -> Self {
        if verdict.starts_topic {
            let opened = TopicDraft::opened_by(unit);
            let previous = std::mem::replace(&mut self.current, opened);
            if !previous.is_empty() {
                self.sealed.push(previous.seal(classifier));
            }
        } else {
            self.current.push_text(&unit.text);
        }

        if let Some(motion) = verdict.motion {
            self.current.record_motion(motion);
        }
        if let Some(vote) = verdict.vote {
            self.current.votes.push(vote);
        }

        if verdict.ends_topic {
            let finished = std::mem::replace(&mut self.current, TopicDraft::empty(unit.ordinal + 1));
            self.sealed.push(finished.seal(classifier));
        }

        self
    }

    /// Seal whatever is left at stream end
    pub fn finish(mut self, classifier: &BoundaryClassifier) -> Vec<Topic> {
        if !self.current.is_empty() {
            self.sealed.push(self.current.seal(classifier));
        }
        self.sealed
    }
}

/// Build the ordered topic sequence for a unit stream
pub fn assemble_topics(units: &[TextUnit], classifier: &BoundaryClassifier) -> Vec<Topic> {
    units
        .iter()
        .fold(AssemblerState::default(), |state, unit| {
            state.advance(unit, classifier.classify(unit), classifier)
        })
        .finish(classifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VoteResult;
    use crate::segmentation::{CompiledPatterns, PatternConfig, Splitter, SplitterConfig};

    fn classifier() -> BoundaryClassifier {
        BoundaryClassifier::new(CompiledPatterns::compile(&PatternConfig::default()).unwrap())
    }

    fn units(text: &str) -> Vec<TextUnit> {
        Splitter::new(&SplitterConfig::default()).unwrap().split(text)
    }

    fn verdict(starts: bool, ends: bool) -> UnitVerdict {
        UnitVerdict {
            starts_topic: starts,
            ends_topic: ends,
            motion: None,
            vote: None,
        }
    }

    #[test]
    fn test_advance_appends_plain_unit() {
        let c = classifier();
        let state = AssemblerState::default()
            .advance(&TextUnit::new(0, "Good evening."), verdict(false, false), &c)
            .advance(&TextUnit::new(1, "Welcome."), verdict(false, false), &c);
        assert!(state.sealed.is_empty());
        assert_eq!(state.current.full_text, "Good evening. Welcome.");
        assert_eq!(state.current.start_text, "");
    }

    #[test]
    fn test_advance_start_seals_non_empty_topic() {
        let c = classifier();
        let state = AssemblerState::default()
            .advance(&TextUnit::new(0, "Good evening."), verdict(false, false), &c)
            .advance(&TextUnit::new(1, "Item 2."), verdict(true, false), &c);
        assert_eq!(state.sealed.len(), 1);
        assert_eq!(state.sealed[0].full_text, "Good evening.");
        assert_eq!(state.current.start_ordinal, 1);
        assert_eq!(state.current.start_text, "Item 2.");
    }

    #[test]
    fn test_advance_start_on_empty_topic_does_not_seal() {
        let c = classifier();
        let state =
            AssemblerState::default().advance(&TextUnit::new(0, "Item 1."), verdict(true, false), &c);
        assert!(state.sealed.is_empty());
        assert_eq!(state.current.full_text, "Item 1.");
    }

    #[test]
    fn test_advance_end_opens_fresh_topic() {
        let c = classifier();
        let state = AssemblerState::default()
            .advance(&TextUnit::new(0, "Motion carries."), verdict(false, true), &c);
        assert_eq!(state.sealed.len(), 1);
        assert!(state.current.is_empty());
        assert_eq!(state.current.start_ordinal, 1);
    }

    #[test]
    fn test_second_folds_into_open_motion() {
        let mut draft = TopicDraft::empty(0);
        draft.record_motion(Motion {
            source_text: "Lee moves approval.".to_string(),
            mover: Some("Lee".to_string()),
            seconder: None,
        });
        draft.record_motion(Motion {
            source_text: "Seconded by Park.".to_string(),
            mover: None,
            seconder: Some("Park".to_string()),
        });
        assert_eq!(draft.motions.len(), 1);
        assert_eq!(draft.motions[0].seconder.as_deref(), Some("Park"));
        assert_eq!(draft.motions[0].source_text, "Lee moves approval. Seconded by Park.");
    }

    #[test]
    fn test_second_without_motion_is_kept() {
        let mut draft = TopicDraft::empty(0);
        draft.record_motion(Motion {
            source_text: "Second by Park.".to_string(),
            mover: None,
            seconder: Some("Park".to_string()),
        });
        assert_eq!(draft.motions.len(), 1);
        assert!(draft.motions[0].is_second_only());
    }

    #[test]
    fn test_agenda_scenario() {
        let c = classifier();
        let units = units(
            "Item number 3 is a resolution. John Smith moves the resolution. \
             Seconded by Jane Doe. Motion carries. Item number 4 is next.",
        );
        assert_eq!(units.len(), 5);

        let topics = assemble_topics(&units, &c);
        assert_eq!(topics.len(), 2);

        let first = &topics[0];
        assert_eq!(first.start_ordinal, 0);
        assert_eq!(first.start_text, "Item number 3 is a resolution.");
        assert_eq!(
            first.full_text,
            "Item number 3 is a resolution. John Smith moves the resolution. \
             Seconded by Jane Doe. Motion carries."
        );
        assert_eq!(first.motions.len(), 1);
        assert_eq!(first.motions[0].mover.as_deref(), Some("John Smith"));
        assert_eq!(first.motions[0].seconder.as_deref(), Some("Jane Doe"));
        assert_eq!(first.votes.len(), 1);
        assert_eq!(first.votes[0].result, Some(VoteResult::Carries));
        assert!((first.confidence - 0.8).abs() < 1e-9);

        let second = &topics[1];
        assert_eq!(second.start_ordinal, 4);
        assert_eq!(second.start_text, "Item number 4 is next.");
        assert!(second.motions.is_empty());
    }

    #[test]
    fn test_patternless_transcript_is_one_low_confidence_topic() {
        let c = classifier();
        let text = "Good evening everyone. Thanks for joining us. The weather was lovely today. \
                    We appreciate the staff.";
        let topics = assemble_topics(&units(text), &c);
        assert_eq!(topics.len(), 1);
        assert!(topics[0].confidence <= 0.2);
        assert_eq!(topics[0].start_text, "");
    }

    #[test]
    fn test_empty_stream_yields_no_topics() {
        assert!(assemble_topics(&[], &classifier()).is_empty());
    }

    #[test]
    fn test_topics_reconstruct_unit_stream() {
        let c = classifier();
        let text = "Call to order. Public comment is open. Resident asked about parking. \
                    That concludes public comment. Next item is the budget. Vote: 5 ayes, 2 nays. \
                    Old business follows. Nothing further.";
        let units = units(text);
        let topics = assemble_topics(&units, &c);

        let rebuilt = topics
            .iter()
            .map(|t| t.full_text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(rebuilt, crate::models::join_units(&units));
        assert!(topics.iter().all(|t| (0.0..=1.0).contains(&t.confidence)));
    }
}
