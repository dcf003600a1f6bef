/// Bonus when the topic opened on a unit matching a topic-starter pattern
pub const STARTER_BONUS: f64 = 0.4;
/// Bonus when at least one motion was recorded
pub const MOTION_BONUS: f64 = 0.3;
/// Bonus when at least one vote was recorded
pub const VOTE_BONUS: f64 = 0.3;
/// Bonus for a topic of typical length
pub const LENGTH_BONUS: f64 = 0.2;
/// Penalty for a topic that is too short or too long
pub const LENGTH_PENALTY: f64 = 0.2;

/// Word count range that earns the length bonus (inclusive)
pub const TYPICAL_WORDS: (usize, usize) = (50, 1000);
/// Below this many words the length penalty applies
pub const MIN_WORDS: usize = 20;
/// Above this many words the length penalty applies
pub const MAX_WORDS: usize = 2000;

/// Evidence the confidence score is computed from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicEvidence {
    pub opened_by_starter: bool,
    pub has_motions: bool,
    pub has_votes: bool,
    pub word_count: usize,
}

/// Score how well-formed a topic looks, clamped to [0, 1]
pub fn score_topic(evidence: &TopicEvidence) -> f64 {
    let mut confidence = 0.0;

    if evidence.opened_by_starter {
        confidence += STARTER_BONUS;
    }
    if evidence.has_motions {
        confidence += MOTION_BONUS;
    }
    if evidence.has_votes {
        confidence += VOTE_BONUS;
    }

    let words = evidence.word_count;
    if (TYPICAL_WORDS.0..=TYPICAL_WORDS.1).contains(&words) {
        confidence += LENGTH_BONUS;
    } else if words < MIN_WORDS || words > MAX_WORDS {
        confidence -= LENGTH_PENALTY;
    }

    confidence.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evidence(starter: bool, motions: bool, votes: bool, word_count: usize) -> TopicEvidence {
        TopicEvidence {
            opened_by_starter: starter,
            has_motions: motions,
            has_votes: votes,
            word_count,
        }
    }

    #[test]
    fn test_full_evidence_is_clamped() {
        assert_eq!(score_topic(&evidence(true, true, true, 200)), 1.0);
    }

    #[test]
    fn test_short_patternless_topic_floors_at_zero() {
        assert_eq!(score_topic(&evidence(false, false, false, 5)), 0.0);
    }

    #[test]
    fn test_length_bands() {
        assert!((score_topic(&evidence(false, false, false, 50)) - 0.2).abs() < 1e-9);
        assert!((score_topic(&evidence(false, false, false, 1000)) - 0.2).abs() < 1e-9);
        // Between the bands: neither bonus nor penalty
        assert_eq!(score_topic(&evidence(false, false, false, 30)), 0.0);
        assert!((score_topic(&evidence(true, false, false, 1500)) - 0.4).abs() < 1e-9);
        assert!((score_topic(&evidence(true, false, false, 2500)) - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_starter_motion_vote_short_topic() {
        let score = score_topic(&evidence(true, true, true, 12));
        assert!((score - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_always_in_unit_interval() {
        for starter in [false, true] {
            for motions in [false, true] {
                for votes in [false, true] {
                    for words in [0, 19, 20, 49, 50, 1000, 1001, 2000, 2001, 10_000] {
                        let score = score_topic(&evidence(starter, motions, votes, words));
                        assert!((0.0..=1.0).contains(&score));
                    }
                }
            }
        }
    }
}
