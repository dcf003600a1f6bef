use regex::{Regex, RegexSet};
use serde::{Deserialize, Serialize};

use crate::error::PatternError;
use crate::models::VoteResult;

/// Named capture group holding a member name in motion and second patterns
pub const NAME_GROUP: &str = "name";
const AYES_GROUP: &str = "ayes";
const NAYS_GROUP: &str = "nays";
const RESULT_GROUP: &str = "result";

// Names are matched case-sensitively so lowercase words are never captured as
// names; trigger phrases carry their own (?i:...) flag.
const NAME: &str = r"(?P<name>[A-Z][a-z]+(?:\s+[A-Z][a-z]+)?)";

/// A vote pattern and the shape of the value it captures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum VotePattern {
    /// Captures `ayes` and `nays` counts
    Tally { pattern: String },
    /// Captures a `result` keyword
    Verdict { pattern: String },
}

/// Raw pattern sources for every classifier family
///
/// Order matters for `movers`, `seconders` and `votes`: the first pattern that
/// matches a unit wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    pub topic_starters: Vec<String>,
    pub topic_enders: Vec<String>,
    pub movers: Vec<String>,
    pub seconders: Vec<String>,
    pub votes: Vec<VotePattern>,
}

impl Default for PatternConfig {
    fn default() -> Self {
        let owned = |patterns: &[&str]| -> Vec<String> {
            patterns.iter().map(|p| p.to_string()).collect()
        };

        Self {
            topic_starters: owned(&[
                // Agenda numbering
                r"(?i)(?:agenda\s+)?item\s+(?:number\s+)?(?:#?\d+|[a-z])",
                r"(?i)number\s+\d+",
                // Legislation numbering
                r"(?i)ordinance\s+(?:number\s+)?#?\d+[-\w]*",
                r"(?i)resolution\s+(?:number\s+)?#?\d+[-\w]*",
                r"(?i)bill\s+(?:number\s+)?#?\d+[-\w]*",
                // Meeting segments
                r"(?i)public\s+hearing",
                r"(?i)public\s+comment",
                r"(?i)citizen\s+comments?",
                r"(?i)old\s+business",
                r"(?i)new\s+business",
                // Transitions
                r"(?i)moving\s+(?:on\s+)?to",
                r"(?i)next\s+(?:item|order\s+of\s+business)",
                r"(?i)let's\s+move\s+to",
                r"(?i)turning\s+(?:our\s+attention\s+)?to",
                // Action items
                r"(?i)consideration\s+of",
                r"(?i)discussion\s+(?:regarding|concerning|about)",
                r"(?i)presentation\s+(?:on|regarding|about)",
            ]),
            topic_enders: owned(&[
                r"(?i)motion\s+(?:carries|passed|approved|denied|fails)",
                r"(?i)vote\s+results?:?",
                r"(?i)the\s+(?:motion|resolution|ordinance)\s+(?:is|was)\s+(?:approved|passed|adopted|denied)",
                r"(?i)all\s+(?:those\s+)?in\s+favor\s+say\s+aye",
                r"(?i)the\s+ayes\s+have\s+it",
                r"(?i)moving\s+on\s+to\s+(?:the\s+)?next",
                r"(?i)that\s+concludes",
                r"(?i)next\s+item",
                r"(?i)this\s+concludes\s+(?:the|our)",
                r"(?i)end\s+of\s+(?:discussion|presentation)",
            ]),
            movers: vec![
                format!(r"^{NAME}\s+(?i:moves?)"),
                format!(r"(?i:motion\s+by)\s+{NAME}"),
                format!(r"(?i:moved\s+by)\s+{NAME}"),
            ],
            seconders: vec![
                format!(r"(?i:seconded\s+by)\s+{NAME}"),
                format!(r"(?i:second\s+(?:by|from))\s+{NAME}"),
            ],
            votes: vec![
                VotePattern::Tally {
                    pattern: r"(?i)vote:\s*(?P<ayes>\d+)\s*ayes?,\s*(?P<nays>\d+)\s*nays?".to_string(),
                },
                VotePattern::Tally {
                    pattern: r"(?i)(?P<ayes>\d+)\s*in\s*favor,\s*(?P<nays>\d+)\s*opposed".to_string(),
                },
                VotePattern::Verdict {
                    pattern: r"(?i)motion\s+(?P<result>carries|passes|fails|denied)".to_string(),
                },
            ],
        }
    }
}

/// A typed matcher: one compiled rule producing an optional captured value
pub trait Matcher {
    type Capture;

    fn capture(&self, text: &str) -> Option<Self::Capture>;
}

/// Try matchers in order and return the capture of the first one that fires
pub fn first_capture<M: Matcher>(matchers: &[M], text: &str) -> Option<M::Capture> {
    matchers.iter().find_map(|m| m.capture(text))
}

/// Captures a member name from a motion or second phrase
#[derive(Debug, Clone)]
pub struct NameMatcher {
    regex: Regex,
}

impl Matcher for NameMatcher {
    type Capture = String;

    fn capture(&self, text: &str) -> Option<String> {
        self.regex
            .captures(text)
            .and_then(|caps| caps.name(NAME_GROUP))
            .map(|m| m.as_str().to_string())
    }
}

/// Value captured by a vote matcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteCapture {
    Tally { ayes: u32, nays: u32 },
    Verdict(VoteResult),
}

#[derive(Debug, Clone)]
pub enum VoteMatcher {
    Tally(Regex),
    Verdict(Regex),
}

impl Matcher for VoteMatcher {
    type Capture = VoteCapture;

    fn capture(&self, text: &str) -> Option<VoteCapture> {
        match self {
            Self::Tally(regex) => {
                let caps = regex.captures(text)?;
                let ayes = caps.name(AYES_GROUP)?.as_str().parse().ok()?;
                let nays = caps.name(NAYS_GROUP)?.as_str().parse().ok()?;
                Some(VoteCapture::Tally { ayes, nays })
            }
            Self::Verdict(regex) => {
                let caps = regex.captures(text)?;
                VoteResult::from_keyword(caps.name(RESULT_GROUP)?.as_str()).map(VoteCapture::Verdict)
            }
        }
    }
}

/// Immutable, compiled form of a `PatternConfig`
#[derive(Debug, Clone)]
pub struct CompiledPatterns {
    pub topic_starters: RegexSet,
    pub topic_enders: RegexSet,
    pub movers: Vec<NameMatcher>,
    pub seconders: Vec<NameMatcher>,
    pub votes: Vec<VoteMatcher>,
}

impl CompiledPatterns {
    pub fn compile(config: &PatternConfig) -> Result<Self, PatternError> {
        Ok(Self {
            topic_starters: compile_set("topic starter", &config.topic_starters)?,
            topic_enders: compile_set("topic ender", &config.topic_enders)?,
            movers: compile_names("motion", &config.movers)?,
            seconders: compile_names("second", &config.seconders)?,
            votes: config
                .votes
                .iter()
                .map(compile_vote)
                .collect::<Result<_, _>>()?,
        })
    }
}

pub(crate) fn compile(family: &'static str, pattern: &str) -> Result<Regex, PatternError> {
    Regex::new(pattern).map_err(|source| PatternError::Invalid {
        family,
        pattern: pattern.to_string(),
        source,
    })
}

fn require_group(
    family: &'static str,
    regex: &Regex,
    group: &'static str,
) -> Result<(), PatternError> {
    if regex.capture_names().flatten().any(|name| name == group) {
        Ok(())
    } else {
        Err(PatternError::MissingGroup {
            family,
            pattern: regex.as_str().to_string(),
            group,
        })
    }
}

fn compile_set(family: &'static str, patterns: &[String]) -> Result<RegexSet, PatternError> {
    // Compile individually first so a failure names the offending pattern
    for pattern in patterns {
        compile(family, pattern)?;
    }
    RegexSet::new(patterns).map_err(|source| PatternError::Invalid {
        family,
        pattern: patterns.join(" | "),
        source,
    })
}

fn compile_names(
    family: &'static str,
    patterns: &[String],
) -> Result<Vec<NameMatcher>, PatternError> {
    patterns
        .iter()
        .map(|pattern| {
            let regex = compile(family, pattern)?;
            require_group(family, &regex, NAME_GROUP)?;
            Ok(NameMatcher { regex })
        })
        .collect()
}

fn compile_vote(pattern: &VotePattern) -> Result<VoteMatcher, PatternError> {
    match pattern {
        VotePattern::Tally { pattern } => {
            let regex = compile("vote tally", pattern)?;
            require_group("vote tally", &regex, AYES_GROUP)?;
            require_group("vote tally", &regex, NAYS_GROUP)?;
            Ok(VoteMatcher::Tally(regex))
        }
        VotePattern::Verdict { pattern } => {
            let regex = compile("vote verdict", pattern)?;
            require_group("vote verdict", &regex, RESULT_GROUP)?;
            Ok(VoteMatcher::Verdict(regex))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compiled() -> CompiledPatterns {
        CompiledPatterns::compile(&PatternConfig::default()).unwrap()
    }

    #[test]
    fn test_default_config_compiles() {
        let patterns = compiled();
        assert_eq!(patterns.movers.len(), 3);
        assert_eq!(patterns.seconders.len(), 2);
        assert_eq!(patterns.votes.len(), 3);
    }

    #[test]
    fn test_first_capture_respects_order() {
        let patterns = compiled();
        // Both the leading-name rule and "moved by" could fire; the first listed wins
        let text = "Adams moves the item, as moved by Baker earlier.";
        assert_eq!(first_capture(&patterns.movers, text), Some("Adams".to_string()));
    }

    #[test]
    fn test_name_capture_is_case_sensitive() {
        let patterns = compiled();
        assert_eq!(first_capture(&patterns.movers, "motion by the chair."), None);
        assert_eq!(
            first_capture(&patterns.movers, "MOTION BY Lee Park."),
            Some("Lee Park".to_string())
        );
    }

    #[test]
    fn test_vote_capture_shapes() {
        let patterns = compiled();
        assert_eq!(
            first_capture(&patterns.votes, "Vote: 5 ayes, 2 nays."),
            Some(VoteCapture::Tally { ayes: 5, nays: 2 })
        );
        assert_eq!(
            first_capture(&patterns.votes, "The motion FAILS."),
            Some(VoteCapture::Verdict(VoteResult::Fails))
        );
        assert_eq!(first_capture(&patterns.votes, "No vote was taken."), None);
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let config = PatternConfig {
            topic_starters: vec!["(unclosed".to_string()],
            ..Default::default()
        };
        let err = CompiledPatterns::compile(&config).unwrap_err();
        assert!(matches!(err, PatternError::Invalid { family: "topic starter", .. }));
    }

    #[test]
    fn test_missing_group_is_reported() {
        let config = PatternConfig {
            movers: vec![r"(?i)motion\s+by\s+\w+".to_string()],
            ..Default::default()
        };
        let err = CompiledPatterns::compile(&config).unwrap_err();
        assert!(matches!(err, PatternError::MissingGroup { group: "name", .. }));
    }

    #[test]
    fn test_vote_pattern_json_shape() {
        let json = r#"{"votes": [{"kind": "verdict", "pattern": "(?i)motion\\s+(?P<result>passes)"}]}"#;
        let config: PatternConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.votes.len(), 1);
        // Families absent from the file keep their defaults
        assert_eq!(config.topic_starters, PatternConfig::default().topic_starters);
    }
}
