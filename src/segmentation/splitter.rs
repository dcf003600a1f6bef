use regex::Regex;
use serde::{Deserialize, Serialize};

use super::patterns::compile;
use crate::error::PatternError;
use crate::models::TextUnit;

const RUN_ON_BOUNDARY: &str = r"[.?!]\s+[A-Z]";

/// Configuration for breaking transcripts into text units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitterConfig {
    /// Lowercase abbreviations (without the trailing period) that do not end a sentence
    pub abbreviations: Vec<String>,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            abbreviations: [
                "mr", "mrs", "ms", "dr", "st", "no", "nos", "vs", "etc", "jr", "sr", "inc",
                "ave", "approx", "dept", "sec", "vol", "e.g", "i.e",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Splits raw transcript text into sentence-sized units
#[derive(Debug, Clone)]
pub struct Splitter {
    abbreviations: Vec<String>,
    run_on_boundary: Regex,
}

impl Splitter {
    pub fn new(config: &SplitterConfig) -> Result<Self, PatternError> {
        Ok(Self {
            abbreviations: config
                .abbreviations
                .iter()
                .map(|a| a.to_lowercase())
                .collect(),
            run_on_boundary: compile("sentence boundary", RUN_ON_BOUNDARY)?,
        })
    }

    /// Split a transcript into ordered, non-empty units
    ///
    /// 1. Collapse whitespace runs to single spaces and trim
    /// 2. Tokenize into sentences at terminal punctuation followed by a
    ///    capitalized word, digit or opening quote, except after abbreviations
    ///    and single-letter initials
    /// 3. Split each sentence again at `<.?!><space><capital>` to catch run-ons
    ///
    /// Joining the units with single spaces reproduces the normalized text.
    pub fn split(&self, transcript: &str) -> Vec<TextUnit> {
        let normalized = normalize_whitespace(transcript);

        self.sentences(&normalized)
            .into_iter()
            .flat_map(|sentence| self.split_run_ons(sentence))
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .enumerate()
            .map(|(ordinal, text)| TextUnit::new(ordinal, text))
            .collect()
    }

    fn sentences<'a>(&self, normalized: &'a str) -> Vec<&'a str> {
        let mut sentences = Vec::new();
        let mut start = 0;
        let mut words = normalized.match_indices(' ').peekable();
        let mut word_start = 0;

        while let Some((space, _)) = words.next() {
            let word = &normalized[word_start..space];
            let next_start = space + 1;
            let next_end = words.peek().map(|(i, _)| *i).unwrap_or(normalized.len());
            let next_word = &normalized[next_start..next_end];

            if self.ends_sentence(word, next_word) {
                sentences.push(&normalized[start..space]);
                start = next_start;
            }
            word_start = next_start;
        }

        if start < normalized.len() {
            sentences.push(&normalized[start..]);
        }
        sentences
    }

    fn ends_sentence(&self, word: &str, next_word: &str) -> bool {
        let core = word.trim_end_matches(is_closing);
        let Some(last) = core.chars().last() else {
            return false;
        };
        if !matches!(last, '.' | '?' | '!') {
            return false;
        }

        let opens_sentence = next_word
            .trim_start_matches(is_opening)
            .chars()
            .next()
            .is_some_and(|c| c.is_uppercase() || c.is_ascii_digit());
        if !opens_sentence {
            return false;
        }

        if last == '.' {
            let stem = core.trim_end_matches('.').trim_start_matches(is_opening);
            if self.is_abbreviation(stem) || is_initial(stem) {
                return false;
            }
        }
        true
    }

    fn is_abbreviation(&self, stem: &str) -> bool {
        let stem = stem.to_lowercase();
        self.abbreviations.iter().any(|a| *a == stem)
    }

    fn split_run_ons<'a>(&self, sentence: &'a str) -> Vec<&'a str> {
        let mut parts = Vec::new();
        let mut start = 0;

        for m in self.run_on_boundary.find_iter(sentence) {
            // Punctuation stays on the left, the capital starts the right part
            parts.push(&sentence[start..m.start() + 1]);
            start = m.end() - 1;
        }
        parts.push(&sentence[start..]);
        parts
    }
}

/// Collapse all whitespace runs into single spaces and trim the ends
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_closing(c: char) -> bool {
    matches!(c, '"' | '\'' | ')' | ']' | '”' | '’')
}

fn is_opening(c: char) -> bool {
    matches!(c, '"' | '\'' | '(' | '[' | '“' | '‘')
}

fn is_initial(stem: &str) -> bool {
    let mut chars = stem.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_uppercase())
}
