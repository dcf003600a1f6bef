pub mod assembler;
pub mod classifier;
pub mod confidence;
pub mod patterns;
pub mod splitter;

pub use assembler::*;
pub use classifier::*;
pub use confidence::*;
pub use patterns::*;
pub use splitter::*;

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PatternError;
use crate::models::{TextUnit, Topic};

/// Configuration for a segmenter: one jurisdiction's agenda conventions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    pub patterns: PatternConfig,
    pub splitter: SplitterConfig,
}

impl SegmenterConfig {
    /// Load a configuration from a JSON file; missing sections keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read pattern config: {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse pattern config: {:?}", path))
    }
}

/// Rule-based topic segmenter
///
/// Holds one compiled configuration; several segmenters with different
/// conventions can coexist.
#[derive(Debug, Clone)]
pub struct Segmenter {
    splitter: Splitter,
    classifier: BoundaryClassifier,
}

impl Segmenter {
    pub fn new(config: &SegmenterConfig) -> Result<Self, PatternError> {
        Ok(Self {
            splitter: Splitter::new(&config.splitter)?,
            classifier: BoundaryClassifier::new(CompiledPatterns::compile(&config.patterns)?),
        })
    }

    pub fn classifier(&self) -> &BoundaryClassifier {
        &self.classifier
    }

    /// Break a transcript into text units
    pub fn split(&self, transcript: &str) -> Vec<TextUnit> {
        self.splitter.split(transcript)
    }

    /// Segment a transcript into topics
    ///
    /// An empty transcript yields no topics; a non-empty one yields at least one.
    pub fn segment(&self, transcript: &str) -> Vec<Topic> {
        let units = self.split(transcript);
        let topics = assemble_topics(&units, &self.classifier);
        debug!("Segmented {} units into {} topics", units.len(), topics.len());
        topics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segmenter() -> Segmenter {
        Segmenter::new(&SegmenterConfig::default()).unwrap()
    }

    #[test]
    fn test_segment_empty_transcript() {
        assert!(segmenter().segment("").is_empty());
        assert!(segmenter().segment(" \n ").is_empty());
    }

    #[test]
    fn test_segment_unpunctuated_transcript() {
        let topics = segmenter().segment("no punctuation at all just words");
        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].full_text, "no punctuation at all just words");
    }

    #[test]
    fn test_custom_config_coexists_with_default() {
        let mut config = SegmenterConfig::default();
        config.patterns.topic_starters = vec![r"(?i)punto\s+\d+".to_string()];
        let custom = Segmenter::new(&config).unwrap();
        let default = segmenter();

        let text = "Punto 1 del orden. Item 2 follows.";
        assert!(custom.classifier().is_topic_start("Punto 1 del orden."));
        assert!(!custom.classifier().is_topic_start("Item 2 follows."));
        assert!(default.classifier().is_topic_start("Item 2 follows."));
        assert_eq!(custom.segment(text).len(), 1);
        assert_eq!(default.segment(text).len(), 2);
    }

    #[test]
    fn test_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patterns.json");
        std::fs::write(&path, r#"{"splitter": {"abbreviations": ["cllr"]}}"#).unwrap();

        let config = SegmenterConfig::from_file(&path).unwrap();
        assert_eq!(config.splitter.abbreviations, vec!["cllr"]);
        assert_eq!(config.patterns, PatternConfig::default());
    }

    #[test]
    fn test_invalid_config_fails_construction() {
        let mut config = SegmenterConfig::default();
        config.patterns.topic_enders.push("[".to_string());
        assert!(Segmenter::new(&config).is_err());
    }
}
