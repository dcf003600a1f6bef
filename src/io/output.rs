use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::models::Topic;

/// Machine-readable segmentation output
#[derive(Debug, Clone, Serialize)]
pub struct TopicReport {
    pub topics: Vec<Topic>,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub total_units: usize,
    pub total_topics: usize,
    pub total_motions: usize,
    pub total_votes: usize,
    pub mean_confidence: f64,
}

impl TopicReport {
    pub fn new(topics: Vec<Topic>, total_units: usize) -> Self {
        let mean_confidence = if topics.is_empty() {
            0.0
        } else {
            topics.iter().map(|t| t.confidence).sum::<f64>() / topics.len() as f64
        };

        let metadata = ReportMetadata {
            total_units,
            total_topics: topics.len(),
            total_motions: topics.iter().map(|t| t.motions.len()).sum(),
            total_votes: topics.iter().map(|t| t.votes.len()).sum(),
            mean_confidence,
        };

        Self { topics, metadata }
    }

    /// Write to a JSON file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        serde_json::to_writer_pretty(file, self).context("Failed to write JSON")?;
        Ok(())
    }
}

/// Human-readable topic listing
pub struct HumanReport<'a> {
    topics: &'a [Topic],
}

impl<'a> HumanReport<'a> {
    pub fn new(topics: &'a [Topic]) -> Self {
        Self { topics }
    }

    pub fn format(&self) -> String {
        let mut output = String::new();

        for (i, topic) in self.topics.iter().enumerate() {
            output.push_str(&format!(
                "Topic {} (unit {}, confidence {:.2}, {} words)\n",
                i + 1,
                topic.start_ordinal,
                topic.confidence,
                topic.word_count()
            ));

            for motion in &topic.motions {
                output.push_str(&format!(
                    "  Motion: mover={} seconder={}\n",
                    motion.mover.as_deref().unwrap_or("?"),
                    motion.seconder.as_deref().unwrap_or("?")
                ));
                push_wrapped(&mut output, &motion.source_text, SOURCE_INDENT);
            }
            for vote in &topic.votes {
                let outcome = match (vote.ayes_count, vote.nays_count, vote.result) {
                    (Some(ayes), Some(nays), _) => format!("{}-{}", ayes, nays),
                    (_, _, Some(result)) => result.to_string(),
                    _ => "?".to_string(),
                };
                output.push_str(&format!("  Vote: {}\n", outcome));
                push_wrapped(&mut output, &vote.source_text, SOURCE_INDENT);
            }

            push_wrapped(&mut output, &topic.full_text, "");
            output.push('\n');
        }

        output
    }

    /// Write to a text file
    pub fn write_file(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        write!(file, "{}", self.format())?;
        Ok(())
    }
}

const REPORT_WIDTH: usize = 80;

/// Quoted motion and vote text sits under its summary line
const SOURCE_INDENT: &str = "    ";

/// Append `text` as indented lines of at most `REPORT_WIDTH` chars
///
/// A single word longer than the line gets a line of its own.
fn push_wrapped(output: &mut String, text: &str, indent: &str) {
    let limit = REPORT_WIDTH.saturating_sub(indent.chars().count());
    let mut line = String::new();
    let mut line_chars = 0;

    for word in text.split_whitespace() {
        let word_chars = word.chars().count();
        if line_chars > 0 && line_chars + 1 + word_chars > limit {
            output.push_str(indent);
            output.push_str(&line);
            output.push('\n');
            line.clear();
            line_chars = 0;
        }
        if line_chars > 0 {
            line.push(' ');
            line_chars += 1;
        }
        line.push_str(word);
        line_chars += word_chars;
    }

    if line_chars > 0 {
        output.push_str(indent);
        output.push_str(&line);
        output.push('\n');
    }
}
