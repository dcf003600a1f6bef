use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{info, warn};

use crate::segmentation::normalize_whitespace;

/// A transcript file stitched into a single whitespace-normalized text
///
/// Boundary offsets are char positions into this exact text, so it is stored
/// as is.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedTranscript {
    pub text: String,
    /// The file needed repair or contained invalid segments
    pub corrupted: bool,
    /// Latest segment end time, when the source carries timings
    pub length_seconds: Option<f64>,
}

/// One timed segment of a JSON transcript
#[derive(Debug, Clone, Deserialize)]
struct RawSegment {
    start: Option<f64>,
    end: Option<f64>,
    #[serde(default)]
    text: String,
}

/// Load a transcript file: `.json` segment lists or plain text
pub fn load_transcript_file(path: &Path) -> Result<LoadedTranscript> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        parse_segment_json(&content).with_context(|| format!("Failed to load {:?}", path))
    } else {
        Ok(LoadedTranscript {
            text: normalize_whitespace(&content),
            corrupted: false,
            length_seconds: None,
        })
    }
}

/// Parse a JSON list of `{start, end, text}` segments into one transcript
///
/// Truncated files are repaired by cutting after the last complete object and
/// closing the list; repaired files and files with untimed segments are
/// flagged corrupted.
pub fn parse_segment_json(content: &str) -> Result<LoadedTranscript> {
    let mut corrupted = false;

    let segments: Vec<RawSegment> = match serde_json::from_str(content) {
        Ok(segments) => segments,
        Err(err) => {
            corrupted = true;
            warn!("Malformed transcript JSON ({}), attempting repair", err);
            let content = content.trim();
            let Some(last_brace) = content.rfind('}') else {
                bail!("No valid JSON structure found");
            };
            let repaired = format!("{}]", &content[..=last_brace]);
            let segments = serde_json::from_str(&repaired).context("Could not repair JSON")?;
            info!("Repaired transcript JSON by truncating");
            segments
        }
    };

    let total = segments.len();
    let mut timed: Vec<(f64, RawSegment)> = segments
        .into_iter()
        .filter_map(|s| s.start.map(|start| (start, s)))
        .collect();
    if timed.len() < total {
        corrupted = true;
        warn!("Filtered out {} segments without a start time", total - timed.len());
    }
    timed.sort_by(|a, b| a.0.total_cmp(&b.0));

    let length_seconds = timed
        .iter()
        .filter_map(|(_, s)| s.end)
        .max_by(|a, b| a.total_cmp(b));

    let joined = timed
        .iter()
        .map(|(_, s)| clean_segment_text(&s.text))
        .collect::<Vec<_>>()
        .join(" ");
    let text = normalize_whitespace(&joined);

    Ok(LoadedTranscript {
        text,
        corrupted,
        length_seconds,
    })
}

/// Canonical `YYYY-MM-DD` form of a meeting date, or `None` when it doesn't parse
///
/// Backlog ordering compares dates as text, which only holds for ISO dates.
pub fn parse_meeting_date(raw: &str) -> Option<String> {
    match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(date) => Some(date.format("%Y-%m-%d").to_string()),
        Err(err) => {
            warn!("Ignoring meeting date {:?} ({}); expected YYYY-MM-DD", raw, err);
            None
        }
    }
}

/// Strip HTML non-breaking spaces and standalone filler words
fn clean_segment_text(text: &str) -> String {
    let mut cleaned = text.replace("&nbsp;", " ");
    for filler in [" uh ", " um ", " Uh ", " Um "] {
        while cleaned.contains(filler) {
            cleaned = cleaned.replace(filler, " ");
        }
    }
    cleaned
}
