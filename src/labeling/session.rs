use std::io::{BufRead, Write};

use chrono::Utc;
use tracing::{debug, info, warn};

use super::candidates::{generate_candidates, CandidateSet};
use super::context::{BoundaryContext, DEFAULT_CONTEXT_CHARS};
use crate::error::LabelingError;
use crate::models::{BoundaryCandidate, BoundaryLabel, TranscriptRecord};
use crate::segmentation::Segmenter;
use crate::store::LabelStore;

const PROMPT: &str = "Is this a valid topic boundary? (y/n/q to quit): ";
const REPROMPT: &str = "Please enter 'y', 'n', or 'q'";

/// Which transcripts a resumed session picks up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResumePolicy {
    /// A transcript with any label at all is considered done
    #[default]
    AnyLabel,
    /// A transcript stays in the backlog until every candidate is labeled
    PerCandidate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Chars of context shown before and after each boundary
    pub context_chars: usize,
    pub resume: ResumePolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            context_chars: DEFAULT_CONTEXT_CHARS,
            resume: ResumePolicy::AnyLabel,
        }
    }
}

/// A human decision on one candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Affirm,
    Reject,
    Quit,
}

impl Response {
    /// Parse one line of input; anything but y/n/q (any case) is `None`
    ///
    /// Only the line terminator is stripped, so `" n "` is rejected.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim_end_matches(['\r', '\n']).to_lowercase().as_str() {
            "y" => Some(Self::Affirm),
            "n" => Some(Self::Reject),
            "q" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Outcome of one session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionSummary {
    pub session_id: String,
    pub transcripts_visited: usize,
    pub transcripts_completed: usize,
    pub labels_written: usize,
    pub positive: usize,
    /// The operator quit (or input ended) before the backlog was exhausted
    pub quit: bool,
}

/// A backlog transcript with the candidates still awaiting a verdict
struct PendingTranscript<'t> {
    record: &'t TranscriptRecord,
    set: CandidateSet,
    pending: Vec<BoundaryCandidate>,
}

/// Interactive loop collecting human verdicts on boundary candidates
///
/// Every verdict is written through to the store before the next candidate is
/// shown; any store or terminal failure aborts the session.
pub struct LabelingSession<'a, S, R, W> {
    store: &'a S,
    segmenter: &'a Segmenter,
    config: SessionConfig,
    input: R,
    output: W,
    session_id: String,
}

impl<'a, S, R, W> LabelingSession<'a, S, R, W>
where
    S: LabelStore,
    R: BufRead,
    W: Write,
{
    pub fn new(
        store: &'a S,
        segmenter: &'a Segmenter,
        config: SessionConfig,
        input: R,
        output: W,
    ) -> Self {
        Self {
            store,
            segmenter,
            config,
            input,
            output,
            session_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn run(&mut self) -> Result<SessionSummary, LabelingError> {
        let transcripts = match self.config.resume {
            ResumePolicy::AnyLabel => self.store.unlabeled_transcripts()?,
            ResumePolicy::PerCandidate => self.store.eligible_transcripts()?,
        };
        let work = self.pending_work(&transcripts)?;

        let mut summary = SessionSummary {
            session_id: self.session_id.clone(),
            ..Default::default()
        };

        info!(
            "Session {}: found {} meetings to label",
            self.session_id,
            work.len()
        );
        writeln!(self.output, "Found {} meetings to label", work.len())?;

        for transcript in &work {
            summary.transcripts_visited += 1;

            if !self.label_transcript(transcript, &mut summary)? {
                summary.quit = true;
                info!(
                    "Session {} quit after {} labels",
                    self.session_id, summary.labels_written
                );
                writeln!(self.output, "Saving progress and quitting...")?;
                return Ok(summary);
            }
        }

        info!(
            "Session {} finished: {} labels across {} meetings",
            self.session_id, summary.labels_written, summary.transcripts_completed
        );
        Ok(summary)
    }

    /// Candidates per transcript, dropping blank transcripts and those already fully labeled
    fn pending_work<'t>(
        &self,
        transcripts: &'t [TranscriptRecord],
    ) -> Result<Vec<PendingTranscript<'t>>, LabelingError> {
        let mut work = Vec::new();
        for record in transcripts {
            if record.text.trim().is_empty() {
                continue;
            }

            let set = generate_candidates(self.segmenter, &record.text);
            let labeled = self.store.labeled_offsets(&record.transcript_id)?;
            let pending: Vec<_> = set
                .candidates
                .iter()
                .filter(|c| !labeled.contains(&c.char_index))
                .copied()
                .collect();

            if !set.is_empty() && pending.is_empty() {
                debug!(
                    "All {} boundaries in meeting {} already labeled",
                    set.len(),
                    record.transcript_id
                );
                continue;
            }
            work.push(PendingTranscript {
                record,
                set,
                pending,
            });
        }
        Ok(work)
    }

    /// Label every pending candidate of one transcript; `false` means quit
    fn label_transcript(
        &mut self,
        transcript: &PendingTranscript<'_>,
        summary: &mut SessionSummary,
    ) -> Result<bool, LabelingError> {
        let id = &transcript.record.transcript_id;
        writeln!(self.output, "\nProcessing meeting: {}", id)?;

        if transcript.set.is_empty() {
            info!("No potential boundaries found in meeting {}", id);
            writeln!(self.output, "No potential boundaries found in this meeting")?;
            return Ok(true);
        }

        writeln!(
            self.output,
            "Found {} potential boundaries to label",
            transcript.pending.len()
        )?;

        for candidate in &transcript.pending {
            let context = BoundaryContext::around(
                &transcript.set.text,
                candidate.char_index,
                self.config.context_chars,
            )
            .render();
            writeln!(self.output, "{}", context)?;

            let verdict = match self.prompt()? {
                Response::Quit => return Ok(false),
                Response::Affirm => true,
                Response::Reject => false,
            };

            let label = BoundaryLabel {
                transcript_id: id.clone(),
                char_index: candidate.char_index,
                label: verdict,
                context_snippet: context,
                session_id: self.session_id.clone(),
                labeled_at: Utc::now().to_rfc3339(),
            };
            if self.store.insert_label(&label)? {
                summary.labels_written += 1;
                if verdict {
                    summary.positive += 1;
                }
            } else {
                warn!(
                    "Boundary {} in meeting {} was already labeled; keeping existing label",
                    candidate.char_index, id
                );
            }
        }

        summary.transcripts_completed += 1;
        info!("Completed labeling for meeting {}", id);
        writeln!(self.output, "Completed labeling for meeting {}", id)?;
        Ok(true)
    }

    /// Block until a valid response arrives; end of input counts as quit
    fn prompt(&mut self) -> Result<Response, LabelingError> {
        loop {
            write!(self.output, "{}", PROMPT)?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                warn!("Input closed; ending session");
                return Ok(Response::Quit);
            }

            match Response::parse(&line) {
                Some(response) => return Ok(response),
                None => writeln!(self.output, "{}", REPROMPT)?,
            }
        }
    }
}
