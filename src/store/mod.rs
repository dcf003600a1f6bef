pub mod schema;
pub mod sqlite;

pub use sqlite::*;

use std::collections::HashSet;

use crate::error::StoreError;
use crate::models::{BoundaryLabel, TranscriptRecord};

/// Backlog and label persistence used by the labeling session
pub trait LabelStore {
    /// Eligible transcripts that have no label at all, most recent first
    fn unlabeled_transcripts(&self) -> Result<Vec<TranscriptRecord>, StoreError>;

    /// Every eligible transcript, labeled or not, most recent first
    ///
    /// Eligible means not flagged corrupted and carrying non-blank text.
    fn eligible_transcripts(&self) -> Result<Vec<TranscriptRecord>, StoreError>;

    /// Char offsets already labeled for a transcript
    fn labeled_offsets(&self, transcript_id: &str) -> Result<HashSet<usize>, StoreError>;

    /// Persist one label durably
    ///
    /// Returns `false` without writing if `(transcript_id, char_index)` is
    /// already labeled.
    fn insert_label(&self, label: &BoundaryLabel) -> Result<bool, StoreError>;
}

/// Summary counts over the label store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelStats {
    pub labels: usize,
    pub positive: usize,
    pub negative: usize,
    pub labeled_transcripts: usize,
    pub unlabeled_transcripts: usize,
}
