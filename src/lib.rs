pub mod error;
pub mod io;
pub mod labeling;
pub mod models;
pub mod segmentation;
pub mod store;

pub use error::{LabelingError, PatternError, StoreError};
pub use io::{
    load_transcript_file, parse_meeting_date, HumanReport, LoadedTranscript, TopicReport,
};
pub use labeling::{
    generate_candidates, BoundaryContext, CandidateSet, LabelingSession, ResumePolicy,
    SessionConfig, SessionSummary,
};
pub use models::{BoundaryCandidate, BoundaryLabel, Motion, TextUnit, Topic, TranscriptRecord, Vote};
pub use segmentation::{PatternConfig, Segmenter, SegmenterConfig, SplitterConfig};
pub use store::{LabelStats, LabelStore, SqliteStore};
