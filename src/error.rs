use thiserror::Error;

/// A pattern in a `PatternConfig` that failed to compile
#[derive(Error, Debug)]
pub enum PatternError {
    #[error("invalid {family} pattern {pattern:?}: {source}")]
    Invalid {
        family: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("{family} pattern {pattern:?} has no capture group named {group:?}")]
    MissingGroup {
        family: &'static str,
        pattern: String,
        group: &'static str,
    },
}

/// Failures of the persisted label store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("failed to create database directory: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that abort a labeling session
#[derive(Error, Debug)]
pub enum LabelingError {
    #[error("label store failure: {0}")]
    Store(#[from] StoreError),

    #[error("terminal I/O failure: {0}")]
    Io(#[from] std::io::Error),
}
