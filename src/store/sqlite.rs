use std::collections::HashSet;
use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, Row};
use tracing::{debug, info};

use super::schema;
use super::{LabelStats, LabelStore};
use crate::error::StoreError;
use crate::models::{BoundaryLabel, TranscriptRecord};

const ELIGIBLE: &str = "m.transcript IS NOT NULL AND TRIM(m.transcript) <> '' AND m.corrupted = 0";

/// SQLite-backed transcript backlog and label store
pub struct SqliteStore {
    db_path: PathBuf,
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a database file and initialize its schema
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self, StoreError> {
        let db_path = db_path.as_ref().to_path_buf();

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        info!("Opening database at: {:?}", db_path);
        let conn = Connection::open(&db_path)?;
        schema::initialize_schema(&conn)?;

        Ok(Self { db_path, conn })
    }

    /// Create an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self, StoreError> {
        debug!("Creating in-memory database");
        let conn = Connection::open_in_memory()?;
        schema::initialize_schema(&conn)?;

        Ok(Self {
            db_path: PathBuf::from(":memory:"),
            conn,
        })
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Insert or replace a transcript in the backlog
    pub fn upsert_transcript(
        &self,
        record: &TranscriptRecord,
        corrupted: bool,
        length_seconds: Option<f64>,
    ) -> Result<(), StoreError> {
        self.conn.execute(
            r#"
            INSERT INTO meetings (meeting_id, title, date, transcript, corrupted, length_seconds)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(meeting_id) DO UPDATE SET
                title = excluded.title,
                date = excluded.date,
                transcript = excluded.transcript,
                corrupted = excluded.corrupted,
                length_seconds = excluded.length_seconds
            "#,
            params![
                record.transcript_id,
                record.title,
                record.date,
                record.text,
                corrupted,
                length_seconds,
            ],
        )?;
        debug!("Stored transcript {}", record.transcript_id);
        Ok(())
    }

    /// All labels for a transcript, ordered by offset
    pub fn labels_for(&self, transcript_id: &str) -> Result<Vec<BoundaryLabel>, StoreError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT meeting_id, char_index, label, context, session_id, labeled_at
            FROM topic_boundary_labels
            WHERE meeting_id = ?1
            ORDER BY char_index
            "#,
        )?;
        let labels = stmt
            .query_map([transcript_id], |row| {
                Ok(BoundaryLabel {
                    transcript_id: row.get(0)?,
                    char_index: row.get::<_, i64>(1)? as usize,
                    label: row.get(2)?,
                    context_snippet: row.get(3)?,
                    session_id: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
                    labeled_at: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(labels)
    }

    pub fn stats(&self) -> Result<LabelStats, StoreError> {
        let (labels, positive, labeled_transcripts): (i64, i64, i64) = self.conn.query_row(
            r#"
            SELECT COUNT(*), COALESCE(SUM(label), 0), COUNT(DISTINCT meeting_id)
            FROM topic_boundary_labels
            "#,
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;
        let unlabeled = self.unlabeled_transcripts()?.len();

        Ok(LabelStats {
            labels: labels as usize,
            positive: positive as usize,
            negative: (labels - positive) as usize,
            labeled_transcripts: labeled_transcripts as usize,
            unlabeled_transcripts: unlabeled,
        })
    }

    fn query_transcripts(&self, sql: &str) -> Result<Vec<TranscriptRecord>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let records = stmt
            .query_map([], transcript_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}

fn transcript_from_row(row: &Row<'_>) -> rusqlite::Result<TranscriptRecord> {
    Ok(TranscriptRecord {
        transcript_id: row.get(0)?,
        title: row.get(1)?,
        date: row.get(2)?,
        text: row.get(3)?,
    })
}

impl LabelStore for SqliteStore {
    fn unlabeled_transcripts(&self) -> Result<Vec<TranscriptRecord>, StoreError> {
        self.query_transcripts(&format!(
            r#"
            SELECT m.meeting_id, m.title, m.date, m.transcript
            FROM meetings m
            WHERE {ELIGIBLE}
              AND NOT EXISTS (
                  SELECT 1 FROM topic_boundary_labels l WHERE l.meeting_id = m.meeting_id
              )
            ORDER BY m.date DESC, m.meeting_id
            "#
        ))
    }

    fn eligible_transcripts(&self) -> Result<Vec<TranscriptRecord>, StoreError> {
        self.query_transcripts(&format!(
            r#"
            SELECT m.meeting_id, m.title, m.date, m.transcript
            FROM meetings m
            WHERE {ELIGIBLE}
            ORDER BY m.date DESC, m.meeting_id
            "#
        ))
    }

    fn labeled_offsets(&self, transcript_id: &str) -> Result<HashSet<usize>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT char_index FROM topic_boundary_labels WHERE meeting_id = ?1")?;
        let offsets = stmt
            .query_map([transcript_id], |row| row.get::<_, i64>(0))?
            .map(|offset| offset.map(|o| o as usize))
            .collect::<Result<HashSet<_>, _>>()?;
        Ok(offsets)
    }

    fn insert_label(&self, label: &BoundaryLabel) -> Result<bool, StoreError> {
        // Autocommit: the row is durable once execute returns
        let written = self.conn.execute(
            r#"
            INSERT OR IGNORE INTO topic_boundary_labels
                (meeting_id, char_index, label, context, session_id, labeled_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                label.transcript_id,
                label.char_index as i64,
                label.label,
                label.context_snippet,
                label.session_id,
                label.labeled_at,
            ],
        )?;
        Ok(written == 1)
    }
}
