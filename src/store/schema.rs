use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::StoreError;

/// Current schema version, tracked in SQLite's `user_version` pragma
pub const SCHEMA_VERSION: i32 = 1;

/// Create the backlog and label tables if this is a fresh database
pub fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
    let current = get_schema_version(conn)?;

    if current >= SCHEMA_VERSION {
        debug!("Database schema is up to date (v{})", current);
        return Ok(());
    }

    info!("Initializing database schema v{}", SCHEMA_VERSION);
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS meetings (
            meeting_id TEXT PRIMARY KEY,
            title TEXT,
            date TEXT,
            transcript TEXT,
            corrupted INTEGER NOT NULL DEFAULT 0,
            length_seconds REAL
        );

        CREATE TABLE IF NOT EXISTS topic_boundary_labels (
            meeting_id TEXT NOT NULL,
            char_index INTEGER NOT NULL,
            label INTEGER NOT NULL,
            context TEXT NOT NULL,
            session_id TEXT,
            labeled_at TEXT,
            PRIMARY KEY (meeting_id, char_index),
            FOREIGN KEY (meeting_id) REFERENCES meetings(meeting_id)
        );

        CREATE INDEX IF NOT EXISTS idx_meetings_date ON meetings(date);
        "#,
    )?;
    set_schema_version(conn, SCHEMA_VERSION)?;

    Ok(())
}

fn get_schema_version(conn: &Connection) -> Result<i32, StoreError> {
    Ok(conn.query_row("PRAGMA user_version", [], |row| row.get(0))?)
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<(), StoreError> {
    conn.pragma_update(None, "user_version", version)?;
    Ok(())
}
