//! Note types
//!
//! A note is a titled block of text owned by exactly one user. Its
//! modification time is kept by the database, as milliseconds since the
//! Unix epoch, and surfaced here as a UTC `DateTime`.

use crate::user::UserId;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Format used whenever a modification time is shown to a person.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Identifier of a row in the `NOTE` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(pub i64);

impl std::fmt::Display for NoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NoteId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<i64>()
            .map(NoteId)
            .map_err(|_| Error::InvalidId(format!("not a note id: {}", s)))
    }
}

impl ToSql for NoteId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        self.0.to_sql()
    }
}

impl FromSql for NoteId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(NoteId)
    }
}

/// A full note row, including its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub modified_at: DateTime<Utc>,
    pub user_id: UserId,
}

impl Note {
    /// Modification time in the human-readable form used by backups and the CLI.
    pub fn modified_display(&self) -> String {
        format_timestamp(&self.modified_at)
    }
}

/// One entry of a user's note listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteSummary {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub modified_at: DateTime<Utc>,
}

impl NoteSummary {
    pub fn modified_display(&self) -> String {
        format_timestamp(&self.modified_at)
    }
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Convert a stored millisecond timestamp back into a `DateTime`.
pub fn timestamp_from_millis(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
}

/// Reject a title or content that is empty or only whitespace.
pub fn validate_note_fields(title: &str, content: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::EmptyField("title"));
    }
    if content.trim().is_empty() {
        return Err(Error::EmptyField("content"));
    }
    Ok(())
}
