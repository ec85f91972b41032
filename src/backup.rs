//! Plain-text note backups
//!
//! A backup is three lines: title, content and last-modified time. Files
//! are named after the note id and overwrite any earlier backup of the
//! same note.

use crate::Result;
use crate::note::{Note, NoteId};
use std::path::{Path, PathBuf};

pub fn backup_file_name(id: NoteId) -> String {
    format!("backup_note_{}.txt", id)
}

pub fn backup_path_in(dir: &Path, id: NoteId) -> PathBuf {
    dir.join(backup_file_name(id))
}

/// Render the text written to a backup file.
pub fn render_backup(note: &Note) -> String {
    format!(
        "Title: {}\nContent: {}\nLast Modified: {}\n",
        note.title,
        note.content,
        note.modified_display()
    )
}

/// Write `note` into `dir`, returning the absolute path of the file.
pub fn write_backup(dir: &Path, note: &Note) -> Result<PathBuf> {
    if !dir.as_os_str().is_empty() && !dir.exists() {
        std::fs::create_dir_all(dir)?;
    }

    let path = backup_path_in(dir, note.id);
    std::fs::write(&path, render_backup(note))?;
    let path = std::path::absolute(&path)?;
    tracing::info!("Note {} backed up to {}", note.id, path.display());
    Ok(path)
}
