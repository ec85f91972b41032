//! # Notekeep - personal notes manager
//!
//! Per-user text notes kept in a single embedded SQLite file.
//!
//! Notekeep provides:
//! - Account signup and login with hashed passwords
//! - Note create/read/update/delete scoped by owner
//! - Plain-text backup export before deletion
//! - A command layer the CLI front-end drives

pub mod user;
pub mod note;
pub mod backup;
pub mod storage;
pub mod command;
pub mod config;
pub mod logging;
pub mod ui;

// Re-exports for convenient access
pub use user::{Signup, UserId};
pub use note::{Note, NoteId, NoteSummary};
pub use storage::NoteStore;
pub use config::StoreConfig;
pub use command::{Command, CommandOutput, Credentials, dispatch};

/// Result type alias for Notekeep operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Notekeep operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Note {0} cannot be empty")]
    EmptyField(&'static str),

    #[error("Invalid id: {0}")]
    InvalidId(String),
}
