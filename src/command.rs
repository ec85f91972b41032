//! Command layer between a front-end and the store
//!
//! A front-end builds a [`Command`] from user input, hands it to
//! [`dispatch`], and renders the [`CommandOutput`] it gets back. Commands
//! that act on behalf of a user carry credentials and log in first.

use crate::note::{Note, NoteId, NoteSummary};
use crate::storage::{NoteStore, StoreStats};
use crate::user::{Signup, UserId};
use crate::Result;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Signup(Credentials),
    Login(Credentials),
    AddNote {
        credentials: Credentials,
        title: String,
        content: String,
    },
    ListNotes(Credentials),
    ShowNote(NoteId),
    UpdateNote {
        note_id: NoteId,
        title: String,
        content: String,
    },
    DeleteNote {
        note_id: NoteId,
        backup: bool,
    },
    ExportNote(NoteId),
    Stats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CommandOutput {
    SignedUp { user_id: UserId },
    UsernameTaken,
    LoggedIn { user_id: UserId },
    InvalidCredentials,
    NoteCreated { note_id: NoteId },
    Notes { notes: Vec<NoteSummary> },
    Note { note: Note },
    NoteUpdated { note_id: NoteId },
    NoteDeleted { note_id: NoteId, backup: Option<PathBuf> },
    NoteExported { note_id: NoteId, path: PathBuf },
    NoteNotFound { note_id: NoteId },
    Stats { stats: StoreStats },
}

impl CommandOutput {
    /// Short machine-friendly name of the outcome
    pub fn kind(&self) -> &'static str {
        match self {
            CommandOutput::SignedUp { .. } => "signed_up",
            CommandOutput::UsernameTaken => "username_taken",
            CommandOutput::LoggedIn { .. } => "logged_in",
            CommandOutput::InvalidCredentials => "invalid_credentials",
            CommandOutput::NoteCreated { .. } => "note_created",
            CommandOutput::Notes { .. } => "notes",
            CommandOutput::Note { .. } => "note",
            CommandOutput::NoteUpdated { .. } => "note_updated",
            CommandOutput::NoteDeleted { .. } => "note_deleted",
            CommandOutput::NoteExported { .. } => "note_exported",
            CommandOutput::NoteNotFound { .. } => "note_not_found",
            CommandOutput::Stats { .. } => "stats",
        }
    }

    /// Whether the command did what was asked
    pub fn is_success(&self) -> bool {
        !matches!(
            self,
            CommandOutput::UsernameTaken
                | CommandOutput::InvalidCredentials
                | CommandOutput::NoteNotFound { .. }
        )
    }
}

/// Run one command against the store
pub fn dispatch(store: &NoteStore, command: Command) -> Result<CommandOutput> {
    tracing::debug!("Dispatching {:?}", CommandName(&command));

    let output = match command {
        Command::Signup(creds) => match store.signup(&creds.username, &creds.password)? {
            Signup::Created(user_id) => CommandOutput::SignedUp { user_id },
            Signup::AlreadyExists => CommandOutput::UsernameTaken,
        },

        Command::Login(creds) => match store.login(&creds.username, &creds.password)? {
            Some(user_id) => CommandOutput::LoggedIn { user_id },
            None => CommandOutput::InvalidCredentials,
        },

        Command::AddNote { credentials, title, content } => {
            let Some(user_id) = store.login(&credentials.username, &credentials.password)? else {
                return Ok(CommandOutput::InvalidCredentials);
            };
            let note_id = store.insert_note(&title, &content, user_id)?;
            CommandOutput::NoteCreated { note_id }
        }

        Command::ListNotes(creds) => match store.login(&creds.username, &creds.password)? {
            Some(user_id) => CommandOutput::Notes {
                notes: store.list_notes(user_id),
            },
            None => CommandOutput::InvalidCredentials,
        },

        Command::ShowNote(note_id) => match store.get_note(note_id)? {
            Some(note) => CommandOutput::Note { note },
            None => CommandOutput::NoteNotFound { note_id },
        },

        Command::UpdateNote { note_id, title, content } => {
            store.update_note(&title, &content, note_id)?;
            CommandOutput::NoteUpdated { note_id }
        }

        Command::DeleteNote { note_id, backup } => {
            let backup = if backup {
                store.backup_and_delete(note_id)?
            } else {
                store.delete_note(note_id)?;
                None
            };
            CommandOutput::NoteDeleted { note_id, backup }
        }

        Command::ExportNote(note_id) => match store.export_note_to_file(note_id)? {
            Some(path) => CommandOutput::NoteExported { note_id, path },
            None => CommandOutput::NoteNotFound { note_id },
        },

        Command::Stats => CommandOutput::Stats {
            stats: store.stats()?,
        },
    };

    Ok(output)
}

/// Debug view of a command that leaves out passwords and note text
struct CommandName<'a>(&'a Command);

impl std::fmt::Debug for CommandName<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self.0 {
            Command::Signup(_) => "signup",
            Command::Login(_) => "login",
            Command::AddNote { .. } => "add_note",
            Command::ListNotes(_) => "list_notes",
            Command::ShowNote(_) => "show_note",
            Command::UpdateNote { .. } => "update_note",
            Command::DeleteNote { .. } => "delete_note",
            Command::ExportNote(_) => "export_note",
            Command::Stats => "stats",
        };
        f.write_str(name)
    }
}
