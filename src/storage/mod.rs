//! Storage Layer - SQLite-backed persistence
//!
//! System of record is one SQLite file with tables:
//! - USERS(id, username, password)
//! - NOTE(id, title, content, modified_time, user_id)
//!
//! plus a trigger that refreshes NOTE.modified_time on every edit.

pub mod schema;
pub mod sqlite;

pub use sqlite::{NoteStore, StoreStats};
