//! SQLite storage implementation

use std::path::PathBuf;
use rusqlite::{Connection, params, OptionalExtension};
use crate::{Result, Error};
use crate::backup;
use crate::config::{StoreConfig, ensure_db_dir};
use crate::note::{self, Note, NoteId, NoteSummary};
use crate::user::{self, Signup, UserId};
use super::schema;

/// SQLite-backed store for users and their notes
pub struct NoteStore {
    conn: Connection,
    backup_dir: PathBuf,
}

impl NoteStore {
    /// Open the configured database file (creates it if it doesn't exist)
    pub fn open(config: &StoreConfig) -> Result<Self> {
        ensure_db_dir(&config.database)?;
        let conn = Connection::open(&config.database)?;
        let store = Self {
            conn,
            backup_dir: config.backup_dir.clone(),
        };
        store.initialize()?;
        tracing::debug!("Opened note store at {}", config.database.display());
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn,
            backup_dir: PathBuf::from("."),
        };
        store.initialize()?;
        Ok(store)
    }

    /// Write backups into `dir` instead of the configured directory
    pub fn with_backup_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.backup_dir = dir.into();
        self
    }

    /// Create tables, trigger and indexes. Safe to run any number of times.
    pub fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(schema::PRAGMAS)?;
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    // ========== User Operations ==========

    /// Register a new account. The username is case-folded first.
    pub fn signup(&self, username: &str, password: &str) -> Result<Signup> {
        let username = user::normalize_username(username);

        // Fast path only; the UNIQUE constraint decides.
        if self.find_user_id(&username)?.is_some() {
            tracing::debug!("Signup refused, username taken");
            return Ok(Signup::AlreadyExists);
        }

        logged("signup", self.insert_user(&username, &user::hash_password(password)))
    }

    fn insert_user(&self, folded_username: &str, password_hash: &str) -> Result<Signup> {
        let inserted = self.conn.execute(
            "INSERT INTO USERS (username, password) VALUES (?1, ?2)",
            params![folded_username, password_hash],
        );

        match inserted {
            Ok(_) => {
                let id = UserId(self.conn.last_insert_rowid());
                tracing::info!("Created user {}", id);
                Ok(Signup::Created(id))
            }
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                Ok(Signup::AlreadyExists)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Check credentials. Unknown user and wrong password look the same.
    pub fn login(&self, username: &str, password: &str) -> Result<Option<UserId>> {
        let username = user::normalize_username(username);
        let hash = user::hash_password(password);

        let found = self.conn
            .query_row(
                "SELECT id FROM USERS WHERE username = ?1 AND password = ?2",
                params![username, hash],
                |row| row.get::<_, UserId>(0),
            )
            .optional()
            .map_err(Error::from);

        let found = logged("login", found)?;
        if found.is_none() {
            tracing::debug!("Login rejected");
        }
        Ok(found)
    }

    /// Look up a user by name (case-insensitive)
    pub fn find_user_id(&self, username: &str) -> Result<Option<UserId>> {
        let username = user::normalize_username(username);
        let found = self.conn
            .query_row(
                "SELECT id FROM USERS WHERE username = ?1",
                [&username],
                |row| row.get::<_, UserId>(0),
            )
            .optional()
            .map_err(Error::from);
        logged("find user", found)
    }

    // ========== Note Operations ==========

    /// Create a note owned by `user_id`
    pub fn insert_note(&self, title: &str, content: &str, user_id: UserId) -> Result<NoteId> {
        note::validate_note_fields(title, content)?;

        let inserted = self.conn.execute(
            "INSERT INTO NOTE (title, content, user_id) VALUES (?1, ?2, ?3)",
            params![title, content, user_id],
        );
        logged("insert note", inserted.map_err(Error::from))?;

        let id = NoteId(self.conn.last_insert_rowid());
        tracing::info!("Inserted note {} for user {}", id, user_id);
        Ok(id)
    }

    /// Overwrite a note's title and content. A missing id is not an error.
    pub fn update_note(&self, title: &str, content: &str, note_id: NoteId) -> Result<()> {
        note::validate_note_fields(title, content)?;

        let updated = self.conn.execute(
            "UPDATE NOTE SET title = ?1, content = ?2 WHERE id = ?3",
            params![title, content, note_id],
        );
        let rows = logged("update note", updated.map_err(Error::from))?;

        if rows == 0 {
            tracing::debug!("Update of note {} matched no rows", note_id);
        }
        Ok(())
    }

    /// Remove a note. A missing id is not an error.
    pub fn delete_note(&self, note_id: NoteId) -> Result<()> {
        let deleted = self.conn.execute("DELETE FROM NOTE WHERE id = ?1", [note_id]);
        let rows = logged("delete note", deleted.map_err(Error::from))?;

        if rows == 0 {
            tracing::debug!("Delete of note {} matched no rows", note_id);
        }
        Ok(())
    }

    /// All notes of a user in id order; empty on no match or storage fault
    pub fn list_notes(&self, user_id: UserId) -> Vec<NoteSummary> {
        self.try_list_notes(user_id).unwrap_or_default()
    }

    /// Fallible form of [`NoteStore::list_notes`]
    pub fn try_list_notes(&self, user_id: UserId) -> Result<Vec<NoteSummary>> {
        logged("list notes", self.query_notes_of(user_id))
    }

    fn query_notes_of(&self, user_id: UserId) -> Result<Vec<NoteSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, content, modified_time FROM NOTE WHERE user_id = ?1 ORDER BY id"
        )?;

        let notes = stmt
            .query_map([user_id], |row| {
                Ok(NoteSummary {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    content: row.get(2)?,
                    modified_at: timestamp_column(row, 3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(notes)
    }

    /// Fetch one note by id, whoever owns it
    pub fn get_note(&self, note_id: NoteId) -> Result<Option<Note>> {
        let found = self.conn
            .query_row(
                "SELECT id, title, content, modified_time, user_id FROM NOTE WHERE id = ?1",
                [note_id],
                |row| self.row_to_note(row),
            )
            .optional()
            .map_err(Error::from);
        logged("get note", found)
    }

    /// Helper to convert a row to a Note
    fn row_to_note(&self, row: &rusqlite::Row) -> rusqlite::Result<Note> {
        Ok(Note {
            id: row.get(0)?,
            title: row.get(1)?,
            content: row.get(2)?,
            modified_at: timestamp_column(row, 3)?,
            user_id: row.get(4)?,
        })
    }

    // ========== Backup Operations ==========

    /// Write a note to `backup_note_<id>.txt` in the backup directory.
    /// Returns `None` when the note does not exist.
    pub fn export_note_to_file(&self, note_id: NoteId) -> Result<Option<PathBuf>> {
        let Some(note) = self.get_note(note_id)? else {
            tracing::debug!("Export of note {} skipped, not found", note_id);
            return Ok(None);
        };

        let path = logged("export note", backup::write_backup(&self.backup_dir, &note))?;
        Ok(Some(path))
    }

    /// Export a note, then delete it. Nothing is deleted if the export fails.
    pub fn backup_and_delete(&self, note_id: NoteId) -> Result<Option<PathBuf>> {
        let exported = self.export_note_to_file(note_id)?;
        if exported.is_some() {
            self.delete_note(note_id)?;
        }
        Ok(exported)
    }

    // ========== Statistics ==========

    pub fn count_users(&self) -> Result<usize> {
        self.count_rows("SELECT COUNT(*) FROM USERS")
    }

    pub fn count_notes(&self) -> Result<usize> {
        self.count_rows("SELECT COUNT(*) FROM NOTE")
    }

    fn count_rows(&self, sql: &str) -> Result<usize> {
        let count = self.conn
            .query_row(sql, [], |row| row.get::<_, i64>(0))
            .map_err(Error::from);
        Ok(logged("stats", count)? as usize)
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<StoreStats> {
        Ok(StoreStats {
            users: self.count_users()?,
            notes: self.count_notes()?,
        })
    }
}

/// Record a storage fault in the diagnostic log and pass it on
fn logged<T>(operation: &str, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        tracing::error!("An error occurred during {}: {}", operation, e);
    }
    result
}

fn timestamp_column(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<chrono::DateTime<chrono::Utc>> {
    let millis: i64 = row.get(idx)?;
    note::timestamp_from_millis(millis)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, millis))
}

/// Database statistics
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StoreStats {
    pub users: usize,
    pub notes: usize,
}

impl std::fmt::Display for StoreStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Users: {}", self.users)?;
        writeln!(f, "  Notes: {}", self.notes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn store_with_user(name: &str) -> (NoteStore, UserId) {
        let store = NoteStore::open_in_memory().unwrap();
        let id = store.signup(name, "pw").unwrap().user_id().unwrap();
        (store, id)
    }

    fn stored_hash(store: &NoteStore, username: &str) -> String {
        store.conn
            .query_row("SELECT password FROM USERS WHERE username = ?1", [username], |row| row.get(0))
            .unwrap()
    }

    fn modified_millis(store: &NoteStore, id: NoteId) -> i64 {
        store.conn
            .query_row("SELECT modified_time FROM NOTE WHERE id = ?1", [id], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let store = NoteStore::open_in_memory().unwrap();
        store.initialize().unwrap();
        store.initialize().unwrap();
        assert_eq!(store.stats().unwrap().users, 0);
    }

    #[test]
    fn test_signup_is_case_insensitive() {
        let store = NoteStore::open_in_memory().unwrap();

        assert!(store.signup("Alice", "pw1").unwrap().is_created());
        let first_hash = stored_hash(&store, "alice");

        assert_eq!(store.signup("alice", "pw2").unwrap(), Signup::AlreadyExists);
        assert_eq!(store.signup("ALICE", "pw3").unwrap(), Signup::AlreadyExists);
        assert_eq!(stored_hash(&store, "alice"), first_hash);
        assert_eq!(store.count_users().unwrap(), 1);
    }

    #[test]
    fn test_signup_never_stores_plaintext() {
        let store = NoteStore::open_in_memory().unwrap();
        store.signup("bob", "hunter2").unwrap();
        let hash = stored_hash(&store, "bob");
        assert_ne!(hash, "hunter2");
        assert_eq!(hash, user::hash_password("hunter2"));
    }

    #[test]
    fn test_unique_constraint_reports_already_exists() {
        let store = NoteStore::open_in_memory().unwrap();
        store.signup("carol", "pw").unwrap();

        // Simulates a concurrent signup that slipped past the pre-check
        let outcome = store.insert_user("carol", &user::hash_password("other")).unwrap();
        assert_eq!(outcome, Signup::AlreadyExists);
        assert_eq!(store.count_users().unwrap(), 1);
    }

    #[test]
    fn test_login() {
        let store = NoteStore::open_in_memory().unwrap();
        let id = store.signup("Alice", "pw1").unwrap().user_id().unwrap();

        assert_eq!(store.login("ALICE", "pw1").unwrap(), Some(id));
        assert_eq!(store.login("alice", "pw1").unwrap(), Some(id));

        let wrong_password = store.login("alice", "nope").unwrap();
        let unknown_user = store.login("mallory", "pw1").unwrap();
        assert_eq!(wrong_password, None);
        assert_eq!(wrong_password, unknown_user);
    }

    #[test]
    fn test_find_user_id() {
        let (store, id) = store_with_user("Dave");
        assert_eq!(store.find_user_id("DAVE").unwrap(), Some(id));
        assert_eq!(store.find_user_id("erin").unwrap(), None);
    }

    #[test]
    fn test_note_round_trip() {
        let (store, user_id) = store_with_user("alice");

        let id = store.insert_note("T", "C", user_id).unwrap();
        let note = store.get_note(id).unwrap().unwrap();
        assert_eq!(note.id, id);
        assert_eq!(note.title, "T");
        assert_eq!(note.content, "C");
        assert_eq!(note.user_id, user_id);
    }

    #[test]
    fn test_empty_fields_write_nothing() {
        let (store, user_id) = store_with_user("alice");

        assert!(matches!(store.insert_note("", "C", user_id), Err(Error::EmptyField("title"))));
        assert!(matches!(store.insert_note("T", "", user_id), Err(Error::EmptyField("content"))));
        assert!(matches!(store.insert_note("  ", "C", user_id), Err(Error::EmptyField(_))));
        assert_eq!(store.count_notes().unwrap(), 0);

        let id = store.insert_note("T", "C", user_id).unwrap();
        let before = store.get_note(id).unwrap().unwrap();
        assert!(store.update_note("", "C2", id).is_err());
        assert!(store.update_note("T2", "", id).is_err());
        assert_eq!(store.get_note(id).unwrap().unwrap(), before);
    }

    #[test]
    fn test_insert_note_requires_existing_owner() {
        let store = NoteStore::open_in_memory().unwrap();
        let result = store.insert_note("T", "C", UserId(999));
        assert!(matches!(result, Err(Error::Storage(_))));
        assert_eq!(store.count_notes().unwrap(), 0);
    }

    #[test]
    fn test_list_notes_scoped_and_ordered() {
        let (store, alice) = store_with_user("alice");
        let bob = store.signup("bob", "pw").unwrap().user_id().unwrap();

        let first = store.insert_note("one", "1", alice).unwrap();
        store.insert_note("bob's", "b", bob).unwrap();
        let second = store.insert_note("two", "2", alice).unwrap();

        let notes = store.list_notes(alice);
        let ids: Vec<NoteId> = notes.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![first, second]);
        assert_eq!(notes[0].title, "one");

        assert_eq!(store.list_notes(alice), notes);
        assert!(store.list_notes(UserId(12345)).is_empty());
    }

    #[test]
    fn test_update_advances_modified_time() {
        let (store, user_id) = store_with_user("alice");
        let id = store.insert_note("T", "C", user_id).unwrap();

        let before = modified_millis(&store, id);
        store.update_note("T2", "C2", id).unwrap();
        let after = modified_millis(&store, id);
        assert!(after > before);

        store.update_note("T3", "C3", id).unwrap();
        assert!(modified_millis(&store, id) > after);

        let note = store.get_note(id).unwrap().unwrap();
        assert_eq!(note.title, "T3");
        assert_eq!(note.content, "C3");
    }

    #[test]
    fn test_update_missing_note_is_silent() {
        let store = NoteStore::open_in_memory().unwrap();
        store.update_note("T", "C", NoteId(77)).unwrap();
        assert!(store.get_note(NoteId(77)).unwrap().is_none());
    }

    #[test]
    fn test_delete_note() {
        let (store, user_id) = store_with_user("alice");
        let id = store.insert_note("T", "C", user_id).unwrap();

        store.delete_note(id).unwrap();
        assert!(store.get_note(id).unwrap().is_none());
        store.delete_note(id).unwrap();
    }

    #[test]
    fn test_export_missing_note() {
        let dir = tempfile::tempdir().unwrap();
        let store = NoteStore::open_in_memory().unwrap().with_backup_dir(dir.path());
        assert!(store.export_note_to_file(NoteId(5)).unwrap().is_none());
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[test]
    fn test_backup_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let (store, user_id) = store_with_user("alice");
        let store = store.with_backup_dir(dir.path());
        let id = store.insert_note("T", "C", user_id).unwrap();

        let path = store.backup_and_delete(id).unwrap().unwrap();
        assert!(path.exists());
        assert!(store.get_note(id).unwrap().is_none());
        assert!(store.backup_and_delete(id).unwrap().is_none());
    }

    #[test]
    fn test_open_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            database: dir.path().join("nested").join("notes.db"),
            log_file: dir.path().join("app.log"),
            backup_dir: dir.path().to_path_buf(),
        };

        let user_id = {
            let store = NoteStore::open(&config).unwrap();
            store.signup("alice", "pw").unwrap().user_id().unwrap()
        };
        assert!(config.database.exists());

        let reopened = NoteStore::open(&config).unwrap();
        assert_eq!(reopened.login("alice", "pw").unwrap(), Some(user_id));
    }

    fn capture_errors<F: FnOnce()>(log_path: &Path, f: F) -> String {
        use tracing_subscriber::prelude::*;

        let file = crate::logging::open_log_file(log_path).unwrap();
        let subscriber = tracing_subscriber::registry().with(crate::logging::file_layer(file));
        tracing::subscriber::with_default(subscriber, f);
        std::fs::read_to_string(log_path).unwrap()
    }

    #[test]
    fn test_list_notes_fault_is_logged_and_empty() {
        let dir = tempfile::tempdir().unwrap();
        let (store, user_id) = store_with_user("alice");
        store.insert_note("T", "C", user_id).unwrap();
        store.conn.execute_batch("DROP TABLE NOTE").unwrap();

        let log = capture_errors(&dir.path().join("app.log"), || {
            assert!(store.list_notes(user_id).is_empty());
            assert!(matches!(store.try_list_notes(user_id), Err(Error::Storage(_))));
        });

        assert!(log.contains("ERROR"));
        assert!(log.contains("An error occurred during list notes"));
        assert!(log.contains("no such table: NOTE"));
    }

    #[test]
    fn test_stats_fault_is_logged() {
        let dir = tempfile::tempdir().unwrap();
        let store = NoteStore::open_in_memory().unwrap();
        store.conn.execute_batch("DROP TABLE NOTE").unwrap();

        let log = capture_errors(&dir.path().join("app.log"), || {
            assert!(matches!(store.stats(), Err(Error::Storage(_))));
        });

        assert!(log.contains("An error occurred during stats"));
    }
}
