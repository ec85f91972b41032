//! Database schema definitions

/// Current time as integer milliseconds since the Unix epoch
macro_rules! now_millis_sql {
    () => {
        "CAST(unixepoch('subsec') * 1000 AS INTEGER)"
    };
}

/// Connection-level settings applied before anything else
pub const PRAGMAS: &str = "PRAGMA foreign_keys = ON;";

/// SQL to create the users table
pub const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS USERS (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT UNIQUE NOT NULL,
    password TEXT NOT NULL
)
"#;

/// SQL to create the notes table
pub const CREATE_NOTE_TABLE: &str = concat!(
    r#"
CREATE TABLE IF NOT EXISTS NOTE (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    modified_time INTEGER NOT NULL DEFAULT ("#,
    now_millis_sql!(),
    r#"),
    user_id INTEGER NOT NULL,
    FOREIGN KEY (user_id) REFERENCES USERS(id)
)
"#
);

/// Refreshes `modified_time` whenever a note's text changes. The value
/// always moves forward, even for two edits within one millisecond.
pub const CREATE_MODIFIED_TIME_TRIGGER: &str = concat!(
    r#"
CREATE TRIGGER IF NOT EXISTS update_modified_time
AFTER UPDATE OF title, content ON NOTE
FOR EACH ROW
BEGIN
    UPDATE NOTE SET modified_time = MAX("#,
    now_millis_sql!(),
    r#", OLD.modified_time + 1)
    WHERE id = OLD.id;
END
"#
);

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_note_user_id ON NOTE(user_id)",
];

/// All schema creation statements, in dependency order
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![
        CREATE_USERS_TABLE,
        CREATE_NOTE_TABLE,
        CREATE_MODIFIED_TIME_TRIGGER,
    ];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
