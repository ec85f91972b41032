//! User accounts
//!
//! Usernames are case-insensitive: they are folded to lowercase before
//! they are stored or compared. Passwords never reach the database in
//! plaintext, only as a BLAKE3 hex digest.

use crate::{Error, Result};
use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Identifier of a row in the `USERS` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<i64>()
            .map(UserId)
            .map_err(|_| Error::InvalidId(format!("not a user id: {}", s)))
    }
}

impl ToSql for UserId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        self.0.to_sql()
    }
}

impl FromSql for UserId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(UserId)
    }
}

/// Outcome of a signup attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "user_id", rename_all = "snake_case")]
pub enum Signup {
    /// A new account was written
    Created(UserId),
    /// The folded username is taken; nothing was written
    AlreadyExists,
}

impl Signup {
    pub fn is_created(&self) -> bool {
        matches!(self, Signup::Created(_))
    }

    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Signup::Created(id) => Some(*id),
            Signup::AlreadyExists => None,
        }
    }
}

/// Fold a username to its stored form.
pub fn normalize_username(username: &str) -> String {
    username.to_lowercase()
}

/// Deterministic one-way digest of a password (lowercase hex).
pub fn hash_password(password: &str) -> String {
    blake3::hash(password.as_bytes()).to_hex().to_string()
}
