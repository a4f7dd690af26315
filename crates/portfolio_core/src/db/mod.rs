//! Portfolio database file shared by the slot and document backends.
//!
//! # Responsibility
//! - Open the database and bring the `slots` and `documents` tables to the
//!   schema this build writes.
//! - Report storage failures as `DbError`.
//!
//! # Invariants
//! - Every connection handed out has both backend tables.
//! - A database migrated by a newer build is refused, never rewritten.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure opening or querying the portfolio database.
#[derive(Debug)]
pub enum DbError {
    /// SQLite call failed.
    Storage(rusqlite::Error),
    /// `user_version` is ahead of the last migration this build ships.
    SchemaTooNew { found: u32, supported: u32 },
    /// Schema version is current but a backend table is absent.
    MissingTable(&'static str),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "portfolio database error: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "portfolio database schema v{found} comes from a newer build (this build knows v{supported})"
            ),
            Self::MissingTable(table) => {
                write!(f, "portfolio database has no `{table}` table")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::SchemaTooNew { .. } | Self::MissingTable(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(value)
    }
}
