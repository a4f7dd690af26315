//! Admin editing use-cases.
//!
//! # Responsibility
//! - Turn add/delete/toggle actions into validated partial documents.
//! - Keep add-form state transitions (reset on success) next to the rules.
//!
//! # Invariants
//! - Operations are pure over the current document; only `PortfolioEditor`
//!   talks to the store.
//! - A failed operation changes neither the document nor the form.

pub mod editor;
pub mod profile;
pub mod projects;
pub mod skills;
pub mod timeline;

use crate::model::validation::DocumentValidationError;
use crate::model::{new_entry_id, EntryId};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type EditResult<T> = Result<T, EditError>;

/// Validation failure of one editing action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// A required form field is empty.
    MissingField(&'static str),
    /// Neither an existing nor a new skill category was given.
    MissingCategory,
    /// Same-name (case-insensitive) skill already in the target category.
    DuplicateSkill { category: String, name: String },
    /// Skill level above 100.
    InvalidLevel(u8),
    /// No entry with this id in the given section.
    UnknownEntry { section: &'static str, id: EntryId },
    /// No skill with this name in the given category.
    UnknownSkill { category: String, name: String },
    /// Profile value failed format checks.
    InvalidValue(DocumentValidationError),
    /// No personal-info field with this name.
    UnknownField(String),
}

impl Display for EditError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "`{field}` is required"),
            Self::MissingCategory => write!(f, "select or create a skill category"),
            Self::DuplicateSkill { category, name } => {
                write!(f, "skill `{name}` already exists in category `{category}`")
            }
            Self::InvalidLevel(level) => write!(f, "skill level {level} is out of range 0..=100"),
            Self::UnknownEntry { section, id } => write!(f, "no `{section}` entry with id `{id}`"),
            Self::UnknownSkill { category, name } => {
                write!(f, "no skill `{name}` in category `{category}`")
            }
            Self::InvalidValue(err) => write!(f, "{err}"),
            Self::UnknownField(field) => write!(f, "unknown profile field `{field}`"),
        }
    }
}

impl Error for EditError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidValue(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DocumentValidationError> for EditError {
    fn from(value: DocumentValidationError) -> Self {
        Self::InvalidValue(value)
    }
}

/// Returns the trimmed value, or `MissingField` when it is blank.
pub(crate) fn require(field: &'static str, value: &str) -> EditResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EditError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

/// Generates an id for which `taken` returns false.
pub(crate) fn unique_id(taken: impl Fn(&str) -> bool) -> EntryId {
    loop {
        let candidate = new_entry_id();
        if !taken(&candidate) {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{require, unique_id, EditError};
    use std::cell::Cell;

    #[test]
    fn require_trims_and_rejects_blank() {
        assert_eq!(require("name", "  Ada ").expect("present"), "Ada");
        assert_eq!(require("name", " \t"), Err(EditError::MissingField("name")));
    }

    #[test]
    fn unique_id_retries_until_free() {
        let rejected = Cell::new(0);
        let id = unique_id(|_| {
            rejected.set(rejected.get() + 1);
            rejected.get() <= 2
        });
        assert_eq!(rejected.get(), 3);
        assert!(!id.is_empty());
    }
}
