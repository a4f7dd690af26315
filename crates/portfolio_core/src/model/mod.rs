//! Portfolio document model.
//!
//! # Responsibility
//! - Define the canonical shape of all editable portfolio content.
//! - Own field-level invariants the renderer relies on.
//!
//! # Invariants
//! - Every list entry that can be deleted by id carries a stable `EntryId`.
//! - Ids are assigned once at creation and never regenerated on edit.
//! - Decoding tolerates missing keys; older documents load as empty sections.

pub mod document;
pub mod personal_info;
pub mod project;
pub mod skill;
pub mod timeline;
pub mod validation;

use uuid::Uuid;

/// Opaque identifier for projects, experience and education entries.
///
/// Kept as a plain string: persisted documents may carry ids produced by
/// older editors (`"1"`, `"2"`, epoch millis) that are not UUIDs.
pub type EntryId = String;

/// Generates a fresh time-ordered entry id.
pub fn new_entry_id() -> EntryId {
    Uuid::now_v7().to_string()
}
