//! Project entries shown in the projects grid.
//!
//! # Invariants
//! - `id` is assigned at creation and never mutated or reused.
//! - `tags` holds no duplicates; order is the author's display order.
//! - Toggling visibility never moves a project within its sequence.

use crate::model::{new_entry_id, EntryId};
use serde::{Deserialize, Serialize};

/// One showcased project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub id: EntryId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Hidden projects stay in the document but are skipped by public views.
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

impl Project {
    /// Creates a visible project with a freshly generated id.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        link: impl Into<String>,
        tags: Vec<String>,
    ) -> Self {
        Self::with_id(new_entry_id(), name, description, link, tags)
    }

    /// Creates a visible project with a caller-provided id.
    pub fn with_id(
        id: impl Into<EntryId>,
        name: impl Into<String>,
        description: impl Into<String>,
        link: impl Into<String>,
        tags: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            link: link.into(),
            tags: normalize_tags(tags),
            visible: true,
        }
    }

    pub fn toggle_visibility(&mut self) {
        self.visible = !self.visible;
    }

    /// Case-sensitive exact tag membership.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|candidate| candidate == tag)
    }
}

/// Trims tags, drops empty ones and removes duplicates keeping first order.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let trimmed = tag.trim();
        if trimmed.is_empty() || normalized.iter().any(|seen| seen == trimmed) {
            continue;
        }
        normalized.push(trimmed.to_string());
    }
    normalized
}

/// Splits a comma separated tag input (`"AI, Rust ,"`) into tags.
pub fn parse_tag_list(raw: &str) -> Vec<String> {
    normalize_tags(raw.split(',').map(str::to_string).collect())
}
