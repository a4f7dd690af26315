//! Experience and education timeline entries.

use crate::model::{new_entry_id, EntryId};
use serde::{Deserialize, Serialize};

/// One work experience entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceItem {
    #[serde(default)]
    pub id: EntryId,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub company: String,
    /// Free-text range, e.g. `May 2025 - June 2025`.
    #[serde(default)]
    pub duration: String,
    /// Bullet points in display order. Never contains blank bullets.
    #[serde(default)]
    pub description: Vec<String>,
}

impl ExperienceItem {
    /// Creates an entry with a fresh id. Blank bullets are dropped.
    pub fn new(
        role: impl Into<String>,
        company: impl Into<String>,
        duration: impl Into<String>,
        description: Vec<String>,
    ) -> Self {
        Self {
            id: new_entry_id(),
            role: role.into(),
            company: company.into(),
            duration: duration.into(),
            description: description
                .into_iter()
                .filter(|bullet| !bullet.trim().is_empty())
                .collect(),
        }
    }
}

/// One education entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationItem {
    #[serde(default)]
    pub id: EntryId,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub degree: String,
    /// Free-text duration or grade, e.g. `2021-2025` or `CGPA: 8.85`.
    #[serde(default)]
    pub duration: String,
}

impl EducationItem {
    pub fn new(
        institution: impl Into<String>,
        degree: impl Into<String>,
        duration: impl Into<String>,
    ) -> Self {
        Self {
            id: new_entry_id(),
            institution: institution.into(),
            degree: degree.into(),
            duration: duration.into(),
        }
    }
}
