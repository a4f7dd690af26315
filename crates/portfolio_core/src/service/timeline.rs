//! Experience and education editing.

use crate::model::document::{KEY_EDUCATION, KEY_EXPERIENCES};
use crate::model::timeline::{EducationItem, ExperienceItem};
use crate::model::EntryId;
use crate::service::{require, unique_id, EditError, EditResult};

/// Add-experience form state. Always holds at least one bullet slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperienceForm {
    pub role: String,
    pub company: String,
    pub duration: String,
    pub description: Vec<String>,
}

impl Default for ExperienceForm {
    fn default() -> Self {
        Self {
            role: String::new(),
            company: String::new(),
            duration: String::new(),
            description: vec![String::new()],
        }
    }
}

impl ExperienceForm {
    pub fn new(
        role: impl Into<String>,
        company: impl Into<String>,
        duration: impl Into<String>,
        description: Vec<String>,
    ) -> Self {
        let mut form = Self {
            role: role.into(),
            company: company.into(),
            duration: duration.into(),
            description,
        };
        if form.description.is_empty() {
            form.add_bullet();
        }
        form
    }

    /// Appends an empty bullet slot.
    pub fn add_bullet(&mut self) {
        self.description.push(String::new());
    }

    /// Overwrites bullet `index`; returns false when out of range.
    pub fn set_bullet(&mut self, index: usize, text: impl Into<String>) -> bool {
        match self.description.get_mut(index) {
            Some(slot) => {
                *slot = text.into();
                true
            }
            None => false,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Add-education form state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EducationForm {
    pub institution: String,
    pub degree: String,
    pub duration: String,
}

impl EducationForm {
    pub fn new(
        institution: impl Into<String>,
        degree: impl Into<String>,
        duration: impl Into<String>,
    ) -> Self {
        Self {
            institution: institution.into(),
            degree: degree.into(),
            duration: duration.into(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Returns `experiences` with the form's entry appended and its id.
pub fn add_experience(
    experiences: &[ExperienceItem],
    form: &ExperienceForm,
) -> EditResult<(Vec<ExperienceItem>, EntryId)> {
    let role = require("role", &form.role)?;
    let company = require("company", &form.company)?;
    let duration = require("duration", &form.duration)?;

    let mut item = ExperienceItem::new(role, company, duration, form.description.clone());
    item.id = unique_id(|candidate| experiences.iter().any(|entry| entry.id == candidate));
    let id = item.id.clone();

    let mut updated = experiences.to_vec();
    updated.push(item);
    Ok((updated, id))
}

pub fn delete_experience(experiences: &[ExperienceItem], id: &str) -> EditResult<Vec<ExperienceItem>> {
    if !experiences.iter().any(|entry| entry.id == id) {
        return Err(EditError::UnknownEntry {
            section: KEY_EXPERIENCES,
            id: id.to_string(),
        });
    }
    Ok(experiences.iter().filter(|entry| entry.id != id).cloned().collect())
}

/// Returns `education` with the form's entry appended and its id.
pub fn add_education(
    education: &[EducationItem],
    form: &EducationForm,
) -> EditResult<(Vec<EducationItem>, EntryId)> {
    let institution = require("institution", &form.institution)?;
    let degree = require("degree", &form.degree)?;
    let duration = require("duration", &form.duration)?;

    let mut item = EducationItem::new(institution, degree, duration);
    item.id = unique_id(|candidate| education.iter().any(|entry| entry.id == candidate));
    let id = item.id.clone();

    let mut updated = education.to_vec();
    updated.push(item);
    Ok((updated, id))
}

pub fn delete_education(education: &[EducationItem], id: &str) -> EditResult<Vec<EducationItem>> {
    if !education.iter().any(|entry| entry.id == id) {
        return Err(EditError::UnknownEntry {
            section: KEY_EDUCATION,
            id: id.to_string(),
        });
    }
    Ok(education.iter().filter(|entry| entry.id != id).cloned().collect())
}
