//! Personal-info field editing.
//!
//! # Invariants
//! - One edit touches exactly one field.
//! - Contact and link fields are format-checked before they are applied.

use crate::model::personal_info::PersonalInfo;
use crate::model::validation::{check_asset, check_email, check_link};
use crate::service::{EditError, EditResult};

/// Replacement value for one personal-info field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileEdit {
    Name(String),
    Title(String),
    Email(String),
    Linkedin(String),
    Github(String),
    College(String),
    Cgpa(String),
    About(String),
    CurrentlyExploring(Vec<String>),
    ResumeLink(String),
    ProfessionalSummary(String),
    Tagline(Option<String>),
    LoopingTexts(Option<Vec<String>>),
    ProfileImage(Option<String>),
}

impl ProfileEdit {
    /// Builds an edit from a document field name and raw text.
    ///
    /// List fields take comma separated items; optional fields are cleared by
    /// an empty value.
    pub fn parse(field: &str, value: &str) -> EditResult<Self> {
        let text = value.to_string();
        let edit = match field {
            "name" => Self::Name(text),
            "title" => Self::Title(text),
            "email" => Self::Email(text),
            "linkedin" => Self::Linkedin(text),
            "github" => Self::Github(text),
            "college" => Self::College(text),
            "cgpa" => Self::Cgpa(text),
            "about" => Self::About(text),
            "currentlyExploring" => Self::CurrentlyExploring(split_items(value)),
            "resumeLink" => Self::ResumeLink(text),
            "professionalSummary" => Self::ProfessionalSummary(text),
            "tagline" => Self::Tagline(non_blank(value)),
            "loopingTexts" => {
                let items = split_items(value);
                Self::LoopingTexts((!items.is_empty()).then_some(items))
            }
            "profileImage" => Self::ProfileImage(non_blank(value)),
            other => return Err(EditError::UnknownField(other.to_string())),
        };
        Ok(edit)
    }

    /// Document field name this edit replaces.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Name(_) => "name",
            Self::Title(_) => "title",
            Self::Email(_) => "email",
            Self::Linkedin(_) => "linkedin",
            Self::Github(_) => "github",
            Self::College(_) => "college",
            Self::Cgpa(_) => "cgpa",
            Self::About(_) => "about",
            Self::CurrentlyExploring(_) => "currentlyExploring",
            Self::ResumeLink(_) => "resumeLink",
            Self::ProfessionalSummary(_) => "professionalSummary",
            Self::Tagline(_) => "tagline",
            Self::LoopingTexts(_) => "loopingTexts",
            Self::ProfileImage(_) => "profileImage",
        }
    }
}

/// Returns `info` with `edit` applied.
pub fn apply_profile_edit(info: &PersonalInfo, edit: ProfileEdit) -> EditResult<PersonalInfo> {
    let mut updated = info.clone();
    match edit {
        ProfileEdit::Name(value) => updated.name = value,
        ProfileEdit::Title(value) => updated.title = value,
        ProfileEdit::Email(value) => {
            check_email(&value)?;
            updated.email = value;
        }
        ProfileEdit::Linkedin(value) => {
            check_link("linkedin", &value)?;
            updated.linkedin = value;
        }
        ProfileEdit::Github(value) => {
            check_link("github", &value)?;
            updated.github = value;
        }
        ProfileEdit::College(value) => updated.college = value,
        ProfileEdit::Cgpa(value) => updated.cgpa = value,
        ProfileEdit::About(value) => updated.about = value,
        ProfileEdit::CurrentlyExploring(items) => updated.currently_exploring = items,
        ProfileEdit::ResumeLink(value) => {
            check_link("resumeLink", &value)?;
            updated.resume_link = value;
        }
        ProfileEdit::ProfessionalSummary(value) => updated.professional_summary = value,
        ProfileEdit::Tagline(value) => updated.tagline = value,
        ProfileEdit::LoopingTexts(items) => updated.looping_texts = items,
        ProfileEdit::ProfileImage(value) => {
            if let Some(path) = value.as_deref() {
                check_asset("profileImage", path)?;
            }
            updated.profile_image = value;
        }
    }
    Ok(updated)
}

fn split_items(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
