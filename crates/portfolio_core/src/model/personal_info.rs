//! Personal info section of the portfolio document.

use crate::model::validation::{check_asset, check_email, check_link, DocumentValidationError};
use serde::{Deserialize, Serialize};

/// Profile fields rendered by hero, about, resume and contact sections.
///
/// Free-text fields (`about`, `professional_summary`) may hold several
/// paragraphs separated by a blank line; see `view::paragraphs`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub name: String,
    pub title: String,
    pub email: String,
    pub linkedin: String,
    pub github: String,
    pub college: String,
    pub cgpa: String,
    /// Biography shown in the about section.
    pub about: String,
    pub currently_exploring: Vec<String>,
    pub resume_link: String,
    pub professional_summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    /// Rotating strings for the hero typing animation, in display order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub looping_texts: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

impl PersonalInfo {
    /// Validates contact and link fields. Empty fields count as absent.
    pub fn validate(&self) -> Result<(), DocumentValidationError> {
        check_email(&self.email)?;
        check_link("github", &self.github)?;
        check_link("linkedin", &self.linkedin)?;
        check_link("resumeLink", &self.resume_link)?;
        if let Some(image) = self.profile_image.as_deref() {
            check_asset("profileImage", image)?;
        }
        Ok(())
    }
}
