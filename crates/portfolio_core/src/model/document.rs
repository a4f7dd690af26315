//! Root portfolio document and its partial-update shape.
//!
//! # Responsibility
//! - Define the single aggregate record holding all portfolio content.
//! - Define `PartialPortfolioDocument`, the top-level patch used by editors.
//!
//! # Invariants
//! - Top-level JSON keys are `personalInfo`, `skills`, `projects`,
//!   `experiences`, `education`.
//! - Missing top-level keys decode as empty/default sections.

use crate::model::personal_info::PersonalInfo;
use crate::model::project::Project;
use crate::model::skill::{SkillCategory, MAX_SKILL_LEVEL};
use crate::model::timeline::{EducationItem, ExperienceItem};
use crate::model::validation::DocumentValidationError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

pub const KEY_PERSONAL_INFO: &str = "personalInfo";
pub const KEY_SKILLS: &str = "skills";
pub const KEY_PROJECTS: &str = "projects";
pub const KEY_EXPERIENCES: &str = "experiences";
pub const KEY_EDUCATION: &str = "education";

/// Canonical portfolio content, one instance per deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PortfolioDocument {
    pub personal_info: PersonalInfo,
    pub skills: Vec<SkillCategory>,
    pub projects: Vec<Project>,
    pub experiences: Vec<ExperienceItem>,
    pub education: Vec<EducationItem>,
}

impl PortfolioDocument {
    /// Checks every model invariant and reports the first violation.
    pub fn validate(&self) -> Result<(), DocumentValidationError> {
        self.personal_info.validate()?;
        check_unique_ids(KEY_PROJECTS, self.projects.iter().map(|p| p.id.as_str()))?;
        check_unique_ids(
            KEY_EXPERIENCES,
            self.experiences.iter().map(|e| e.id.as_str()),
        )?;
        check_unique_ids(KEY_EDUCATION, self.education.iter().map(|e| e.id.as_str()))?;

        let mut categories = BTreeSet::new();
        for category in &self.skills {
            if !categories.insert(category.category.as_str()) {
                return Err(DocumentValidationError::DuplicateCategory(
                    category.category.clone(),
                ));
            }
            let mut names = BTreeSet::new();
            for skill in &category.skills {
                if skill.level > MAX_SKILL_LEVEL {
                    return Err(DocumentValidationError::SkillLevelOutOfRange {
                        name: skill.name.clone(),
                        level: skill.level,
                    });
                }
                if !names.insert(skill.name.to_lowercase()) {
                    return Err(DocumentValidationError::DuplicateSkill {
                        category: category.category.clone(),
                        name: skill.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == id)
    }

    pub fn skill_category(&self, category: &str) -> Option<&SkillCategory> {
        self.skills.iter().find(|c| c.category == category)
    }

    /// Serializes into a top-level JSON object.
    pub fn to_fields(&self) -> serde_json::Result<Map<String, Value>> {
        into_object(serde_json::to_value(self)?)
    }
}

fn check_unique_ids<'a>(
    section: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), DocumentValidationError> {
    let mut seen = BTreeSet::new();
    for id in ids {
        if id.trim().is_empty() {
            return Err(DocumentValidationError::EmptyId { section });
        }
        if !seen.insert(id) {
            return Err(DocumentValidationError::DuplicateId {
                section,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

/// Subset of top-level document sections.
///
/// Each present section fully replaces the current one when applied; there is
/// no nested merging at update time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialPortfolioDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_info: Option<PersonalInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<SkillCategory>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<Project>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experiences: Option<Vec<ExperienceItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<Vec<EducationItem>>,
}

impl PartialPortfolioDocument {
    pub fn with_personal_info(personal_info: PersonalInfo) -> Self {
        Self {
            personal_info: Some(personal_info),
            ..Self::default()
        }
    }

    pub fn with_skills(skills: Vec<SkillCategory>) -> Self {
        Self {
            skills: Some(skills),
            ..Self::default()
        }
    }

    pub fn with_projects(projects: Vec<Project>) -> Self {
        Self {
            projects: Some(projects),
            ..Self::default()
        }
    }

    pub fn with_experiences(experiences: Vec<ExperienceItem>) -> Self {
        Self {
            experiences: Some(experiences),
            ..Self::default()
        }
    }

    pub fn with_education(education: Vec<EducationItem>) -> Self {
        Self {
            education: Some(education),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keys().is_empty()
    }

    /// Top-level keys present in this patch, in document order.
    pub fn keys(&self) -> Vec<&'static str> {
        let mut keys = Vec::new();
        if self.personal_info.is_some() {
            keys.push(KEY_PERSONAL_INFO);
        }
        if self.skills.is_some() {
            keys.push(KEY_SKILLS);
        }
        if self.projects.is_some() {
            keys.push(KEY_PROJECTS);
        }
        if self.experiences.is_some() {
            keys.push(KEY_EXPERIENCES);
        }
        if self.education.is_some() {
            keys.push(KEY_EDUCATION);
        }
        keys
    }

    /// Serializes only the present sections into a top-level JSON object.
    pub fn to_fields(&self) -> serde_json::Result<Map<String, Value>> {
        into_object(serde_json::to_value(self)?)
    }
}

fn into_object(value: Value) -> serde_json::Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(serde::ser::Error::custom(
            "portfolio document must serialize to an object",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::{PartialPortfolioDocument, PortfolioDocument};
    use crate::model::project::Project;
    use crate::model::skill::{Skill, SkillCategory};
    use crate::model::validation::DocumentValidationError;

    #[test]
    fn older_document_without_timelines_decodes_as_empty() {
        let document: PortfolioDocument = serde_json::from_str(
            r#"{"personalInfo":{"name":"Dev"},"skills":[],"projects":[],"internship":{"company":"X"}}"#,
        )
        .expect("legacy document should decode");
        assert_eq!(document.personal_info.name, "Dev");
        assert!(document.experiences.is_empty());
        assert!(document.education.is_empty());
    }

    #[test]
    fn validate_rejects_duplicate_project_ids() {
        let mut document = PortfolioDocument::default();
        document.projects = vec![
            Project::with_id("1", "a", "b", "c", vec![]),
            Project::with_id("1", "d", "e", "f", vec![]),
        ];
        let err = document.validate().expect_err("duplicate ids must fail");
        assert!(matches!(err, DocumentValidationError::DuplicateId { .. }));
    }

    #[test]
    fn validate_rejects_case_insensitive_duplicate_skills() {
        let mut document = PortfolioDocument::default();
        document.skills = vec![SkillCategory::new(
            "Languages",
            vec![Skill::new("Rust", 90), Skill::new("rust", 40)],
        )];
        let err = document.validate().expect_err("duplicate skills must fail");
        assert!(matches!(err, DocumentValidationError::DuplicateSkill { .. }));
    }

    #[test]
    fn partial_fields_contain_only_present_keys() {
        let partial = PartialPortfolioDocument::with_projects(vec![]);
        assert_eq!(partial.keys(), vec!["projects"]);
        let fields = partial.to_fields().expect("partial should serialize");
        assert_eq!(fields.len(), 1);
        assert!(fields.contains_key("projects"));
    }
}
