//! Project list editing.
//!
//! # Invariants
//! - New projects are appended; existing entries and ids are untouched.
//! - Toggling visibility keeps the project at its position.

use crate::model::project::{normalize_tags, parse_tag_list, Project};
use crate::model::EntryId;
use crate::model::document::KEY_PROJECTS;
use crate::service::{require, unique_id, EditError, EditResult};

/// Add-project form state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectForm {
    pub name: String,
    pub description: String,
    pub link: String,
    pub tags: Vec<String>,
    pub visible: bool,
}

impl Default for ProjectForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            link: String::new(),
            tags: Vec::new(),
            visible: true,
        }
    }
}

impl ProjectForm {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        link: impl Into<String>,
        tags: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            link: link.into(),
            tags,
            visible: true,
        }
    }

    /// Replaces tags from comma separated input.
    pub fn set_tags_from_input(&mut self, raw: &str) {
        self.tags = parse_tag_list(raw);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Returns `projects` with a new project built from `form` appended.
pub fn add_project(projects: &[Project], form: &ProjectForm) -> EditResult<(Vec<Project>, EntryId)> {
    let name = require("name", &form.name)?;
    let description = require("description", &form.description)?;
    let link = require("link", &form.link)?;

    let id = unique_id(|candidate| projects.iter().any(|project| project.id == candidate));
    let project = Project {
        id: id.clone(),
        name,
        description,
        link,
        tags: normalize_tags(form.tags.clone()),
        visible: form.visible,
    };

    let mut updated = projects.to_vec();
    updated.push(project);
    Ok((updated, id))
}

/// Returns `projects` without the project `id`.
pub fn delete_project(projects: &[Project], id: &str) -> EditResult<Vec<Project>> {
    if !projects.iter().any(|project| project.id == id) {
        return Err(unknown_project(id));
    }
    Ok(projects
        .iter()
        .filter(|project| project.id != id)
        .cloned()
        .collect())
}

/// Returns `projects` with the visibility of project `id` flipped in place.
pub fn toggle_project_visibility(projects: &[Project], id: &str) -> EditResult<Vec<Project>> {
    let mut updated = projects.to_vec();
    let project = updated
        .iter_mut()
        .find(|project| project.id == id)
        .ok_or_else(|| unknown_project(id))?;
    project.toggle_visibility();
    Ok(updated)
}

fn unknown_project(id: &str) -> EditError {
    EditError::UnknownEntry {
        section: KEY_PROJECTS,
        id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{add_project, delete_project, toggle_project_visibility, ProjectForm};
    use crate::model::project::Project;
    use crate::service::EditError;

    fn sample() -> Vec<Project> {
        vec![
            Project::with_id("1", "One", "first", "https://example.com/1", vec![]),
            Project::with_id("2", "Two", "second", "https://example.com/2", vec![]),
        ]
    }

    #[test]
    fn add_requires_name_description_and_link() {
        let form = ProjectForm::new("X", "  ", "Z", vec![]);
        let err = add_project(&sample(), &form).expect_err("blank description");
        assert_eq!(err, EditError::MissingField("description"));
    }

    #[test]
    fn add_appends_with_fresh_id() {
        let projects = sample();
        let form = ProjectForm::new("X", "Y", "Z", vec!["Go".to_string()]);
        let (updated, id) = add_project(&projects, &form).expect("add");
        assert_eq!(updated.len(), 3);
        assert_eq!(&updated[..2], &projects[..]);
        assert_eq!(updated[2].id, id);
        assert!(projects.iter().all(|project| project.id != id));
    }

    #[test]
    fn toggle_unknown_project_fails() {
        let err = toggle_project_visibility(&sample(), "nope").expect_err("unknown id");
        assert!(matches!(err, EditError::UnknownEntry { .. }));
    }

    #[test]
    fn delete_keeps_remaining_order() {
        let updated = delete_project(&sample(), "1").expect("delete");
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].id, "2");
    }

    #[test]
    fn form_reset_restores_visible_default() {
        let mut form = ProjectForm::new("X", "Y", "Z", vec![]);
        form.visible = false;
        form.set_tags_from_input("AI, Web");
        assert_eq!(form.tags, vec!["AI", "Web"]);
        form.reset();
        assert_eq!(form, ProjectForm::default());
        assert!(form.visible);
    }
}
