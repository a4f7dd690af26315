//! Skill list editing.
//!
//! # Invariants
//! - Skill names stay unique per category, compared case-insensitively.
//! - Deleting leaves no empty category behind.

use crate::model::document::PortfolioDocument;
use crate::model::skill::{Skill, SkillCategory, MAX_SKILL_LEVEL};
use crate::service::{require, EditError, EditResult};

/// Level preselected by a fresh skill form.
pub const DEFAULT_SKILL_LEVEL: u8 = 80;

/// Add-skill form state.
///
/// `new_category`, when non-blank, wins over `selected_category`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillForm {
    pub name: String,
    pub level: u8,
    pub selected_category: String,
    pub new_category: String,
}

impl Default for SkillForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            level: DEFAULT_SKILL_LEVEL,
            selected_category: String::new(),
            new_category: String::new(),
        }
    }
}

impl SkillForm {
    /// Fresh form preselecting the first existing category.
    pub fn for_document(document: &PortfolioDocument) -> Self {
        Self {
            selected_category: document
                .skills
                .first()
                .map(|category| category.category.clone())
                .unwrap_or_default(),
            ..Self::default()
        }
    }

    /// Category the next add targets, if any.
    pub fn target_category(&self) -> Option<String> {
        let typed = self.new_category.trim();
        if !typed.is_empty() {
            return Some(typed.to_string());
        }
        let selected = self.selected_category.trim();
        (!selected.is_empty()).then(|| selected.to_string())
    }

    /// Clears the entry fields and keeps `category` selected.
    pub fn reset_after_add(&mut self, category: String) {
        self.name.clear();
        self.level = DEFAULT_SKILL_LEVEL;
        self.new_category.clear();
        self.selected_category = category;
    }
}

/// Returns `skills` with the form's skill added and the resolved category.
pub fn add_skill(
    skills: &[SkillCategory],
    form: &SkillForm,
) -> EditResult<(Vec<SkillCategory>, String)> {
    let name = require("name", &form.name)?;
    let category = form.target_category().ok_or(EditError::MissingCategory)?;
    if form.level > MAX_SKILL_LEVEL {
        return Err(EditError::InvalidLevel(form.level));
    }

    let mut updated = skills.to_vec();
    let skill = Skill::new(name, form.level);
    match updated.iter_mut().find(|c| c.category == category) {
        Some(existing) => {
            if existing.has_skill(&skill.name) {
                return Err(EditError::DuplicateSkill {
                    category,
                    name: skill.name,
                });
            }
            existing.skills.push(skill);
        }
        None => updated.push(SkillCategory::new(category.clone(), vec![skill])),
    }
    Ok((updated, category))
}

/// Returns `skills` without `name` in `category`, pruning empty categories.
pub fn delete_skill(
    skills: &[SkillCategory],
    category: &str,
    name: &str,
) -> EditResult<Vec<SkillCategory>> {
    let found = skills
        .iter()
        .find(|c| c.category == category)
        .is_some_and(|c| c.skills.iter().any(|skill| skill.name == name));
    if !found {
        return Err(EditError::UnknownSkill {
            category: category.to_string(),
            name: name.to_string(),
        });
    }

    Ok(skills
        .iter()
        .map(|c| {
            if c.category != category {
                return c.clone();
            }
            let remaining = c
                .skills
                .iter()
                .filter(|skill| skill.name != name)
                .cloned()
                .collect();
            SkillCategory::new(c.category.clone(), remaining)
        })
        .filter(|c| !c.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::{add_skill, delete_skill, SkillForm, DEFAULT_SKILL_LEVEL};
    use crate::model::skill::{Skill, SkillCategory};
    use crate::service::EditError;

    fn sample() -> Vec<SkillCategory> {
        vec![
            SkillCategory::new(
                "Languages",
                vec![Skill::new("Rust", 90), Skill::new("Go", 70), Skill::new("C", 60)],
            ),
            SkillCategory::new("Databases", vec![Skill::new("SQLite", 85)]),
        ]
    }

    fn form(name: &str, selected: &str, new_category: &str) -> SkillForm {
        SkillForm {
            name: name.to_string(),
            level: 75,
            selected_category: selected.to_string(),
            new_category: new_category.to_string(),
        }
    }

    #[test]
    fn typed_category_wins_over_selection() {
        let (updated, category) =
            add_skill(&sample(), &form("Docker", "Languages", " Dev Tools ")).expect("add");
        assert_eq!(category, "Dev Tools");
        assert_eq!(updated.len(), 3);
        assert_eq!(updated[2].skills, vec![Skill::new("Docker", 75)]);
        assert_eq!(updated[0].skills.len(), 3);
    }

    #[test]
    fn adds_to_selected_existing_category() {
        let (updated, _) = add_skill(&sample(), &form("Zig", "Languages", "")).expect("add");
        assert_eq!(updated[0].skills.last(), Some(&Skill::new("Zig", 75)));
    }

    #[test]
    fn rejects_case_insensitive_duplicate() {
        let err = add_skill(&sample(), &form("rust", "Languages", "")).expect_err("duplicate");
        assert!(matches!(err, EditError::DuplicateSkill { .. }));
    }

    #[test]
    fn rejects_missing_category_and_bad_level() {
        assert_eq!(
            add_skill(&sample(), &form("Zig", "", "  ")).expect_err("no category"),
            EditError::MissingCategory
        );
        let mut too_high = form("Zig", "Languages", "");
        too_high.level = 101;
        assert_eq!(
            add_skill(&sample(), &too_high).expect_err("level"),
            EditError::InvalidLevel(101)
        );
    }

    #[test]
    fn deleting_last_skill_removes_category() {
        let updated = delete_skill(&sample(), "Databases", "SQLite").expect("delete");
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].category, "Languages");
    }

    #[test]
    fn deleting_middle_skill_keeps_relative_order() {
        let updated = delete_skill(&sample(), "Languages", "Go").expect("delete");
        let names: Vec<&str> = updated[0].skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Rust", "C"]);
    }

    #[test]
    fn reset_after_add_selects_target() {
        let mut form = form("Zig", "Languages", "Systems");
        form.reset_after_add("Systems".to_string());
        assert!(form.name.is_empty());
        assert!(form.new_category.is_empty());
        assert_eq!(form.level, DEFAULT_SKILL_LEVEL);
        assert_eq!(form.selected_category, "Systems");
    }
}
