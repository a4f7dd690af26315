//! Store-backed editing facade used by admin surfaces.
//!
//! # Responsibility
//! - Read the current section from the store, run the pure edit, and route
//!   the new section through `DocumentStore::update_data`.
//! - Reset add-forms after a successful add.

use crate::model::document::PartialPortfolioDocument;
use crate::model::EntryId;
use crate::service::profile::{apply_profile_edit, ProfileEdit};
use crate::service::projects::{self, ProjectForm};
use crate::service::skills::{self, SkillForm};
use crate::service::timeline::{self, EducationForm, ExperienceForm};
use crate::service::EditResult;
use crate::store::DocumentStore;
use log::{info, warn};

/// Editing entry point bound to one store.
pub struct PortfolioEditor<'s> {
    store: &'s DocumentStore,
}

impl<'s> PortfolioEditor<'s> {
    pub fn new(store: &'s DocumentStore) -> Self {
        Self { store }
    }

    /// Appends a project built from `form` and resets the form.
    pub fn add_project(&self, form: &mut ProjectForm) -> EditResult<EntryId> {
        let current = self.store.document().projects;
        let (updated, id) = logged("add_project", projects::add_project(&current, form))?;
        self.store
            .update_data(PartialPortfolioDocument::with_projects(updated));
        form.reset();
        info!("event=edit_add_project module=service status=ok id={id}");
        Ok(id)
    }

    pub fn delete_project(&self, id: &str) -> EditResult<()> {
        let current = self.store.document().projects;
        let updated = logged("delete_project", projects::delete_project(&current, id))?;
        self.store
            .update_data(PartialPortfolioDocument::with_projects(updated));
        info!("event=edit_delete_project module=service status=ok id={id}");
        Ok(())
    }

    /// Flips visibility of project `id` and returns the new value.
    pub fn toggle_project_visibility(&self, id: &str) -> EditResult<bool> {
        let current = self.store.document().projects;
        let updated = logged(
            "toggle_project",
            projects::toggle_project_visibility(&current, id),
        )?;
        let visible = updated
            .iter()
            .find(|project| project.id == id)
            .is_some_and(|project| project.visible);
        self.store
            .update_data(PartialPortfolioDocument::with_projects(updated));
        info!("event=edit_toggle_project module=service status=ok id={id} visible={visible}");
        Ok(visible)
    }

    /// Adds the form's skill and returns the category it landed in.
    pub fn add_skill(&self, form: &mut SkillForm) -> EditResult<String> {
        let current = self.store.document().skills;
        let (updated, category) = logged("add_skill", skills::add_skill(&current, form))?;
        self.store
            .update_data(PartialPortfolioDocument::with_skills(updated));
        form.reset_after_add(category.clone());
        info!("event=edit_add_skill module=service status=ok category={category}");
        Ok(category)
    }

    pub fn delete_skill(&self, category: &str, name: &str) -> EditResult<()> {
        let current = self.store.document().skills;
        let updated = logged("delete_skill", skills::delete_skill(&current, category, name))?;
        self.store
            .update_data(PartialPortfolioDocument::with_skills(updated));
        info!("event=edit_delete_skill module=service status=ok category={category}");
        Ok(())
    }

    pub fn add_experience(&self, form: &mut ExperienceForm) -> EditResult<EntryId> {
        let current = self.store.document().experiences;
        let (updated, id) = logged("add_experience", timeline::add_experience(&current, form))?;
        self.store
            .update_data(PartialPortfolioDocument::with_experiences(updated));
        form.reset();
        info!("event=edit_add_experience module=service status=ok id={id}");
        Ok(id)
    }

    pub fn delete_experience(&self, id: &str) -> EditResult<()> {
        let current = self.store.document().experiences;
        let updated = logged("delete_experience", timeline::delete_experience(&current, id))?;
        self.store
            .update_data(PartialPortfolioDocument::with_experiences(updated));
        info!("event=edit_delete_experience module=service status=ok id={id}");
        Ok(())
    }

    pub fn add_education(&self, form: &mut EducationForm) -> EditResult<EntryId> {
        let current = self.store.document().education;
        let (updated, id) = logged("add_education", timeline::add_education(&current, form))?;
        self.store
            .update_data(PartialPortfolioDocument::with_education(updated));
        form.reset();
        info!("event=edit_add_education module=service status=ok id={id}");
        Ok(id)
    }

    pub fn delete_education(&self, id: &str) -> EditResult<()> {
        let current = self.store.document().education;
        let updated = logged("delete_education", timeline::delete_education(&current, id))?;
        self.store
            .update_data(PartialPortfolioDocument::with_education(updated));
        info!("event=edit_delete_education module=service status=ok id={id}");
        Ok(())
    }

    /// Replaces one personal-info field and persists the whole section.
    pub fn update_personal_info_field(&self, edit: ProfileEdit) -> EditResult<()> {
        let field = edit.field();
        let current = self.store.document().personal_info;
        let updated = logged("update_profile", apply_profile_edit(&current, edit))?;
        self.store
            .update_data(PartialPortfolioDocument::with_personal_info(updated));
        info!("event=edit_update_profile module=service status=ok field={field}");
        Ok(())
    }
}

fn logged<T>(action: &str, result: EditResult<T>) -> EditResult<T> {
    if let Err(err) = &result {
        warn!("event=edit_{action} module=service status=rejected error={err}");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::PortfolioEditor;
    use crate::backend::{SqliteSlotBackend, DEFAULT_SLOT_KEY};
    use crate::service::projects::ProjectForm;
    use crate::service::skills::SkillForm;
    use crate::service::EditError;
    use crate::store::DocumentStore;
    use std::sync::Arc;

    fn loaded_store() -> DocumentStore {
        let backend =
            SqliteSlotBackend::open_in_memory(DEFAULT_SLOT_KEY).expect("slot backend");
        let store = DocumentStore::new(Arc::new(backend));
        store.load();
        store
    }

    #[test]
    fn failed_add_leaves_form_and_document_untouched() {
        let store = loaded_store();
        let before = store.document();
        let editor = PortfolioEditor::new(&store);

        let mut form = ProjectForm::new("X", "", "Z", vec![]);
        let err = editor.add_project(&mut form).expect_err("missing description");
        assert_eq!(err, EditError::MissingField("description"));
        assert_eq!(form.name, "X");
        assert_eq!(store.document(), before);
    }

    #[test]
    fn toggle_twice_restores_visibility() {
        let store = loaded_store();
        let editor = PortfolioEditor::new(&store);
        let before = store.document().projects;
        let id = before[0].id.clone();

        let first = editor.toggle_project_visibility(&id).expect("toggle");
        assert_eq!(first, !before[0].visible);
        editor.toggle_project_visibility(&id).expect("toggle back");
        assert_eq!(store.document().projects, before);
    }

    #[test]
    fn add_skill_resets_form_to_target_category() {
        let store = loaded_store();
        let editor = PortfolioEditor::new(&store);
        let mut form = SkillForm::for_document(&store.document());
        form.name = "Terraform".to_string();
        form.new_category = "Infrastructure".to_string();

        let category = editor.add_skill(&mut form).expect("add skill");
        assert_eq!(category, "Infrastructure");
        assert_eq!(form.selected_category, "Infrastructure");
        assert!(form.name.is_empty());
        assert!(store.document().skill_category("Infrastructure").is_some());
    }
}
