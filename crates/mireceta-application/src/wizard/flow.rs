//! Step navigation and submission of the recipe wizard.

use mireceta_core::error::{MiRecetaError, Result};
use mireceta_core::recipe::{Recipe, RecipePatch};

use super::form::RecipeForm;
use super::step::WizardStep;
use crate::catalog::CatalogStore;

/// Where the wizard currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardState {
    Editing(WizardStep),
    /// Terminal; holds the id of the created or updated recipe.
    Submitted(String),
}

/// Multi-step creation or edit flow for a single recipe.
///
/// Moving forward requires the current step to validate; moving back never
/// does. Submission is only possible from the last step and re-validates the
/// whole form.
#[derive(Debug, Clone)]
pub struct RecipeWizard {
    form: RecipeForm,
    state: WizardState,
    /// Set when editing an existing recipe
    editing_id: Option<String>,
}

impl RecipeWizard {
    /// A blank wizard that creates a new recipe.
    pub fn new() -> Self {
        Self {
            form: RecipeForm::new(),
            state: WizardState::Editing(WizardStep::first()),
            editing_id: None,
        }
    }

    /// Opens the wizard for `id`, pre-filled from the catalog.
    ///
    /// Falls back to a blank creation wizard when `id` is `None` or does not
    /// name a stored recipe.
    pub fn open(catalog: &CatalogStore, id: Option<&str>) -> Self {
        let Some(recipe) = id.and_then(|id| catalog.get_by_id(id)) else {
            if let Some(id) = id {
                tracing::debug!("[RecipeWizard] Recipe {} not found, creating instead", id);
            }
            return Self::new();
        };

        Self {
            form: RecipeForm::from_recipe(&recipe),
            state: WizardState::Editing(WizardStep::first()),
            editing_id: Some(recipe.id),
        }
    }

    pub fn form(&self) -> &RecipeForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut RecipeForm {
        &mut self.form
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    /// Current step, or `None` once submitted.
    pub fn step(&self) -> Option<WizardStep> {
        match self.state {
            WizardState::Editing(step) => Some(step),
            WizardState::Submitted(_) => None,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.editing_id.as_deref()
    }

    fn current_step(&self) -> Result<WizardStep> {
        self.step()
            .ok_or_else(|| MiRecetaError::validation("wizard", "already submitted"))
    }

    /// Returns true if the current step would let the wizard advance.
    pub fn can_advance(&self) -> bool {
        self.step()
            .is_some_and(|step| self.form.validate_step(step).is_ok())
    }

    /// Advances to the next step if the current one validates.
    ///
    /// On the last step this only validates and stays put.
    pub fn next(&mut self) -> Result<WizardStep> {
        let step = self.current_step()?;
        self.form.validate_step(step)?;

        let next = step.next().unwrap_or(step);
        self.state = WizardState::Editing(next);
        Ok(next)
    }

    /// Goes back one step. No-op on the first step.
    pub fn previous(&mut self) -> Result<WizardStep> {
        let step = self.current_step()?;
        let previous = step.previous().unwrap_or(step);
        self.state = WizardState::Editing(previous);
        Ok(previous)
    }

    /// Stores the recipe: updates it in edit mode, adds it otherwise.
    ///
    /// Fails with a validation error off the last step or when any step is
    /// invalid, and with not-found when the edited recipe was deleted.
    pub fn submit(&mut self, catalog: &CatalogStore) -> Result<Recipe> {
        let step = self.current_step()?;
        if !step.is_last() {
            return Err(MiRecetaError::validation(
                "wizard",
                format!("cannot submit from step {step}"),
            ));
        }

        let new = self.form.to_new_recipe()?;

        let recipe = match &self.editing_id {
            Some(id) => {
                if !catalog.update(id, RecipePatch::replace_with(new)) {
                    return Err(MiRecetaError::not_found("recipe", id.clone()));
                }
                catalog
                    .get_by_id(id)
                    .ok_or_else(|| MiRecetaError::not_found("recipe", id.clone()))?
            }
            None => catalog.add(new),
        };

        tracing::info!(
            "[RecipeWizard] Submitted recipe {} ({})",
            recipe.id,
            if self.is_editing() { "updated" } else { "created" }
        );
        self.state = WizardState::Submitted(recipe.id.clone());
        Ok(recipe)
    }
}

impl Default for RecipeWizard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mireceta_core::config::{CatalogSettings, StorageKeys};
    use mireceta_core::recipe::Difficulty;
    use mireceta_infrastructure::MemoryStorage;
    use std::sync::Arc;

    fn catalog() -> CatalogStore {
        CatalogStore::new(
            Arc::new(MemoryStorage::new()),
            StorageKeys::default(),
            &CatalogSettings::default(),
        )
    }

    fn fill_basics(wizard: &mut RecipeWizard) {
        let form = wizard.form_mut();
        form.name = "Flan".to_string();
        form.description = "Caramel custard".to_string();
        form.prep_time_minutes = Some(50);
        form.difficulty = Some(Difficulty::Intermediate);
    }

    #[test]
    fn test_cannot_skip_invalid_basics() {
        let mut wizard = RecipeWizard::new();
        assert!(!wizard.can_advance());
        assert!(wizard.next().unwrap_err().is_validation());
        assert_eq!(wizard.step(), Some(WizardStep::Basics));

        fill_basics(&mut wizard);
        assert_eq!(wizard.next().unwrap(), WizardStep::Image);
        // Image is optional
        assert_eq!(wizard.next().unwrap(), WizardStep::Ingredients);
    }

    #[test]
    fn test_ingredients_gate() {
        let mut wizard = RecipeWizard::new();
        fill_basics(&mut wizard);
        wizard.next().unwrap();
        wizard.next().unwrap();

        assert!(wizard.next().is_err());
        assert_eq!(wizard.step(), Some(WizardStep::Ingredients));

        let form = wizard.form_mut();
        let i = form.add_ingredient();
        form.set_ingredient(i, "Eggs").unwrap();
        assert_eq!(wizard.next().unwrap(), WizardStep::Instructions);
    }

    #[test]
    fn test_previous_is_always_allowed() {
        let mut wizard = RecipeWizard::new();
        assert_eq!(wizard.previous().unwrap(), WizardStep::Basics);

        fill_basics(&mut wizard);
        wizard.next().unwrap();
        wizard.form_mut().name.clear();
        assert_eq!(wizard.previous().unwrap(), WizardStep::Basics);
    }

    #[test]
    fn test_submit_only_from_last_step() {
        let catalog = catalog();
        let mut wizard = RecipeWizard::new();
        fill_basics(&mut wizard);

        let err = wizard.submit(&catalog).unwrap_err();
        assert_eq!(err.invalid_fields(), vec!["wizard"]);
        assert_eq!(catalog.list_all().len(), 3);
    }

    #[test]
    fn test_submit_creates_recipe() {
        let catalog = catalog();
        let mut wizard = RecipeWizard::new();
        fill_basics(&mut wizard);
        wizard.form_mut().set_creator("user-1");
        wizard.next().unwrap();
        wizard.next().unwrap();
        let form = wizard.form_mut();
        let i = form.add_ingredient();
        form.set_ingredient(i, "Milk").unwrap();
        form.add_ingredient();
        wizard.next().unwrap();
        let form = wizard.form_mut();
        let i = form.add_instruction();
        form.set_instruction(i, "Bake in a water bath").unwrap();

        let recipe = wizard.submit(&catalog).unwrap();

        assert_eq!(wizard.state(), &WizardState::Submitted(recipe.id.clone()));
        assert_eq!(recipe.ingredients, vec!["Milk"]);
        assert_eq!(recipe.creator_id.as_deref(), Some("user-1"));
        assert_eq!(catalog.get_by_id(&recipe.id), Some(recipe));
        assert!(wizard.next().is_err());
    }

    #[test]
    fn test_submit_revalidates_every_step() {
        let catalog = catalog();
        let mut wizard = RecipeWizard::open(&catalog, Some("2"));
        for _ in 0..3 {
            wizard.next().unwrap();
        }
        wizard.form_mut().description = "  ".to_string();

        let err = wizard.submit(&catalog).unwrap_err();
        assert_eq!(err.invalid_fields(), vec!["description"]);
        assert!(wizard.step().is_some());
    }

    #[test]
    fn test_edit_mode_updates_in_place() {
        let catalog = catalog();
        let original = catalog.get_by_id("1").unwrap();
        let mut wizard = RecipeWizard::open(&catalog, Some("1"));
        assert!(wizard.is_editing());
        assert_eq!(wizard.form().ingredients.len(), original.ingredients.len());

        wizard.form_mut().prep_time_minutes = Some(50);
        for _ in 0..3 {
            wizard.next().unwrap();
        }
        let updated = wizard.submit(&catalog).unwrap();

        assert_eq!(updated.id, "1");
        assert_eq!(updated.prep_time_minutes, 50);
        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(catalog.list_all().len(), 3);
    }

    #[test]
    fn test_unknown_id_opens_creation() {
        let catalog = catalog();
        let wizard = RecipeWizard::open(&catalog, Some("missing"));
        assert!(!wizard.is_editing());
        assert_eq!(wizard.form(), &RecipeForm::new());
    }

    #[test]
    fn test_submit_after_target_deleted() {
        let catalog = catalog();
        let mut wizard = RecipeWizard::open(&catalog, Some("3"));
        for _ in 0..3 {
            wizard.next().unwrap();
        }
        catalog.delete("3");

        let err = wizard.submit(&catalog).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(catalog.list_all().len(), 2);
    }
}
