//! Editable values behind the recipe wizard and their validation rules.

use mireceta_core::error::{MiRecetaError, Result};
use mireceta_core::recipe::{Difficulty, NewRecipe, Recipe};
use strum::IntoEnumIterator;

use super::step::WizardStep;

pub const REQUIRED: &str = "required";
pub const AT_LEAST_ONE_MINUTE: &str = "must be at least 1";
pub const INGREDIENT_REQUIRED: &str = "at least one ingredient is required";
pub const INSTRUCTION_REQUIRED: &str = "at least one instruction is required";

/// Form state of a recipe being created or edited.
///
/// Fields mirror the inputs of the wizard: values may be incomplete while the
/// user is typing and are only checked by the `validate_*` methods.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeForm {
    pub name: String,
    pub description: String,
    /// `None` while the input is empty
    pub prep_time_minutes: Option<u32>,
    /// `None` until a level is chosen
    pub difficulty: Option<Difficulty>,
    pub image: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub creator_id: Option<String>,
}

impl RecipeForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-fills the form with a stored recipe, one list entry per stored item.
    pub fn from_recipe(recipe: &Recipe) -> Self {
        Self {
            name: recipe.name.clone(),
            description: recipe.description.clone(),
            prep_time_minutes: Some(recipe.prep_time_minutes),
            difficulty: Some(recipe.difficulty),
            image: recipe.image.clone(),
            ingredients: recipe.ingredients.clone(),
            instructions: recipe.instructions.clone(),
            creator_id: recipe.creator_id.clone(),
        }
    }

    // ============================================================================
    // Ingredients and instructions
    // ============================================================================

    /// Appends an empty ingredient entry and returns its index.
    pub fn add_ingredient(&mut self) -> usize {
        self.ingredients.push(String::new());
        self.ingredients.len() - 1
    }

    pub fn set_ingredient(&mut self, index: usize, text: impl Into<String>) -> Result<()> {
        set_entry(&mut self.ingredients, "ingredient", index, text.into())
    }

    pub fn remove_ingredient(&mut self, index: usize) -> Option<String> {
        remove_entry(&mut self.ingredients, index)
    }

    /// Appends an empty instruction entry and returns its index.
    pub fn add_instruction(&mut self) -> usize {
        self.instructions.push(String::new());
        self.instructions.len() - 1
    }

    pub fn set_instruction(&mut self, index: usize, text: impl Into<String>) -> Result<()> {
        set_entry(&mut self.instructions, "instruction", index, text.into())
    }

    pub fn remove_instruction(&mut self, index: usize) -> Option<String> {
        remove_entry(&mut self.instructions, index)
    }

    // ============================================================================
    // Image and creator
    // ============================================================================

    /// Sets the image as a data URL or external URL. A blank value clears it.
    pub fn set_image(&mut self, image: impl Into<String>) {
        let image = image.into();
        self.image = if image.trim().is_empty() {
            None
        } else {
            Some(image)
        };
    }

    pub fn remove_image(&mut self) {
        self.image = None;
    }

    /// Stamps the creating user on recipes added through this form.
    pub fn set_creator(&mut self, user_id: impl Into<String>) {
        self.creator_id = Some(user_id.into());
    }

    // ============================================================================
    // Validation
    // ============================================================================

    fn step_errors(&self, step: WizardStep) -> Vec<MiRecetaError> {
        let mut errors = Vec::new();
        match step {
            WizardStep::Basics => {
                if self.name.trim().is_empty() {
                    errors.push(MiRecetaError::validation("name", REQUIRED));
                }
                if self.description.trim().is_empty() {
                    errors.push(MiRecetaError::validation("description", REQUIRED));
                }
                match self.prep_time_minutes {
                    None => errors.push(MiRecetaError::validation("prepTimeMinutes", REQUIRED)),
                    Some(0) => errors.push(MiRecetaError::validation(
                        "prepTimeMinutes",
                        AT_LEAST_ONE_MINUTE,
                    )),
                    Some(_) => {}
                }
                if self.difficulty.is_none() {
                    errors.push(MiRecetaError::validation("difficulty", REQUIRED));
                }
            }
            // Optional
            WizardStep::Image => {}
            WizardStep::Ingredients => {
                if !has_content(&self.ingredients) {
                    errors.push(MiRecetaError::validation("ingredients", INGREDIENT_REQUIRED));
                }
            }
            WizardStep::Instructions => {
                if !has_content(&self.instructions) {
                    errors.push(MiRecetaError::validation(
                        "instructions",
                        INSTRUCTION_REQUIRED,
                    ));
                }
            }
        }
        errors
    }

    /// Checks the inputs of a single step.
    pub fn validate_step(&self, step: WizardStep) -> Result<()> {
        match MiRecetaError::collect(self.step_errors(step)) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Checks every step, reporting all failing fields at once.
    pub fn validate_all(&self) -> Result<()> {
        let errors = WizardStep::iter()
            .flat_map(|step| self.step_errors(step))
            .collect();
        match MiRecetaError::collect(errors) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Builds the recipe input, dropping blank list entries.
    pub fn to_new_recipe(&self) -> Result<NewRecipe> {
        self.validate_all()?;

        let (Some(difficulty), Some(prep_time_minutes)) =
            (self.difficulty, self.prep_time_minutes)
        else {
            return Err(MiRecetaError::internal("validated form is missing basics"));
        };

        Ok(NewRecipe {
            name: self.name.clone(),
            description: self.description.clone(),
            ingredients: non_blank(&self.ingredients),
            instructions: non_blank(&self.instructions),
            difficulty,
            prep_time_minutes,
            image: self.image.clone(),
            creator_id: self.creator_id.clone(),
        })
    }
}

fn has_content(entries: &[String]) -> bool {
    entries.iter().any(|entry| !entry.trim().is_empty())
}

fn non_blank(entries: &[String]) -> Vec<String> {
    entries
        .iter()
        .filter(|entry| !entry.trim().is_empty())
        .cloned()
        .collect()
}

fn set_entry(entries: &mut [String], kind: &'static str, index: usize, text: String) -> Result<()> {
    let entry = entries
        .get_mut(index)
        .ok_or_else(|| MiRecetaError::not_found(kind, index.to_string()))?;
    *entry = text;
    Ok(())
}

fn remove_entry(entries: &mut Vec<String>, index: usize) -> Option<String> {
    (index < entries.len()).then(|| entries.remove(index))
}
