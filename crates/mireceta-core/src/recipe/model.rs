//! Recipe domain model.
//!
//! Contains the persisted `Recipe` entity, its `Difficulty` level, and the two
//! input shapes used to create (`NewRecipe`) and partially update
//! (`RecipePatch`) recipes.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// How demanding a recipe is to prepare.
///
/// Serialized as `"Easy" | "Intermediate" | "Hard"`. The Spanish labels used
/// by earlier versions of the persisted catalog are still accepted on read.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Difficulty {
    #[serde(alias = "Fácil")]
    #[strum(to_string = "Easy", serialize = "Fácil")]
    Easy,
    #[serde(alias = "Intermedio")]
    #[strum(to_string = "Intermediate", serialize = "Intermedio")]
    Intermediate,
    #[serde(alias = "Difícil")]
    #[strum(to_string = "Hard", serialize = "Difícil")]
    Hard,
}

/// Difficulty filter used by the browse view.
///
/// `All` is the sentinel that disables filtering. Parsing accepts `""`,
/// `"all"` and the legacy `"Todas"` as `All`; anything else must name a
/// difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DifficultyFilter {
    #[default]
    All,
    Only(Difficulty),
}

impl DifficultyFilter {
    /// Returns true if a recipe of the given difficulty passes the filter.
    pub fn admits(&self, difficulty: Difficulty) -> bool {
        match self {
            DifficultyFilter::All => true,
            DifficultyFilter::Only(level) => *level == difficulty,
        }
    }
}

impl From<Difficulty> for DifficultyFilter {
    fn from(level: Difficulty) -> Self {
        DifficultyFilter::Only(level)
    }
}

impl From<Option<Difficulty>> for DifficultyFilter {
    fn from(level: Option<Difficulty>) -> Self {
        level.map_or(DifficultyFilter::All, DifficultyFilter::Only)
    }
}

impl FromStr for DifficultyFilter {
    type Err = strum::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("all")
            || trimmed.eq_ignore_ascii_case("todas")
        {
            return Ok(DifficultyFilter::All);
        }
        trimmed.parse::<Difficulty>().map(DifficultyFilter::Only)
    }
}

/// A recipe held by the catalog.
///
/// `id` and `created_at` are assigned by the catalog when the recipe is added
/// and never change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Unique identifier (creation timestamp in milliseconds for new recipes)
    pub id: String,
    pub name: String,
    pub description: String,
    /// Ingredients in display order
    pub ingredients: Vec<String>,
    /// Steps in execution order
    pub instructions: Vec<String>,
    pub difficulty: Difficulty,
    pub prep_time_minutes: u32,
    /// Embedded data URL or external image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    /// User that created the recipe. Not checked against the session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<String>,
}

impl Recipe {
    /// Builds a stored recipe from its creation input.
    pub fn from_new(id: String, created_at: DateTime<Utc>, new: NewRecipe) -> Self {
        Self {
            id,
            name: new.name,
            description: new.description,
            ingredients: new.ingredients,
            instructions: new.instructions,
            difficulty: new.difficulty,
            prep_time_minutes: new.prep_time_minutes,
            image: new.image,
            created_at,
            creator_id: new.creator_id,
        }
    }

    /// Merges the fields present in `patch` into this recipe.
    ///
    /// `id` and `created_at` are not part of the patch and are left untouched.
    pub fn apply(&mut self, patch: RecipePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(ingredients) = patch.ingredients {
            self.ingredients = ingredients;
        }
        if let Some(instructions) = patch.instructions {
            self.instructions = instructions;
        }
        if let Some(difficulty) = patch.difficulty {
            self.difficulty = difficulty;
        }
        if let Some(prep_time_minutes) = patch.prep_time_minutes {
            self.prep_time_minutes = prep_time_minutes;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
        if let Some(creator_id) = patch.creator_id {
            self.creator_id = creator_id;
        }
    }
}

/// Input for creating a recipe: every field except `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecipe {
    pub name: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub difficulty: Difficulty,
    pub prep_time_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<String>,
}

/// Partial update of a recipe.
///
/// `None` leaves a field unchanged. The optional fields use a nested option so
/// a patch can clear them: `Some(None)` removes the image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<Vec<String>>,
    pub instructions: Option<Vec<String>>,
    pub difficulty: Option<Difficulty>,
    pub prep_time_minutes: Option<u32>,
    pub image: Option<Option<String>>,
    pub creator_id: Option<Option<String>>,
}

impl RecipePatch {
    /// A patch that replaces every editable field with the values of `new`.
    pub fn replace_with(new: NewRecipe) -> Self {
        Self {
            name: Some(new.name),
            description: Some(new.description),
            ingredients: Some(new.ingredients),
            instructions: Some(new.instructions),
            difficulty: Some(new.difficulty),
            prep_time_minutes: Some(new.prep_time_minutes),
            image: Some(new.image),
            creator_id: None,
        }
    }

    /// Returns true if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
