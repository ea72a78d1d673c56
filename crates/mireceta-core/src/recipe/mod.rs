//! Recipe domain module.
//!
//! # Module Structure
//!
//! - `model`: `Recipe`, `Difficulty` and the create/update input shapes
//! - `query`: search, difficulty filtering and favorite statistics
//! - `seed`: sample recipes for a first run

mod model;
pub mod query;
pub mod seed;

// Re-export public API
pub use model::{Difficulty, DifficultyFilter, NewRecipe, Recipe, RecipePatch};
pub use query::FavoriteStats;
