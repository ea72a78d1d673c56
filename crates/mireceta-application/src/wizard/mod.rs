//! Recipe creation and edit wizard.
//!
//! ```text
//! Basics -> Image -> Ingredients -> Instructions -> Submitted
//! ```

mod flow;
mod form;
mod step;

pub use flow::{RecipeWizard, WizardState};
pub use form::{
    AT_LEAST_ONE_MINUTE, INGREDIENT_REQUIRED, INSTRUCTION_REQUIRED, REQUIRED, RecipeForm,
};
pub use step::WizardStep;
