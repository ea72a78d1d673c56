//! Application layer for MiReceta.
//!
//! The two stores own all mutable state; everything else reads their
//! snapshots or subscribes to them.
//!
//! - [`CatalogStore`]: recipes and favorites
//! - [`SessionStore`]: the logged-in user and the startup lifecycle
//! - [`RouteGuard`]: admission to protected routes
//! - [`RecipeWizard`]: multi-step creation and editing of recipes
//! - [`AppContext`]: builds and wires all of the above from configuration

pub mod catalog;
pub mod context;
pub mod logging;
pub mod route;
pub mod session;
pub mod wizard;

pub use catalog::CatalogStore;
pub use context::AppContext;
pub use logging::init_tracing;
pub use route::{Admission, Route, RouteGuard};
pub use session::SessionStore;
pub use wizard::{RecipeForm, RecipeWizard, WizardState, WizardStep};
