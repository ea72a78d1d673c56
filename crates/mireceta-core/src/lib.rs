//! Domain layer for MiReceta.
//!
//! Holds the recipe and user models, the shared error type, configuration,
//! and the small building blocks the stores are made of: the storage
//! capability, the listener registry and the readiness signal.

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod observer;
pub mod recipe;
pub mod storage;
pub mod user;

// Re-export common types
pub use config::MiRecetaConfig;
pub use error::{MiRecetaError, Result};
pub use lifecycle::ReadySignal;
pub use observer::{Subscribers, SubscriptionId};
pub use storage::{JsonStorageExt, KeyValueStorage};
