//! Infrastructure layer for MiReceta.
//!
//! Concrete storage backends for the `KeyValueStorage` capability, platform
//! paths and configuration loading.

pub mod config_service;
pub mod paths;
pub mod storage;

pub use crate::config_service::{ConfigService, resolve_storage_dir};
pub use crate::storage::{JsonFileStorage, MemoryStorage, NoopStorage};
