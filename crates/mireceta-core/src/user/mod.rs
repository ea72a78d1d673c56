//! User domain module.
//!
//! This module contains the session identity and the login form model.
//!
//! # Usage
//!
//! ```
//! use mireceta_core::user::{LoginRequest, User};
//!
//! let request = LoginRequest::new("ana", "ana@example.com");
//! assert!(request.validate().is_ok());
//!
//! let user = User::sign_in(request.username, request.email);
//! assert!(user.is_logged_in);
//! ```

mod model;

// Re-export public API
pub use model::{LoginRequest, User};
