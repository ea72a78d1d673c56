//! User domain model.
//!
//! Represents the single demo identity held by the session store. There is no
//! credential check: logging in only assigns an identity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{MiRecetaError, Result};

/// The identity of the person using the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    /// False once the user has logged out. The record is kept, not deleted.
    pub is_logged_in: bool,
}

impl User {
    /// Creates a logged-in identity with a fresh id.
    pub fn sign_in(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username: username.into(),
            email: email.into(),
            is_logged_in: true,
        }
    }

    /// Returns a copy of this identity marked as logged out.
    pub fn signed_out(&self) -> Self {
        Self {
            is_logged_in: false,
            ..self.clone()
        }
    }
}

/// Values typed into the login form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub email: String,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
        }
    }

    /// Checks the form before the login is attempted.
    ///
    /// Both fields are required; the email needs a non-empty local part and
    /// domain around a single `@`.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.username.trim().is_empty() {
            errors.push(MiRecetaError::validation("username", "required"));
        }

        let email = self.email.trim();
        if email.is_empty() {
            errors.push(MiRecetaError::validation("email", "required"));
        } else {
            let well_formed = match email.split_once('@') {
                Some((local, domain)) => {
                    !local.is_empty() && !domain.is_empty() && !domain.contains('@')
                }
                None => false,
            };
            if !well_formed {
                errors.push(MiRecetaError::validation("email", "must be a valid email address"));
            }
        }

        match MiRecetaError::collect(errors) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
