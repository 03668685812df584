//! crates/dashboard_core/src/validation.rs
//!
//! Client-side checks that run before any request is built.

use crate::domain::{Country, Role};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Passwords don't match")]
    PasswordMismatch,
}

/// The full payload of the account registration form.
///
/// Serializes to the `/user/register` request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<Country>,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        Ok(())
    }
}
