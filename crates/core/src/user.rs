//! User identity types: the caller resolved from a bearer token, the
//! display-only profile mirror, and the sign-up / sign-in request bodies.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::error::CoreError;
use crate::types::{RecordId, Timestamp};

/// Role written to every profile mirror at sign-up.
pub const ROLE_USER: &str = "user";

pub const SIGNUP_REQUIRED_MESSAGE: &str = "Email, password, and name are required";
pub const LOGIN_REQUIRED_MESSAGE: &str = "Email and password are required";

/// The principal behind a validated bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub user_id: RecordId,
    pub email: Option<String>,
}

/// Denormalized copy of an auth-provider user, stored under `user:<id>`.
///
/// Display only. Authorization always goes back to the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: RecordId,
    pub email: String,
    pub name: String,
    pub role: String,
    pub created_at: Timestamp,
}

/// Request body for `POST /signup`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SignupRequest {
    #[serde(default)]
    #[validate(email(message = "Email address is not valid"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
    #[serde(default)]
    pub name: String,
}

impl SignupRequest {
    /// Presence check first (one combined message), then format rules.
    pub fn validate_input(&self) -> Result<(), CoreError> {
        if [&self.email, &self.password, &self.name]
            .iter()
            .any(|s| s.trim().is_empty())
        {
            return Err(CoreError::Validation(SIGNUP_REQUIRED_MESSAGE.to_string()));
        }
        self.validate()
            .map_err(|e| CoreError::Validation(describe_errors(&e)))
    }
}

/// Request body for `POST /login`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    pub fn validate_input(&self) -> Result<(), CoreError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(CoreError::Validation(LOGIN_REQUIRED_MESSAGE.to_string()));
        }
        Ok(())
    }
}

/// Flatten `validator` errors into one stable, human-readable message.
fn describe_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map_or_else(|| format!("{field} is invalid"), |m| m.to_string())
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}
