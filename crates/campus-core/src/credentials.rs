//! Login and registration inputs.

use std::fmt;

use serde::Serialize;

use crate::error::ValidationError;
use crate::model::Role;

/// Login credentials: an email address and a password.
///
/// # Security
///
/// The password is never exposed in Debug output.
///
/// # Example
///
/// ```
/// use campus_core::LoginCredentials;
///
/// let creds = LoginCredentials::new("ada@university.edu", "hunter2");
/// assert_eq!(creds.email(), "ada@university.edu");
/// ```
#[derive(Clone, Serialize)]
pub struct LoginCredentials {
    email: String,
    password: String,
}

impl LoginCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the password.
    ///
    /// # Security
    ///
    /// Use this only when constructing authentication requests.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Self-service registration payload.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    password: String,
    pub role: Role,
}

impl Registration {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            password: password.into(),
            role,
        }
    }

    /// Returns the password.
    ///
    /// # Security
    ///
    /// Use this only when constructing registration requests.
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Full display name as the portal shows it.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Check the payload locally. Admin accounts cannot self-register.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.first_name.trim().is_empty() {
            return Err(ValidationError::field("first_name", "must not be empty"));
        }
        if self.last_name.trim().is_empty() {
            return Err(ValidationError::field("last_name", "must not be empty"));
        }
        if !is_plausible_email(&self.email) {
            return Err(ValidationError::field("email", "must be an email address"));
        }
        if self.password.is_empty() {
            return Err(ValidationError::field("password", "must not be empty"));
        }
        if self.role == Role::Admin {
            return Err(ValidationError::field(
                "role",
                "must be student or lecturer",
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.ends_with('.'),
        None => false,
    }
}
