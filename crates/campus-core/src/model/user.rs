//! User accounts and roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::tokens::Credential;
use crate::types::UserId;

/// Role of an account; drives the authorization predicates only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Lecturer,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Lecturer => "lecturer",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "lecturer" => Ok(Role::Lecturer),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// The authenticated user as reported by the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    /// Display name.
    pub name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Body returned by login and registration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthPayload {
    pub user: User,
    pub token: Credential,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_deserializes_without_avatar() {
        let user: User = serde_json::from_value(json!({
            "id": 3,
            "email": "grace@uni.edu",
            "name": "Grace Hopper",
            "role": "admin"
        }))
        .unwrap();

        assert_eq!(user.role, Role::Admin);
        assert!(user.avatar.is_none());
    }

    #[test]
    fn rejects_unknown_role() {
        let result: Result<User, _> = serde_json::from_value(json!({
            "id": 3,
            "email": "x@uni.edu",
            "name": "X",
            "role": "janitor"
        }));
        assert!(result.is_err());
        assert!("janitor".parse::<Role>().is_err());
        assert_eq!("lecturer".parse::<Role>().unwrap(), Role::Lecturer);
    }
}
