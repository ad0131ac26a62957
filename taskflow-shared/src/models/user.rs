/// User model and validation schemas
///
/// A user is a team member that tasks can be assigned to. Users are created
/// once and never updated through the API.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     name VARCHAR(50) NOT NULL,
///     role VARCHAR(16) NOT NULL
/// );
/// ```
///
/// # Example
///
/// ```
/// use taskflow_shared::models::user::{CreateUser, UserRole};
/// use validator::Validate;
///
/// let new_user = CreateUser {
///     name: "Ada".to_string(),
///     role: UserRole::Admin,
/// };
/// assert!(new_user.validate().is_ok());
/// ```

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use validator::Validate;

use super::ParseEnumError;

/// Role of a user within the team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full administrative access
    Admin,

    /// Manages a group of members
    Manager,

    /// Regular team member
    Member,
}

impl UserRole {
    /// All roles, in display order
    pub const ALL: [UserRole; 3] = [UserRole::Admin, UserRole::Manager, UserRole::Member];

    /// Converts role to its wire and storage literal
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Manager => "manager",
            UserRole::Member => "member",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "manager" => Ok(UserRole::Manager),
            "member" => Ok(UserRole::Member),
            other => Err(ParseEnumError::new("role", other)),
        }
    }
}

/// User record as stored and returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, sqlx::FromRow)]
pub struct User {
    /// Identity assigned by the store
    #[validate(range(min = 1, message = "id must be at least 1"))]
    pub id: i64,

    /// Display name
    #[validate(length(min = 2, max = 50, message = "name must be 2-50 characters"))]
    pub name: String,

    /// Team role
    pub role: UserRole,
}

/// Payload for creating a new user
///
/// Unknown fields in the incoming JSON are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateUser {
    /// Display name (2-50 characters)
    #[validate(length(min = 2, max = 50, message = "name must be 2-50 characters"))]
    pub name: String,

    /// Team role
    pub role: UserRole,
}

impl CreateUser {
    /// Attaches an identity, producing the full record
    pub fn into_user(self, id: i64) -> User {
        User {
            id,
            name: self.name,
            role: self.role,
        }
    }
}

/// Exact-match filters for listing users
///
/// Every populated field must match; `None` fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub role: Option<UserRole>,
    pub name: Option<String>,
}

impl UserFilter {
    /// Returns true if the user satisfies every populated predicate
    pub fn matches(&self, user: &User) -> bool {
        self.role.map_or(true, |role| user.role == role)
            && self.name.as_deref().map_or(true, |name| user.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_round_trips_through_str() {
        for role in UserRole::ALL {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), role);
        }
    }

    #[test]
    fn test_user_role_rejects_unknown_literal() {
        let err = "owner".parse::<UserRole>().unwrap_err();
        assert_eq!(err.field, "role");
        assert_eq!(err.value, "owner");
    }

    #[test]
    fn test_create_user_name_bounds() {
        let short = CreateUser {
            name: "A".to_string(),
            role: UserRole::Member,
        };
        assert!(short.validate().is_err());

        let long = CreateUser {
            name: "x".repeat(51),
            role: UserRole::Member,
        };
        assert!(long.validate().is_err());

        let ok = CreateUser {
            name: "x".repeat(50),
            role: UserRole::Member,
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_create_user_ignores_extra_fields() {
        let user: CreateUser =
            serde_json::from_str(r#"{"name":"Ada","role":"admin","email":"ada@example.com"}"#)
                .unwrap();
        assert_eq!(user.name, "Ada");
        assert_eq!(user.role, UserRole::Admin);
    }

    #[test]
    fn test_create_user_rejects_unknown_role() {
        let result: Result<CreateUser, _> =
            serde_json::from_str(r#"{"name":"Ada","role":"owner"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_user_requires_positive_id() {
        let user = CreateUser {
            name: "Ada".to_string(),
            role: UserRole::Admin,
        }
        .into_user(0);
        assert!(user.validate().is_err());
    }

    #[test]
    fn test_user_filter_is_conjunctive() {
        let ada = User {
            id: 1,
            name: "Ada".to_string(),
            role: UserRole::Admin,
        };

        assert!(UserFilter::default().matches(&ada));
        assert!(UserFilter {
            role: Some(UserRole::Admin),
            name: Some("Ada".to_string()),
        }
        .matches(&ada));
        assert!(!UserFilter {
            role: Some(UserRole::Admin),
            name: Some("Ad".to_string()),
        }
        .matches(&ada));
        assert!(!UserFilter {
            role: Some(UserRole::Member),
            name: None,
        }
        .matches(&ada));
    }
}
