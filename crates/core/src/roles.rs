//! Well-known roles.
//!
//! The string forms must match the `CHECK` constraint on `users.role` in
//! `20260301000001_create_users_table.sql` and the `role` claim issued in
//! access tokens.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_STUDENT: &str = "student";
pub const ROLE_TEACHER: &str = "teacher";
pub const ROLE_ADMIN: &str = "admin";

/// All valid role names.
pub const VALID_ROLES: &[&str] = &[ROLE_STUDENT, ROLE_TEACHER, ROLE_ADMIN];

/// The role carried by an authenticated identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => ROLE_STUDENT,
            Role::Teacher => ROLE_TEACHER,
            Role::Admin => ROLE_ADMIN,
        }
    }

    /// Teachers and admins: the roles that moderate content.
    pub fn is_staff(self) -> bool {
        matches!(self, Role::Teacher | Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    /// Case-insensitive, so claims written as `"Teacher"` still resolve.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            ROLE_STUDENT => Ok(Role::Student),
            ROLE_TEACHER => Ok(Role::Teacher),
            ROLE_ADMIN => Ok(Role::Admin),
            other => Err(CoreError::Validation(format!(
                "Invalid role '{other}'. Must be one of: {}",
                VALID_ROLES.join(", ")
            ))),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Refuse an account change that would leave no active administrator.
///
/// `removes_admin` is true when the target is currently an active admin and
/// the change demotes or deactivates it. `other_active_admins` counts the
/// active admins other than the target.
pub fn ensure_admin_remains(
    removes_admin: bool,
    other_active_admins: i64,
) -> Result<(), CoreError> {
    if removes_admin && other_active_admins == 0 {
        return Err(CoreError::Conflict(
            "At least one active admin account must remain".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_valid_role() {
        for name in VALID_ROLES {
            let role: Role = name.parse().expect("valid role should parse");
            assert_eq!(role.as_str(), *name);
        }
    }

    #[test]
    fn parsing_is_case_insensitive() {
        assert_eq!("Teacher".parse::<Role>().unwrap(), Role::Teacher);
        assert_eq!(" ADMIN ".parse::<Role>().unwrap(), Role::Admin);
    }

    #[test]
    fn unknown_role_is_rejected() {
        let err = "creator".parse::<Role>().unwrap_err();
        assert!(err.to_string().contains("Invalid role 'creator'"));
    }

    #[test]
    fn only_teachers_and_admins_are_staff() {
        assert!(!Role::Student.is_staff());
        assert!(Role::Teacher.is_staff());
        assert!(Role::Admin.is_staff());
    }

    #[test]
    fn last_active_admin_cannot_be_removed() {
        assert!(matches!(
            ensure_admin_remains(true, 0),
            Err(CoreError::Conflict(_))
        ));
        assert!(ensure_admin_remains(true, 1).is_ok());
        assert!(ensure_admin_remains(false, 0).is_ok());
    }

    #[test]
    fn serializes_as_snake_case() {
        assert_eq!(serde_json::to_string(&Role::Teacher).unwrap(), "\"teacher\"");
    }
}
