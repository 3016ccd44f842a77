//! Global user roles.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{ROLE_ADMIN, ROLE_STAFF, ROLE_SUPERADMIN};
use crate::error::DomainError;

/// User roles enumeration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Staff,
    Admin,
    Superadmin,
}

impl Role {
    /// Roles allowed to manage teams and users
    pub const ADMINS: &'static [Role] = &[Role::Admin, Role::Superadmin];

    /// Every role; gates that only care about team permissions use this
    pub const ANY: &'static [Role] = &[Role::Staff, Role::Admin, Role::Superadmin];

    /// Superadmins skip team permission checks entirely
    pub fn is_superadmin(&self) -> bool {
        matches!(self, Role::Superadmin)
    }

    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::Superadmin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Staff => ROLE_STAFF,
            Role::Admin => ROLE_ADMIN,
            Role::Superadmin => ROLE_SUPERADMIN,
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_STAFF => Ok(Role::Staff),
            ROLE_ADMIN => Ok(Role::Admin),
            ROLE_SUPERADMIN => Ok(Role::Superadmin),
            other => Err(DomainError::validation(format!(
                "Invalid role '{}'. Must be one of: staff, admin, superadmin",
                other
            ))),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_str() {
        for role in Role::ANY {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), *role);
        }
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let err = "owner".parse::<Role>().unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn test_admin_flags() {
        assert!(!Role::Staff.is_admin());
        assert!(Role::Admin.is_admin());
        assert!(Role::Superadmin.is_admin());
        assert!(Role::Superadmin.is_superadmin());
        assert!(!Role::Admin.is_superadmin());
    }

    #[test]
    fn test_serde_uses_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Superadmin).unwrap(), "\"superadmin\"");
        let role: Role = serde_json::from_str("\"staff\"").unwrap();
        assert_eq!(role, Role::Staff);
    }
}
