//! Route access rules.
//!
//! Every route carries an [`Access`] rule. The rule is evaluated against the
//! caller (if any) before the handler runs. Superadmins bypass the team
//! permission check but not the role check.

use crate::error::{DomainError, DomainResult};
use crate::permission::{Permission, PermissionSet};
use crate::role::Role;

/// What the gate needs to know about an authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub role: Role,
    /// Permissions of the caller's team, `None` when no team is assigned.
    pub team_permissions: Option<PermissionSet>,
}

impl Caller {
    pub fn new(role: Role, team_permissions: Option<PermissionSet>) -> Self {
        Self {
            role,
            team_permissions,
        }
    }
}

/// Role and optional permission an authenticated caller must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gate {
    pub roles: &'static [Role],
    pub permission: Option<Permission>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Gated(Gate),
}

impl Access {
    /// Any authenticated role holding `permission` through its team.
    pub const fn staff(permission: Permission) -> Self {
        Access::Gated(Gate {
            roles: Role::ANY,
            permission: Some(permission),
        })
    }

    /// Admins and superadmins, no team permission involved.
    pub const fn admins() -> Self {
        Access::Gated(Gate {
            roles: Role::ADMINS,
            permission: None,
        })
    }

    /// Any authenticated caller.
    pub const fn authenticated() -> Self {
        Access::Gated(Gate {
            roles: Role::ANY,
            permission: None,
        })
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Access::Public)
    }

    /// Evaluate the rule. Public rules admit everyone, including anonymous callers.
    pub fn authorize(&self, caller: Option<&Caller>) -> DomainResult<()> {
        match self {
            Access::Public => Ok(()),
            Access::Gated(gate) => {
                let caller = caller.ok_or(DomainError::Unauthorized)?;
                gate.check(caller)
            }
        }
    }
}

impl Gate {
    pub fn check(&self, caller: &Caller) -> DomainResult<()> {
        if !self.roles.contains(&caller.role) {
            return Err(DomainError::forbidden(format!(
                "User role '{}' is not authorized to access this route",
                caller.role
            )));
        }

        match self.permission {
            Some(permission) => check_permission(caller, permission),
            None => Ok(()),
        }
    }
}

/// Team permission check on its own, superadmins always pass.
pub fn check_permission(caller: &Caller, permission: Permission) -> DomainResult<()> {
    if caller.role.is_superadmin() {
        return Ok(());
    }

    let permissions = caller
        .team_permissions
        .as_ref()
        .ok_or_else(|| DomainError::forbidden("Access denied. No team assigned"))?;

    if permissions.contains(&permission) {
        Ok(())
    } else {
        Err(DomainError::forbidden(format!(
            "Access denied. Requires '{}' permission",
            permission
        )))
    }
}
