//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! roles, team permissions and the access gate, users and teams, and the
//! generic resource model with its per-collection catalog.

pub mod access;
pub mod constants;
pub mod error;
pub mod password;
pub mod permission;
pub mod resource;
pub mod role;
pub mod team;
pub mod user;

pub use access::{check_permission, Access, Caller, Gate};
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use password::Password;
pub use permission::{Permission, PermissionSet};
pub use resource::{catalog, Document, ListQuery, Resource, ResourceSpec};
pub use role::Role;
pub use team::{Team, TeamResponse, TeamSummary};
pub use user::{normalize_email, User, UserResponse};

/// Ids that are not UUIDs cannot exist, so they read as `"<label> not found"`.
pub fn parse_id(id: &str, label: &str) -> DomainResult<uuid::Uuid> {
    uuid::Uuid::parse_str(id.trim()).map_err(|_| DomainError::not_found(label))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = uuid::Uuid::new_v4();
        assert_eq!(parse_id(&format!(" {} ", id), "Team").unwrap(), id);
        assert_eq!(
            parse_id("42", "Team").unwrap_err().to_string(),
            "Team not found"
        );
    }
}
