//! Team permission tags.
//!
//! Permissions are coarse, one per administrative area, and purely additive.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Blogs,
    Contacts,
    Leads,
    Applications,
    Gallery,
    Offers,
    Branches,
    Classes,
    Programs,
    Universities,
    Settings,
}

/// A team's permission set.
pub type PermissionSet = BTreeSet<Permission>;

impl Permission {
    pub const ALL: [Permission; 11] = [
        Permission::Blogs,
        Permission::Contacts,
        Permission::Leads,
        Permission::Applications,
        Permission::Gallery,
        Permission::Offers,
        Permission::Branches,
        Permission::Classes,
        Permission::Programs,
        Permission::Universities,
        Permission::Settings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Blogs => "blogs",
            Permission::Contacts => "contacts",
            Permission::Leads => "leads",
            Permission::Applications => "applications",
            Permission::Gallery => "gallery",
            Permission::Offers => "offers",
            Permission::Branches => "branches",
            Permission::Classes => "classes",
            Permission::Programs => "programs",
            Permission::Universities => "universities",
            Permission::Settings => "settings",
        }
    }

    /// Parse a list of tags, failing on the first unknown one.
    pub fn parse_set<I, S>(tags: I) -> Result<PermissionSet, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tags.into_iter().map(|tag| tag.as_ref().parse()).collect()
    }
}

impl FromStr for Permission {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("Invalid permission '{}'", s)))
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_tag_parses_back() {
        for permission in Permission::ALL {
            assert_eq!(permission.as_str().parse::<Permission>().unwrap(), permission);
        }
    }

    #[test]
    fn test_parse_set_deduplicates() {
        let set = Permission::parse_set(["classes", "blogs", "classes"]).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&Permission::Classes));
        assert!(set.contains(&Permission::Blogs));
    }

    #[test]
    fn test_parse_set_rejects_unknown_tag() {
        let err = Permission::parse_set(["classes", "payroll"]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid permission 'payroll'");
    }

    #[test]
    fn test_serialized_as_lowercase_tag() {
        let json = serde_json::to_string(&Permission::Universities).unwrap();
        assert_eq!(json, "\"universities\"");
    }
}
