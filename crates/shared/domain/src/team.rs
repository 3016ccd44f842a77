//! Team entity.
//!
//! A team groups users and grants them a flat set of permissions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::permission::{Permission, PermissionSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub permissions: PermissionSet,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Team {
    pub fn new(name: &str, description: Option<String>, permissions: PermissionSet) -> DomainResult<Self> {
        let now = crate::resource::now();
        Ok(Self {
            id: Uuid::new_v4(),
            name: Self::clean_name(name)?,
            description: description.unwrap_or_default(),
            permissions,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn rename(&mut self, name: &str) -> DomainResult<()> {
        self.name = Self::clean_name(name)?;
        self.touch();
        Ok(())
    }

    pub fn set_description(&mut self, description: String) {
        self.description = description;
        self.touch();
    }

    pub fn set_permissions(&mut self, permissions: PermissionSet) {
        self.permissions = permissions;
        self.touch();
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    pub fn summary(&self) -> TeamSummary {
        TeamSummary {
            id: self.id,
            name: self.name.clone(),
            permissions: self.permissions.iter().copied().collect(),
        }
    }

    fn touch(&mut self) {
        self.updated_at = crate::resource::next_timestamp(self.updated_at);
    }

    fn clean_name(name: &str) -> DomainResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("Team name is required"));
        }
        Ok(name.to_string())
    }
}

/// Team as embedded in a user payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TeamSummary {
    pub id: Uuid,
    pub name: String,
    pub permissions: Vec<Permission>,
}

/// Team payload returned by the admin API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct TeamResponse {
    pub id: Uuid,
    #[serde(rename = "_id")]
    pub legacy_id: Uuid,
    pub name: String,
    pub description: String,
    pub permissions: Vec<Permission>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Team> for TeamResponse {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id,
            legacy_id: team.id,
            name: team.name.clone(),
            description: team.description.clone(),
            permissions: team.permissions.iter().copied().collect(),
            created_at: team.created_at,
            updated_at: team.updated_at,
        }
    }
}

impl From<Team> for TeamResponse {
    fn from(team: Team) -> Self {
        TeamResponse::from(&team)
    }
}
