//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::password::Password;
use crate::role::Role;
use crate::team::TeamSummary;

/// User domain entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    /// Always stored lowercase
    pub email: String,
    pub password: Password,
    pub role: Role,
    pub team_id: Option<Uuid>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user without a team
    pub fn new(name: &str, email: &str, password: Password, role: Role) -> DomainResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("Name is required"));
        }

        let now = crate::resource::now();
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: normalize_email(email),
            password,
            role,
            team_id: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn with_team(mut self, team_id: Option<Uuid>) -> Self {
        self.team_id = team_id;
        self
    }

    pub fn update_name(&mut self, name: &str) -> DomainResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("Name is required"));
        }
        self.name = name.to_string();
        self.touch();
        Ok(())
    }

    pub fn update_role(&mut self, role: Role) {
        self.role = role;
        self.touch();
    }

    pub fn assign_team(&mut self, team_id: Option<Uuid>) {
        self.team_id = team_id;
        self.touch();
    }

    pub fn change_password(&mut self, password: Password) {
        self.password = password;
        self.touch();
    }

    pub fn record_login(&mut self) {
        self.last_login = Some(crate::resource::now());
    }

    fn touch(&mut self) {
        self.updated_at = crate::resource::next_timestamp(self.updated_at);
    }
}

/// Emails compare case-insensitively, so they are stored lowercase.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Unique user identifier
    pub id: Uuid,
    #[serde(rename = "_id")]
    pub legacy_id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Assigned team with its permissions
    pub team: Option<TeamSummary>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserResponse {
    pub fn new(user: &User, team: Option<TeamSummary>) -> Self {
        Self {
            id: user.id,
            legacy_id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            team,
            last_login: user.last_login,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
