//! Team administration service.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{Permission, Team, User};

use crate::repository::{TeamRepository, UserRepository};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[derive(Debug, Clone)]
pub struct NewTeam {
    pub name: String,
    pub description: Option<String>,
    /// Raw permission tags, validated against the known set
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TeamChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub permissions: Option<Vec<String>>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TeamService: Send + Sync {
    /// All teams sorted by name
    async fn list_teams(&self) -> AppResult<Vec<Team>>;

    async fn get_team(&self, id: Uuid) -> AppResult<Team>;

    async fn create_team(&self, input: NewTeam) -> AppResult<Team>;

    async fn update_team(&self, id: Uuid, changes: TeamChanges) -> AppResult<Team>;

    /// Refused while any user is still assigned
    async fn delete_team(&self, id: Uuid) -> AppResult<()>;

    async fn team_members(&self, id: Uuid) -> AppResult<Vec<User>>;
}

pub struct TeamManager {
    teams: Arc<dyn TeamRepository>,
    users: Arc<dyn UserRepository>,
}

impl TeamManager {
    pub fn new(teams: Arc<dyn TeamRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { teams, users }
    }

    async fn ensure_name_free(&self, name: &str, exclude: Option<Uuid>) -> AppResult<()> {
        match self.teams.find_by_name(name.trim()).await? {
            Some(existing) if Some(existing.id) != exclude => {
                Err(AppError::conflict("Team with this name"))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl TeamService for TeamManager {
    async fn list_teams(&self) -> AppResult<Vec<Team>> {
        self.teams.list().await
    }

    async fn get_team(&self, id: Uuid) -> AppResult<Team> {
        self.teams.find_by_id(id).await?.ok_or_not_found("Team")
    }

    async fn create_team(&self, input: NewTeam) -> AppResult<Team> {
        let permissions = Permission::parse_set(&input.permissions)?;
        self.ensure_name_free(&input.name, None).await?;

        let team = Team::new(&input.name, input.description, permissions)?;
        let team = self.teams.insert(&team).await?;
        tracing::info!(team_id = %team.id, name = %team.name, "Team created");
        Ok(team)
    }

    async fn update_team(&self, id: Uuid, changes: TeamChanges) -> AppResult<Team> {
        let mut team = self.get_team(id).await?;

        if let Some(name) = changes.name {
            self.ensure_name_free(&name, Some(id)).await?;
            team.rename(&name)?;
        }
        if let Some(description) = changes.description {
            team.set_description(description);
        }
        if let Some(tags) = changes.permissions {
            team.set_permissions(Permission::parse_set(&tags)?);
        }

        self.teams.update(&team).await
    }

    async fn delete_team(&self, id: Uuid) -> AppResult<()> {
        let team = self.get_team(id).await?;

        let members = self.users.count_by_team(team.id).await?;
        if members > 0 {
            return Err(AppError::bad_request(format!(
                "Cannot delete team with {} assigned user(s)",
                members
            )));
        }

        self.teams.delete(team.id).await?;
        tracing::info!(team_id = %team.id, "Team deleted");
        Ok(())
    }

    async fn team_members(&self, id: Uuid) -> AppResult<Vec<User>> {
        let team = self.get_team(id).await?;
        self.users.list_by_team(team.id).await
    }
}
