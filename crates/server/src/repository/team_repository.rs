//! Team repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use super::entities::team::{self, ActiveModel, Entity as TeamEntity};
use common::{AppError, AppResult};
use domain::Team;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TeamRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Team>>;

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Team>>;

    /// List all teams sorted by name
    async fn list(&self) -> AppResult<Vec<Team>>;

    async fn insert(&self, team: &Team) -> AppResult<Team>;

    async fn update(&self, team: &Team) -> AppResult<Team>;

    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

pub struct TeamStore {
    db: DatabaseConnection,
}

impl TeamStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(model: team::Model) -> AppResult<Team> {
    Team::try_from(model).map_err(AppError::from)
}

#[async_trait]
impl TeamRepository for TeamStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Team>> {
        TeamEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(to_domain)
            .transpose()
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Team>> {
        TeamEntity::find()
            .filter(team::Column::Name.eq(name))
            .one(&self.db)
            .await?
            .map(to_domain)
            .transpose()
    }

    async fn list(&self) -> AppResult<Vec<Team>> {
        TeamEntity::find()
            .order_by_asc(team::Column::Name)
            .all(&self.db)
            .await?
            .into_iter()
            .map(to_domain)
            .collect()
    }

    async fn insert(&self, team: &Team) -> AppResult<Team> {
        let model = ActiveModel::from(team).insert(&self.db).await?;
        to_domain(model)
    }

    async fn update(&self, team: &Team) -> AppResult<Team> {
        let model = ActiveModel::from(team).update(&self.db).await?;
        to_domain(model)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = TeamEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
