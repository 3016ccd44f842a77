//! User repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use common::{AppError, AppResult};
use domain::User;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by email; callers pass the normalized (lowercase) address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// List all users, oldest first
    async fn list(&self) -> AppResult<Vec<User>>;

    async fn list_by_team(&self, team_id: Uuid) -> AppResult<Vec<User>>;

    async fn count_by_team(&self, team_id: Uuid) -> AppResult<u64>;

    async fn insert(&self, user: &User) -> AppResult<User>;

    /// Persist every mutable field of an existing user
    async fn update(&self, user: &User) -> AppResult<User>;

    /// Hard delete, returns whether a row was removed
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(model: user::Model) -> AppResult<User> {
    User::try_from(model).map_err(AppError::from)
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(to_domain)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?
            .map(to_domain)
            .transpose()
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        UserEntity::find()
            .order_by_asc(user::Column::CreatedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(to_domain)
            .collect()
    }

    async fn list_by_team(&self, team_id: Uuid) -> AppResult<Vec<User>> {
        UserEntity::find()
            .filter(user::Column::TeamId.eq(team_id))
            .order_by_asc(user::Column::Name)
            .all(&self.db)
            .await?
            .into_iter()
            .map(to_domain)
            .collect()
    }

    async fn count_by_team(&self, team_id: Uuid) -> AppResult<u64> {
        let count = UserEntity::find()
            .filter(user::Column::TeamId.eq(team_id))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    async fn insert(&self, user: &User) -> AppResult<User> {
        let model = ActiveModel::from(user).insert(&self.db).await?;
        to_domain(model)
    }

    async fn update(&self, user: &User) -> AppResult<User> {
        let model = ActiveModel::from(user).update(&self.db).await?;
        to_domain(model)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = UserEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
