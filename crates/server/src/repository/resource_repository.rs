//! Generic resource repository.
//!
//! One table backs every collection. Filtering beyond the collection key
//! happens in the domain layer, so the store stays backend-agnostic.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use super::entities::resource::{self, ActiveModel, Entity as ResourceEntity};
use common::{AppError, AppResult};
use domain::Resource;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ResourceRepository: Send + Sync {
    /// Every record of a collection, oldest first
    async fn list(&self, collection: &str) -> AppResult<Vec<Resource>>;

    async fn find_by_id(&self, collection: &str, id: Uuid) -> AppResult<Option<Resource>>;

    async fn insert(&self, resource: &Resource) -> AppResult<Resource>;

    /// Persist `data` and `updated_at` of an existing record
    async fn update(&self, resource: &Resource) -> AppResult<Resource>;

    async fn delete(&self, collection: &str, id: Uuid) -> AppResult<bool>;
}

pub struct ResourceStore {
    db: DatabaseConnection,
}

impl ResourceStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(model: resource::Model) -> AppResult<Resource> {
    Resource::try_from(model).map_err(AppError::from)
}

#[async_trait]
impl ResourceRepository for ResourceStore {
    async fn list(&self, collection: &str) -> AppResult<Vec<Resource>> {
        ResourceEntity::find()
            .filter(resource::Column::Collection.eq(collection))
            .order_by_asc(resource::Column::CreatedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(to_domain)
            .collect()
    }

    async fn find_by_id(&self, collection: &str, id: Uuid) -> AppResult<Option<Resource>> {
        ResourceEntity::find_by_id(id)
            .filter(resource::Column::Collection.eq(collection))
            .one(&self.db)
            .await?
            .map(to_domain)
            .transpose()
    }

    async fn insert(&self, resource: &Resource) -> AppResult<Resource> {
        let model = ActiveModel::from(resource).insert(&self.db).await?;
        to_domain(model)
    }

    async fn update(&self, resource: &Resource) -> AppResult<Resource> {
        let model = ActiveModel::from(resource).update(&self.db).await?;
        to_domain(model)
    }

    async fn delete(&self, collection: &str, id: Uuid) -> AppResult<bool> {
        let result = ResourceEntity::delete_many()
            .filter(resource::Column::Id.eq(id))
            .filter(resource::Column::Collection.eq(collection))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
