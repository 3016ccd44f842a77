//! Generic resource entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{DomainError, Resource};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "resources")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed)]
    pub collection: String,
    pub data: Json,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Resource {
    type Error = DomainError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let Json::Object(data) = model.data else {
            return Err(DomainError::internal(format!(
                "Resource {} is not a JSON object",
                model.id
            )));
        };

        Ok(Resource {
            id: model.id,
            collection: model.collection,
            data,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<&Resource> for ActiveModel {
    fn from(resource: &Resource) -> Self {
        use sea_orm::Set;

        ActiveModel {
            id: Set(resource.id),
            collection: Set(resource.collection.clone()),
            data: Set(Json::Object(resource.data.clone())),
            created_at: Set(resource.created_at),
            updated_at: Set(resource.updated_at),
        }
    }
}
