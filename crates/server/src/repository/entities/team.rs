//! Team database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{DomainError, PermissionSet, Team};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "teams")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub description: String,
    /// Array of permission tags
    pub permissions: Json,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user::Entity")]
    Users,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl TryFrom<Model> for Team {
    type Error = DomainError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let permissions: PermissionSet = serde_json::from_value(model.permissions)
            .map_err(|e| DomainError::internal(format!("Corrupt permissions on team {}: {}", model.id, e)))?;

        Ok(Team {
            id: model.id,
            name: model.name,
            description: model.description,
            permissions,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<&Team> for ActiveModel {
    fn from(team: &Team) -> Self {
        use sea_orm::Set;

        let tags: Vec<&str> = team.permissions.iter().map(|p| p.as_str()).collect();
        ActiveModel {
            id: Set(team.id),
            name: Set(team.name.clone()),
            description: Set(team.description.clone()),
            permissions: Set(Json::from(tags)),
            created_at: Set(team.created_at),
            updated_at: Set(team.updated_at),
        }
    }
}
