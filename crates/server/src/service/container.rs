//! Service container - Centralized service access.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use common::JwtConfig;

use super::{
    AuthService, Authenticator, ResourceManager, ResourceService, TeamManager, TeamService,
    UserManager, UserService,
};
use crate::repository::{ResourceStore, TeamStore, UserStore};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn teams(&self) -> Arc<dyn TeamService>;

    fn resources(&self) -> Arc<dyn ResourceService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    team_service: Arc<dyn TeamService>,
    resource_service: Arc<dyn ResourceService>,
}

impl Services {
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        team_service: Arc<dyn TeamService>,
        resource_service: Arc<dyn ResourceService>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            team_service,
            resource_service,
        }
    }

    /// Wire every service to the sea-orm backed repositories
    pub fn from_connection(db: DatabaseConnection, jwt: &JwtConfig) -> Self {
        let users = Arc::new(UserStore::new(db.clone()));
        let teams = Arc::new(TeamStore::new(db.clone()));
        let resources = Arc::new(ResourceStore::new(db));

        Self::new(
            Arc::new(Authenticator::new(users.clone(), jwt.clone())),
            Arc::new(UserManager::new(users.clone(), teams.clone())),
            Arc::new(TeamManager::new(teams, users)),
            Arc::new(ResourceManager::new(resources)),
        )
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn teams(&self) -> Arc<dyn TeamService> {
        self.team_service.clone()
    }

    fn resources(&self) -> Arc<dyn ResourceService> {
        self.resource_service.clone()
    }
}
