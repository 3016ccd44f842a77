//! Application state - Dependency injection container.

use std::sync::Arc;

use common::JwtConfig;

use crate::infra::Database;
use crate::service::{
    AuthService, ResourceService, ServiceContainer, Services, TeamService, UserService,
};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub team_service: Arc<dyn TeamService>,
    pub resource_service: Arc<dyn ResourceService>,
    pub database: Arc<Database>,
}

impl AppState {
    /// Wire the sea-orm backed services over an open database.
    pub fn from_database(database: Arc<Database>, jwt: &JwtConfig) -> Self {
        let services = Services::from_connection(database.get_connection(), jwt);
        Self::from_container(&services, database)
    }

    /// Take every service from a container.
    pub fn from_container(services: &dyn ServiceContainer, database: Arc<Database>) -> Self {
        Self {
            auth_service: services.auth(),
            user_service: services.users(),
            team_service: services.teams(),
            resource_service: services.resources(),
            database,
        }
    }
}
