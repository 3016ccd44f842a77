//! OpenAPI documentation.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use domain::{Permission, Role, TeamResponse, TeamSummary, UserResponse};

use crate::handlers::auth_handler::{LoginRequest, LoginResponse, RegisterRequest};
use crate::handlers::health_handler::{HealthResponse, ServiceStatus};
use crate::handlers::team_handler::{CreateTeamRequest, UpdateTeamRequest};
use crate::handlers::user_handler::{CreateUserRequest, UpdateUserRequest};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health_handler::health,
        crate::handlers::auth_handler::register,
        crate::handlers::auth_handler::login,
        crate::handlers::auth_handler::me,
        crate::handlers::user_handler::list_users,
        crate::handlers::user_handler::get_user,
        crate::handlers::user_handler::create_user,
        crate::handlers::user_handler::update_user,
        crate::handlers::user_handler::delete_user,
        crate::handlers::team_handler::list_teams,
        crate::handlers::team_handler::list_permissions,
        crate::handlers::team_handler::get_team,
        crate::handlers::team_handler::create_team,
        crate::handlers::team_handler::update_team,
        crate::handlers::team_handler::delete_team,
        crate::handlers::team_handler::team_members,
        crate::handlers::resource_handler::list_resources,
        crate::handlers::resource_handler::get_resource,
        crate::handlers::resource_handler::create_resource,
        crate::handlers::resource_handler::update_resource,
        crate::handlers::resource_handler::delete_resource,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            UserResponse,
            CreateUserRequest,
            UpdateUserRequest,
            TeamResponse,
            TeamSummary,
            CreateTeamRequest,
            UpdateTeamRequest,
            Permission,
            Role,
            HealthResponse,
            ServiceStatus,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Authentication", description = "Registration, login and the current user"),
        (name = "Users", description = "User administration"),
        (name = "Teams", description = "Teams and their permissions"),
        (name = "Resources", description = "Content and lead collections"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_generic_resource_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/{resource}"));
        assert!(doc.paths.paths.contains_key("/api/teams/{id}/members"));
    }
}
