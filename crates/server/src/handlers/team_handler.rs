//! Team administration handlers.

use axum::{
    extract::{Extension, Path, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use common::AppResult;
use domain::{Access, Permission, TeamResponse, UserResponse};

use super::parse_id;
use crate::extractors::ValidatedJson;
use crate::middleware::{authorize, require_admin, CurrentUser};
use crate::service::{NewTeam, TeamChanges};
use crate::state::AppState;
use crate::types::{ApiResponse, Created, ListResponse};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTeamRequest {
    #[validate(length(min = 1, message = "Team name is required"))]
    #[schema(example = "Admissions")]
    pub name: String,
    pub description: Option<String>,
    /// Permission tags, see `GET /api/teams/permissions`
    #[serde(default)]
    #[schema(example = json!(["leads", "applications"]))]
    pub permissions: Vec<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTeamRequest {
    #[validate(length(min = 1, message = "Team name is required"))]
    pub name: Option<String>,
    pub description: Option<String>,
    /// Replaces the whole set when present
    pub permissions: Option<Vec<String>>,
}

pub fn team_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_teams).post(create_team))
        .route("/permissions", get(list_permissions))
        .route("/:id", get(get_team).put(update_team).delete(delete_team))
        .route("/:id/members", get(team_members))
}

/// List teams sorted by name
#[utoipa::path(
    get,
    path = "/api/teams",
    tag = "Teams",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All teams", body = Vec<TeamResponse>),
        (status = 403, description = "Admins only")
    )
)]
pub async fn list_teams(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<ListResponse<TeamResponse>>> {
    require_admin(&current_user)?;
    let teams = state.team_service.list_teams().await?;
    Ok(Json(ListResponse::new(
        teams.into_iter().map(TeamResponse::from).collect(),
    )))
}

/// Every permission tag a team can hold
#[utoipa::path(
    get,
    path = "/api/teams/permissions",
    tag = "Teams",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Permission tags", body = Vec<Permission>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_permissions(
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<Vec<Permission>>>> {
    authorize(Access::authenticated(), Some(&current_user))?;
    Ok(Json(ApiResponse::success(Permission::ALL.to_vec())))
}

#[utoipa::path(
    get,
    path = "/api/teams/{id}",
    tag = "Teams",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Team ID")),
    responses(
        (status = 200, description = "Team", body = TeamResponse),
        (status = 404, description = "Team not found")
    )
)]
pub async fn get_team(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<TeamResponse>>> {
    require_admin(&current_user)?;
    let team = state.team_service.get_team(parse_id(&id, "Team")?).await?;
    Ok(Json(ApiResponse::success(TeamResponse::from(team))))
}

#[utoipa::path(
    post,
    path = "/api/teams",
    tag = "Teams",
    security(("bearer_auth" = [])),
    request_body = CreateTeamRequest,
    responses(
        (status = 201, description = "Team created", body = TeamResponse),
        (status = 400, description = "Validation error, unknown permission or duplicate name"),
        (status = 403, description = "Admins only")
    )
)]
pub async fn create_team(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateTeamRequest>,
) -> AppResult<Created<TeamResponse>> {
    require_admin(&current_user)?;
    let team = state
        .team_service
        .create_team(NewTeam {
            name: payload.name,
            description: payload.description,
            permissions: payload.permissions,
        })
        .await?;
    Ok(Created(TeamResponse::from(team)))
}

#[utoipa::path(
    put,
    path = "/api/teams/{id}",
    tag = "Teams",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Team ID")),
    request_body = UpdateTeamRequest,
    responses(
        (status = 200, description = "Team updated", body = TeamResponse),
        (status = 400, description = "Validation error or duplicate name"),
        (status = 404, description = "Team not found")
    )
)]
pub async fn update_team(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateTeamRequest>,
) -> AppResult<Json<ApiResponse<TeamResponse>>> {
    require_admin(&current_user)?;
    let team = state
        .team_service
        .update_team(
            parse_id(&id, "Team")?,
            TeamChanges {
                name: payload.name,
                description: payload.description,
                permissions: payload.permissions,
            },
        )
        .await?;
    Ok(Json(ApiResponse::success(TeamResponse::from(team))))
}

/// Delete a team with no members
#[utoipa::path(
    delete,
    path = "/api/teams/{id}",
    tag = "Teams",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Team ID")),
    responses(
        (status = 200, description = "Team deleted"),
        (status = 400, description = "Team still has members"),
        (status = 404, description = "Team not found")
    )
)]
pub async fn delete_team(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    require_admin(&current_user)?;
    state.team_service.delete_team(parse_id(&id, "Team")?).await?;
    Ok(Json(ApiResponse::message("Team deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/api/teams/{id}/members",
    tag = "Teams",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Team ID")),
    responses(
        (status = 200, description = "Users assigned to the team", body = Vec<UserResponse>),
        (status = 404, description = "Team not found")
    )
)]
pub async fn team_members(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ListResponse<UserResponse>>> {
    require_admin(&current_user)?;
    let members = state
        .team_service
        .team_members(parse_id(&id, "Team")?)
        .await?;
    Ok(Json(ListResponse::new(
        state.user_service.describe_all(members).await?,
    )))
}
