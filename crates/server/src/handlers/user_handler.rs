//! User administration handlers (admin and superadmin).

use axum::{
    extract::{Extension, Path, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use common::AppResult;
use domain::{Role, UserResponse};

use super::{double_option, parse_id};
use crate::extractors::ValidatedJson;
use crate::middleware::{require_admin, CurrentUser};
use crate::service::{NewUser, UserChanges};
use crate::state::AppState;
use crate::types::{ApiResponse, Created, ListResponse};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Sam Staff")]
    pub name: String,
    #[validate(email(message = "Please provide a valid email"))]
    #[schema(example = "sam@example.com")]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    /// Defaults to staff
    pub role: Option<Role>,
    /// Team id
    pub team: Option<Uuid>,
}

/// Partial update; `"team": null` unassigns the team
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub role: Option<Role>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Uuid>)]
    pub team: Option<Option<Uuid>>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

/// List all users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All users with their teams", body = Vec<UserResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admins only")
    )
)]
pub async fn list_users(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<ListResponse<UserResponse>>> {
    require_admin(&current_user)?;
    let users = state.user_service.list_users().await?;
    Ok(Json(ListResponse::new(
        state.user_service.describe_all(users).await?,
    )))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 403, description = "Admins only"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    require_admin(&current_user)?;
    let user = state.user_service.get_user(parse_id(&id, "User")?).await?;
    Ok(Json(ApiResponse::success(
        state.user_service.describe(&user).await?,
    )))
}

/// Create a user, optionally in a team
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation error, duplicate email or unknown team"),
        (status = 403, description = "Admins only; superadmin role needs a superadmin")
    )
)]
pub async fn create_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<Created<UserResponse>> {
    require_admin(&current_user)?;
    let input = NewUser {
        name: payload.name,
        email: payload.email,
        password: payload.password,
        role: payload.role.unwrap_or_default(),
        team_id: payload.team,
    };
    let user = state
        .user_service
        .create_user(current_user.role, input)
        .await?;
    Ok(Created(state.user_service.describe(&user).await?))
}

/// Update name, role, team or password
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation error or unknown team"),
        (status = 403, description = "Admins only; superadmin accounts need a superadmin"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    require_admin(&current_user)?;
    let changes = UserChanges {
        name: payload.name,
        role: payload.role,
        team_id: payload.team,
        password: payload.password,
    };
    let user = state
        .user_service
        .update_user(current_user.role, parse_id(&id, "User")?, changes)
        .await?;
    Ok(Json(ApiResponse::success(
        state.user_service.describe(&user).await?,
    )))
}

/// Delete a user other than yourself
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 400, description = "Cannot delete own account"),
        (status = 403, description = "Admins only; superadmin accounts need a superadmin"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    require_admin(&current_user)?;
    state
        .user_service
        .delete_user(current_user.id, current_user.role, parse_id(&id, "User")?)
        .await?;
    Ok(Json(ApiResponse::message("User deleted successfully")))
}
