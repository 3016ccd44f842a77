//! Generic CRUD handlers mounted once per resource collection.
//!
//! The collection is chosen by the `Extension<&'static ResourceSpec>` layered
//! onto each nested router; access rules come from the same spec.

use std::collections::HashMap;

use axum::{
    extract::{Extension, Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde_json::Value;

use common::AppResult;
use domain::{ListQuery, Resource, ResourceSpec};

use crate::extractors::JsonBody;
use crate::middleware::{authorize, CurrentUser};
use crate::state::AppState;
use crate::types::{ApiResponse, Created, ListResponse};

type Spec = Extension<&'static ResourceSpec>;
type MaybeUser = Option<Extension<CurrentUser>>;

pub fn resource_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_resources).post(create_resource))
        .route(
            "/:id",
            get(get_resource)
                .put(update_resource)
                .delete(delete_resource),
        )
}

fn user(current_user: &MaybeUser) -> Option<&CurrentUser> {
    current_user.as_ref().map(|Extension(user)| user)
}

fn render(resource: &Resource) -> Value {
    resource.to_json()
}

/// List a collection
///
/// Query parameters filter by exact field value (`status`, `category`,
/// `country`, ...), tag membership (`tag`) or free text (`search`).
/// `status=all` disables the status filter.
#[utoipa::path(
    get,
    path = "/api/{resource}",
    tag = "Resources",
    params(("resource" = String, Path, description = "Collection name, e.g. blogs")),
    responses(
        (status = 200, description = "Filtered records"),
        (status = 401, description = "Unauthorized (lead collections)"),
        (status = 403, description = "Missing team permission")
    )
)]
pub async fn list_resources(
    Extension(spec): Spec,
    current_user: MaybeUser,
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<Json<ListResponse<Value>>> {
    authorize(spec.access.list, user(&current_user))?;
    let items = state
        .resource_service
        .list(spec, ListQuery::from(params))
        .await?;
    Ok(Json(ListResponse::new(items.iter().map(render).collect())))
}

#[utoipa::path(
    get,
    path = "/api/{resource}/{id}",
    tag = "Resources",
    params(
        ("resource" = String, Path, description = "Collection name"),
        ("id" = String, Path, description = "Record ID")
    ),
    responses(
        (status = 200, description = "The record"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_resource(
    Extension(spec): Spec,
    current_user: MaybeUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Value>>> {
    authorize(spec.access.get, user(&current_user))?;
    let resource = state.resource_service.get(spec, id).await?;
    Ok(Json(ApiResponse::success(render(&resource))))
}

#[utoipa::path(
    post,
    path = "/api/{resource}",
    tag = "Resources",
    params(("resource" = String, Path, description = "Collection name")),
    request_body(content = Object, description = "Record fields"),
    responses(
        (status = 201, description = "Created record"),
        (status = 400, description = "Missing field, invalid value or duplicate"),
        (status = 403, description = "Missing team permission")
    )
)]
pub async fn create_resource(
    Extension(spec): Spec,
    current_user: MaybeUser,
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> AppResult<Created<Value>> {
    authorize(spec.access.create, user(&current_user))?;
    let resource = state.resource_service.create(spec, body).await?;
    Ok(Created(render(&resource)))
}

/// Partial update, absent fields keep their values
#[utoipa::path(
    put,
    path = "/api/{resource}/{id}",
    tag = "Resources",
    params(
        ("resource" = String, Path, description = "Collection name"),
        ("id" = String, Path, description = "Record ID")
    ),
    request_body(content = Object, description = "Fields to change"),
    responses(
        (status = 200, description = "Merged record"),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_resource(
    Extension(spec): Spec,
    current_user: MaybeUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> AppResult<Json<ApiResponse<Value>>> {
    authorize(spec.access.update, user(&current_user))?;
    let resource = state.resource_service.update(spec, id, body).await?;
    Ok(Json(ApiResponse::success(render(&resource))))
}

#[utoipa::path(
    delete,
    path = "/api/{resource}/{id}",
    tag = "Resources",
    params(
        ("resource" = String, Path, description = "Collection name"),
        ("id" = String, Path, description = "Record ID")
    ),
    responses(
        (status = 200, description = "Deleted"),
        (status = 400, description = "Still referenced"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_resource(
    Extension(spec): Spec,
    current_user: MaybeUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    authorize(spec.access.delete, user(&current_user))?;
    state.resource_service.delete(spec, id).await?;
    Ok(Json(ApiResponse::message(spec.deleted_message())))
}
