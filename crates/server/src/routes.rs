//! Route configuration.

use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::get,
    Extension, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::AppError;
use domain::catalog;

use crate::handlers::{
    auth_routes, health, me_routes, resource_routes, team_routes, user_routes,
};
use crate::middleware::{auth_middleware, optional_auth_middleware};
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState, cors_origin: Option<&str>) -> Router {
    let mut api = Router::new()
        // Register and login are public, `/me` needs a token
        .nest(
            "/auth",
            auth_routes().merge(me_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            ))),
        )
        .nest(
            "/users",
            user_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .nest(
            "/teams",
            team_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        );

    // One router per collection; access is decided per operation in the handler
    for spec in catalog::ALL.iter().copied() {
        api = api.nest(
            &format!("/{}", spec.name),
            resource_routes()
                .layer(Extension(spec))
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    optional_auth_middleware,
                )),
        );
    }

    Router::new()
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api)
        .fallback(|| async { AppError::not_found("Route") })
        .layer(cors_layer(cors_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let Some(origin) = origin else {
        return CorsLayer::permissive();
    };

    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    match origin.parse::<HeaderValue>() {
        Ok(value) => layer.allow_origin(value),
        Err(_) => {
            tracing::warn!(origin, "Ignoring invalid CORS_ALLOWED_ORIGIN, cross-origin requests disabled");
            layer
        }
    }
}
