//! HTTP middleware.

mod auth;

pub use auth::{
    auth_middleware, authorize, optional_auth_middleware, require_admin, CurrentUser,
};
