//! JWT authentication middleware and the per-route access gate.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{Access, Caller, Role, Team, BEARER_TOKEN_PREFIX};

use crate::state::AppState;

/// Authenticated user resolved from the bearer token.
///
/// User and team are reloaded on every request, never taken from the token.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub team: Option<Team>,
}

impl CurrentUser {
    /// What the access gate sees of this user.
    pub fn caller(&self) -> Caller {
        Caller::new(self.role, self.team.as_ref().map(|t| t.permissions.clone()))
    }
}

/// Require a valid bearer token, then inject [`CurrentUser`] into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request).ok_or(AppError::Unauthorized)?;
    let current_user = resolve(&state, token).await?;

    request.extensions_mut().insert(current_user);
    Ok(next.run(request).await)
}

/// Like [`auth_middleware`] but lets anonymous requests through.
///
/// A token that is present but invalid is still rejected.
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(token) = bearer_token(&request) {
        let current_user = resolve(&state, token).await?;
        request.extensions_mut().insert(current_user);
    }
    Ok(next.run(request).await)
}

fn bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

async fn resolve(state: &AppState, token: String) -> AppResult<CurrentUser> {
    let claims = state.auth_service.verify_token(&token)?;

    let Some(user) = state.user_service.find_user(claims.sub).await? else {
        tracing::debug!(user_id = %claims.sub, "Token subject no longer exists");
        return Err(AppError::Unauthorized);
    };
    let team = state.user_service.team_of(&user).await?;

    Ok(CurrentUser {
        id: user.id,
        email: user.email,
        name: user.name,
        role: user.role,
        team,
    })
}

/// Evaluate a route's access rule against the (possibly anonymous) caller.
pub fn authorize(access: Access, user: Option<&CurrentUser>) -> AppResult<()> {
    let caller = user.map(CurrentUser::caller);
    access.authorize(caller.as_ref()).map_err(|e| {
        tracing::debug!(user_id = ?user.map(|u| u.id), reason = %e, "Access denied");
        AppError::from(e)
    })
}

/// Admin and superadmin only.
pub fn require_admin(user: &CurrentUser) -> AppResult<()> {
    authorize(Access::admins(), Some(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{Permission, PermissionSet};

    fn user(role: Role, team: Option<Team>) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            email: "sam@example.com".into(),
            name: "Sam".into(),
            role,
            team,
        }
    }

    fn team(permissions: &[Permission]) -> Team {
        Team::new("Ops", None, permissions.iter().copied().collect::<PermissionSet>()).unwrap()
    }

    #[test]
    fn test_anonymous_is_unauthorized_on_gated_routes() {
        let err = authorize(Access::staff(Permission::Blogs), None).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
        assert!(authorize(Access::Public, None).is_ok());
    }

    #[test]
    fn test_staff_is_not_admin() {
        let err = require_admin(&user(Role::Staff, None)).unwrap_err();
        assert_eq!(
            err.user_message(),
            "User role 'staff' is not authorized to access this route"
        );
        assert!(require_admin(&user(Role::Admin, None)).is_ok());
    }

    #[test]
    fn test_team_permissions_reach_the_gate() {
        let staff = user(Role::Staff, Some(team(&[Permission::Classes])));
        assert!(authorize(Access::staff(Permission::Classes), Some(&staff)).is_ok());

        let err = authorize(Access::staff(Permission::Universities), Some(&staff)).unwrap_err();
        assert_eq!(
            err.user_message(),
            "Access denied. Requires 'universities' permission"
        );
    }

    #[test]
    fn test_superadmin_without_team_passes() {
        let root = user(Role::Superadmin, None);
        assert!(authorize(Access::staff(Permission::Settings), Some(&root)).is_ok());
    }
}
