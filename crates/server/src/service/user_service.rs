//! User administration service.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{normalize_email, Password, Role, Team, User, UserResponse};

use crate::repository::{TeamRepository, UserRepository};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Input for admin-side user creation
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub team_id: Option<Uuid>,
}

/// Partial update; `team_id: Some(None)` unassigns the team
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub role: Option<Role>,
    pub team_id: Option<Option<Uuid>>,
    pub password: Option<String>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// Like `get_user` but absence is not an error
    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// `actor` is the role of the admin performing the action
    async fn create_user(&self, actor: Role, input: NewUser) -> AppResult<User>;

    async fn update_user(&self, actor: Role, id: Uuid, changes: UserChanges) -> AppResult<User>;

    /// `actor_id` and `actor` identify the admin performing the delete
    async fn delete_user(&self, actor_id: Uuid, actor: Role, id: Uuid) -> AppResult<()>;

    /// Team the user belongs to, if any
    async fn team_of(&self, user: &User) -> AppResult<Option<Team>>;

    /// Public representation including the team summary
    async fn describe(&self, user: &User) -> AppResult<UserResponse>;

    async fn describe_all(&self, users: Vec<User>) -> AppResult<Vec<UserResponse>>;
}

pub struct UserManager {
    users: Arc<dyn UserRepository>,
    teams: Arc<dyn TeamRepository>,
}

impl UserManager {
    pub fn new(users: Arc<dyn UserRepository>, teams: Arc<dyn TeamRepository>) -> Self {
        Self { users, teams }
    }

    fn check_grant(actor: Role, role: Role) -> AppResult<()> {
        if role.is_superadmin() && !actor.is_superadmin() {
            return Err(AppError::forbidden(
                "Only a superadmin can assign the superadmin role",
            ));
        }
        Ok(())
    }

    /// Superadmin accounts are managed only by superadmins.
    fn check_target(actor: Role, target: &User) -> AppResult<()> {
        if target.role.is_superadmin() && !actor.is_superadmin() {
            return Err(AppError::forbidden(
                "Only a superadmin can modify a superadmin account",
            ));
        }
        Ok(())
    }

    async fn check_team(&self, team_id: Option<Uuid>) -> AppResult<()> {
        if let Some(team_id) = team_id {
            if self.teams.find_by_id(team_id).await?.is_none() {
                return Err(AppError::bad_request("Team not found"));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.users.find_by_id(id).await?.ok_or_not_found("User")
    }

    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        self.users.find_by_id(id).await
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.users.list().await
    }

    async fn create_user(&self, actor: Role, input: NewUser) -> AppResult<User> {
        Self::check_grant(actor, input.role)?;

        let email = normalize_email(&input.email);
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("User with this email"));
        }
        self.check_team(input.team_id).await?;

        let password = Password::new(&input.password)?;
        let user = User::new(&input.name, &email, password, input.role)?.with_team(input.team_id);

        let user = self.users.insert(&user).await?;
        tracing::info!(user_id = %user.id, role = %user.role, "User created");
        Ok(user)
    }

    async fn update_user(&self, actor: Role, id: Uuid, changes: UserChanges) -> AppResult<User> {
        let mut user = self.get_user(id).await?;
        Self::check_target(actor, &user)?;

        if let Some(role) = changes.role {
            Self::check_grant(actor, role)?;
            user.update_role(role);
        }
        if let Some(name) = changes.name {
            user.update_name(&name)?;
        }
        if let Some(team_id) = changes.team_id {
            self.check_team(team_id).await?;
            user.assign_team(team_id);
        }
        if let Some(password) = changes.password {
            user.change_password(Password::new(&password)?);
        }

        self.users.update(&user).await
    }

    async fn delete_user(&self, actor_id: Uuid, actor: Role, id: Uuid) -> AppResult<()> {
        if actor_id == id {
            return Err(AppError::bad_request("You cannot delete your own account"));
        }
        let user = self.get_user(id).await?;
        Self::check_target(actor, &user)?;

        if !self.users.delete(user.id).await? {
            return Err(AppError::not_found("User"));
        }
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    async fn team_of(&self, user: &User) -> AppResult<Option<Team>> {
        match user.team_id {
            Some(team_id) => self.teams.find_by_id(team_id).await,
            None => Ok(None),
        }
    }

    async fn describe(&self, user: &User) -> AppResult<UserResponse> {
        let team = self.team_of(user).await?;
        Ok(UserResponse::new(user, team.as_ref().map(Team::summary)))
    }

    async fn describe_all(&self, users: Vec<User>) -> AppResult<Vec<UserResponse>> {
        let teams: HashMap<Uuid, Team> = self
            .teams
            .list()
            .await?
            .into_iter()
            .map(|t| (t.id, t))
            .collect();

        Ok(users
            .iter()
            .map(|user| {
                let team = user.team_id.and_then(|id| teams.get(&id)).map(Team::summary);
                UserResponse::new(user, team)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MockTeamRepository, MockUserRepository};
    use domain::{Permission, PermissionSet};
    use mockall::predicate::eq;

    fn user(role: Role) -> User {
        User::new("Sam", "sam@example.com", Password::from_hash("$argon2id$x"), role).unwrap()
    }

    fn team() -> Team {
        Team::new("Ops", None, [Permission::Branches].into_iter().collect::<PermissionSet>()).unwrap()
    }

    fn new_user(role: Role, team_id: Option<Uuid>) -> NewUser {
        NewUser {
            name: "Sam".into(),
            email: "sam@example.com".into(),
            password: "password123".into(),
            role,
            team_id,
        }
    }

    #[tokio::test]
    async fn test_admin_cannot_create_superadmin() {
        let service = UserManager::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(MockTeamRepository::new()),
        );
        let err = service
            .create_user(Role::Admin, new_user(Role::Superadmin, None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_create_with_unknown_team_is_rejected() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        users.expect_insert().never();
        let mut teams = MockTeamRepository::new();
        teams.expect_find_by_id().returning(|_| Ok(None));

        let service = UserManager::new(Arc::new(users), Arc::new(teams));
        let err = service
            .create_user(Role::Admin, new_user(Role::Staff, Some(Uuid::new_v4())))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Team not found");
    }

    #[tokio::test]
    async fn test_create_assigns_team() {
        let ops = team();
        let ops_id = ops.id;

        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        users.expect_insert().returning(|u| Ok(u.clone()));
        let mut teams = MockTeamRepository::new();
        teams
            .expect_find_by_id()
            .with(eq(ops_id))
            .returning(move |_| Ok(Some(ops.clone())));

        let service = UserManager::new(Arc::new(users), Arc::new(teams));
        let created = service
            .create_user(Role::Admin, new_user(Role::Staff, Some(ops_id)))
            .await
            .unwrap();
        assert_eq!(created.team_id, Some(ops_id));
    }

    #[tokio::test]
    async fn test_update_can_unassign_team() {
        let mut existing = user(Role::Staff);
        existing.team_id = Some(Uuid::new_v4());
        let id = existing.id;

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .with(eq(id))
            .returning(move |_| Ok(Some(existing.clone())));
        users.expect_update().returning(|u| Ok(u.clone()));

        let service = UserManager::new(Arc::new(users), Arc::new(MockTeamRepository::new()));
        let updated = service
            .update_user(
                Role::Admin,
                id,
                UserChanges {
                    team_id: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.team_id, None);
    }

    #[tokio::test]
    async fn test_self_delete_is_rejected() {
        let service = UserManager::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(MockTeamRepository::new()),
        );
        let id = Uuid::new_v4();
        let err = service.delete_user(id, Role::Admin, id).await.unwrap_err();
        assert_eq!(err.user_message(), "You cannot delete your own account");
    }

    #[tokio::test]
    async fn test_delete_missing_user() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));
        users.expect_delete().never();

        let service = UserManager::new(Arc::new(users), Arc::new(MockTeamRepository::new()));
        let err = service
            .delete_user(Uuid::new_v4(), Role::Admin, Uuid::new_v4())
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "User not found");
    }

    #[tokio::test]
    async fn test_admin_cannot_modify_superadmin() {
        let root = user(Role::Superadmin);
        let id = root.id;

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .with(eq(id))
            .returning(move |_| Ok(Some(root.clone())));
        users.expect_update().never();
        users.expect_delete().never();

        let service = UserManager::new(Arc::new(users), Arc::new(MockTeamRepository::new()));
        let err = service
            .update_user(
                Role::Admin,
                id,
                UserChanges {
                    password: Some("hijacked-pass".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let err = service
            .delete_user(Uuid::new_v4(), Role::Admin, id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_superadmin_can_demote_superadmin() {
        let other = user(Role::Superadmin);
        let id = other.id;

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(other.clone())));
        users.expect_update().returning(|u| Ok(u.clone()));

        let service = UserManager::new(Arc::new(users), Arc::new(MockTeamRepository::new()));
        let updated = service
            .update_user(
                Role::Superadmin,
                id,
                UserChanges {
                    role: Some(Role::Admin),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_describe_embeds_team_permissions() {
        let ops = team();
        let mut member = user(Role::Staff);
        member.team_id = Some(ops.id);

        let mut teams = MockTeamRepository::new();
        teams
            .expect_find_by_id()
            .returning(move |_| Ok(Some(ops.clone())));

        let service = UserManager::new(Arc::new(MockUserRepository::new()), Arc::new(teams));
        let response = service.describe(&member).await.unwrap();
        let summary = response.team.unwrap();
        assert_eq!(summary.name, "Ops");
        assert_eq!(summary.permissions, vec![Permission::Branches]);
    }
}
