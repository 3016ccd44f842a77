//! Create-admin command - Provisions an administrator account.
//!
//! Registration only ever creates staff, so the first admin has to come from here.

use common::{AppError, AppResult, DatabaseConfig};
use domain::{normalize_email, Password, Role, User};
use sea_orm::DatabaseConnection;

use crate::cli::args::CreateAdminArgs;
use crate::infra::Database;
use crate::repository::{UserRepository, UserStore};

pub async fn execute(args: CreateAdminArgs, config: &DatabaseConfig) -> AppResult<()> {
    let db = Database::connect(config).await?;
    let user = provision(
        db.get_connection(),
        &args.name,
        &args.email,
        &args.password,
        args.role.into(),
    )
    .await?;

    tracing::info!(user_id = %user.id, email = %user.email, role = %user.role, "Admin account created");
    println!("Created {} {} ({})", user.role, user.email, user.id);
    Ok(())
}

/// Insert an admin or superadmin without going through the HTTP gate.
pub async fn provision(
    db: DatabaseConnection,
    name: &str,
    email: &str,
    password: &str,
    role: Role,
) -> AppResult<User> {
    if !role.is_admin() {
        return Err(AppError::validation("create-admin only creates admin or superadmin accounts"));
    }

    let users = UserStore::new(db);
    let email = normalize_email(email);
    if users.find_by_email(&email).await?.is_some() {
        return Err(AppError::conflict("User with this email"));
    }

    let user = User::new(name, &email, Password::new(password)?, role)?;
    users.insert(&user).await
}
