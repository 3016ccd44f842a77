//! Migrate command - Database migration management.

use common::{AppResult, DatabaseConfig};

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::infra::Database;

pub async fn execute(args: MigrateArgs, config: &DatabaseConfig) -> AppResult<()> {
    // Manual control, so no automatic `up` on connect
    let db = Database::connect_without_migrations(config).await?;

    match args.action {
        MigrateAction::Up => {
            tracing::info!("Running pending migrations...");
            db.run_migrations().await?;
            tracing::info!("Migrations completed successfully");
        }
        MigrateAction::Down => {
            tracing::info!("Rolling back last migration...");
            db.rollback_migration().await?;
            tracing::info!("Rollback completed successfully");
        }
        MigrateAction::Status => {
            for (name, applied) in db.migration_status().await? {
                let status = if applied { "applied" } else { "pending" };
                println!("{}: {}", name, status);
            }
        }
        MigrateAction::Fresh => {
            tracing::warn!("Dropping all tables and re-running migrations...");
            db.fresh_migrations().await?;
            tracing::info!("Fresh migrations completed successfully");
        }
    }

    Ok(())
}
