//! CLI argument definitions.

use clap::{Parser, Subcommand, ValueEnum};

use domain::Role;

/// Consultancy CMS backend
#[derive(Parser, Debug)]
#[command(name = "cms-server")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Create an admin or superadmin account
    CreateAdmin(CreateAdminArgs),
}

/// Overrides for `SERVER_HOST` / `SERVER_PORT`
#[derive(Parser, Debug)]
pub struct ServeArgs {
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    #[arg(short, long)]
    pub port: Option<u16>,
}

#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
}

#[derive(Parser, Debug)]
pub struct CreateAdminArgs {
    #[arg(long, env = "ADMIN_NAME", default_value = "Administrator")]
    pub name: String,

    #[arg(long, env = "ADMIN_EMAIL")]
    pub email: String,

    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    pub password: String,

    #[arg(long, value_enum, default_value_t = AdminRole::Superadmin)]
    pub role: AdminRole,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminRole {
    Admin,
    Superadmin,
}

impl From<AdminRole> for Role {
    fn from(role: AdminRole) -> Self {
        match role {
            AdminRole::Admin => Role::Admin,
            AdminRole::Superadmin => Role::Superadmin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::parse_from(["cms-server", "serve", "--port", "8080"]);
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.port, Some(8080));
                assert_eq!(args.host, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_create_admin() {
        let cli = Cli::parse_from([
            "cms-server",
            "-v",
            "create-admin",
            "--email",
            "root@example.com",
            "--password",
            "password123",
            "--role",
            "admin",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Commands::CreateAdmin(args) => {
                assert_eq!(args.email, "root@example.com");
                assert_eq!(Role::from(args.role), Role::Admin);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_migrate() {
        let cli = Cli::parse_from(["cms-server", "migrate", "fresh"]);
        assert!(matches!(
            cli.command,
            Commands::Migrate(MigrateArgs {
                action: MigrateAction::Fresh
            })
        ));
    }
}
