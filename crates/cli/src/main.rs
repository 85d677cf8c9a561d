//! AutoPart CLI - migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply workspace migrations
//! autopart migrate
//!
//! # Create a back-office account (password from AUTOPART_ADMIN_PASSWORD or stdin)
//! autopart admin create -e dono@autopart.com.br -n "Dono" -r admin
//!
//! # List back-office accounts
//! autopart admin list
//!
//! # Load the starter catalog, or a YAML file
//! autopart seed products
//! autopart seed products --file catalog.yaml
//! ```
//!
//! The database URL comes from `AUTOPART_DATABASE_URL`, falling back to
//! `DATABASE_URL`. A `.env` file is honored.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use autopart_core::AdminRole;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "autopart")]
#[command(author, version, about = "AutoPart CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply database migrations
    Migrate,
    /// Manage back-office accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Load data into the database
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a back-office account
    Create {
        /// Login email address
        #[arg(short, long)]
        email: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Role (`admin` or `viewer`)
        #[arg(short, long, default_value = "admin", value_parser = parse_role)]
        role: AdminRole,
    },
    /// List back-office accounts
    List,
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Upsert products by SKU
    Products {
        /// YAML list of products; the starter catalog when omitted
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

fn parse_role(s: &str) -> Result<AdminRole, String> {
    s.parse::<AdminRole>().map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "autopart_cli=info,autopart_admin=info".into()),
        )
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Create { email, name, role } => {
                commands::admin::create_user(&email, &name, role).await?;
            }
            AdminAction::List => commands::admin::list_users().await?,
        },
        Commands::Seed { target } => match target {
            SeedTarget::Products { file } => commands::seed::products(file.as_deref()).await?,
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_admin_create() {
        let cli = Cli::try_parse_from([
            "autopart", "admin", "create", "-e", "a@b.c", "-n", "Ana", "-r", "viewer",
        ])
        .unwrap_or_else(|e| panic!("{e}"));
        match cli.command {
            Commands::Admin {
                action: AdminAction::Create { role, .. },
            } => assert_eq!(role, AdminRole::Viewer),
            _ => panic!("wrong subcommand"),
        }
    }

    #[test]
    fn rejects_unknown_role() {
        assert!(
            Cli::try_parse_from(["autopart", "admin", "create", "-e", "a@b.c", "-n", "A", "-r", "root"])
                .is_err()
        );
    }

    #[test]
    fn seed_file_is_optional() {
        let cli = Cli::try_parse_from(["autopart", "seed", "products"])
            .unwrap_or_else(|e| panic!("{e}"));
        assert!(matches!(
            cli.command,
            Commands::Seed {
                target: SeedTarget::Products { file: None }
            }
        ));
    }
}
