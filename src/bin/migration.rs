use clap::{Parser, Subcommand};
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing::info;

use munshi_api::migrator::Migrator;

/// Database migration runner for the munshi API
#[derive(Parser)]
#[command(name = "migration", about = "Run database migrations")]
struct Cli {
    /// Database URL; falls back to DATABASE_URL
    #[arg(long)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply all pending migrations
    Up,
    /// Roll back the last applied migration
    Down,
    /// Drop everything and re-apply from scratch
    Fresh,
    /// Show migration status
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let cli = Cli::parse();
    let url = cli
        .database_url
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .ok_or("Set --database-url or DATABASE_URL")?;

    let db = Database::connect(&url).await?;

    match cli.command {
        Command::Up => {
            info!("Applying pending migrations");
            Migrator::up(&db, None).await?;
        }
        Command::Down => {
            info!("Rolling back last migration");
            Migrator::down(&db, Some(1)).await?;
        }
        Command::Fresh => {
            info!("Re-creating schema from scratch");
            Migrator::fresh(&db).await?;
        }
        Command::Status => {
            Migrator::status(&db).await?;
        }
    }

    Ok(())
}
