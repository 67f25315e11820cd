//! yeti-migrate CLI
//!
//! Command-line tool for applying and inspecting migrations.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use yeti_migrate::{MigrationSystem, SqliteAdapter};

/// Hash-verified, ordered database migrations.
#[derive(Parser)]
#[command(name = "yeti-migrate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL (SQLite path or connection string).
    #[arg(short, long, env = "DATABASE_URL", default_value = "sqlite:yeti.db?mode=rwc")]
    database: String,

    /// Migrations directory.
    #[arg(short, long, default_value = "migrations")]
    migrations_dir: PathBuf,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending migrations.
    Migrate,

    /// Show applied and pending migrations.
    Status,

    /// Check sequence, contiguity and hashes without applying anything.
    Validate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut system = MigrationSystem::new(SqliteAdapter::new(&cli.database));

    match cli.command {
        Commands::Migrate => {
            let report = system.migrate(&cli.migrations_dir).await?;
            if report.newly_applied.is_empty() {
                info!("Nothing to apply, database is up to date.");
            } else {
                info!("Applied {} migration(s).", report.newly_applied.len());
            }
        }

        Commands::Status => {
            let status = system.status(&cli.migrations_dir).await?;

            if status.applied.is_empty() {
                info!("No migrations have been applied yet.");
            } else {
                println!("\nApplied migrations:");
                println!("{:-<60}", "");
                for migration in &status.applied {
                    println!(
                        " [X] {:>4} {} ({})",
                        migration.id,
                        migration.name,
                        migration.applied_at.format("%Y-%m-%d %H:%M:%S")
                    );
                }
            }

            if status.pending.is_empty() {
                println!("\nNo pending migrations.");
            } else {
                println!("\nPending migrations:");
                println!("{:-<60}", "");
                for migration in &status.pending {
                    println!(" [ ] {:>4} {}", migration.id, migration.name);
                }
            }
            println!();
        }

        Commands::Validate => {
            system.check(&cli.migrations_dir).await?;
            info!("Migration set is valid.");
        }
    }

    Ok(())
}
