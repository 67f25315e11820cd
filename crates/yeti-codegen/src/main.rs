//! yeti-gen CLI
//!
//! Command-line tool for generating SQL DDL from Yeti schema files.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use yeti_codegen::postgres;
use yeti_core::{parse_document, Severity};

/// Generate SQL DDL from a Yeti schema definition.
#[derive(Parser)]
#[command(name = "yeti-gen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Schema file to read.
    schema: PathBuf,

    /// Output file (stdout if not specified).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Target SQL dialect.
    #[arg(short, long, value_enum, default_value_t = Target::Postgres)]
    dialect: Target,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Target {
    /// PostgreSQL.
    Postgres,
}

fn main() -> anyhow::Result<()> {
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

    let source = std::fs::read_to_string(&cli.schema)?;
    let result = parse_document(&source)?;

    for diag in &result.diagnostics {
        match diag.severity {
            Severity::Error => error!("{}: {} at {}", cli.schema.display(), diag.message, diag.span),
            Severity::Warning => warn!("{}: {} at {}", cli.schema.display(), diag.message, diag.span),
        }
    }
    if !result.is_clean() {
        anyhow::bail!("schema has syntax errors, no SQL generated");
    }

    let sql = match cli.dialect {
        Target::Postgres => postgres().generate(&result.ast)?,
    };

    match cli.output {
        Some(path) => {
            std::fs::write(&path, &sql)?;
            info!("Wrote {} bytes to {}", sql.len(), path.display());
        }
        None => println!("{sql}"),
    }

    Ok(())
}
