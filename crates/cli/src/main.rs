//! Catalog CLI - Operator tools for the catalog document.
//!
//! # Usage
//!
//! ```bash
//! # Create an empty catalog document
//! catalog-cli init
//!
//! # Load categories and products from a YAML or JSON seed file
//! catalog-cli seed seed/catalog.yaml
//!
//! # Report broken category references and duplicate product ids
//! catalog-cli check
//!
//! # Print every product with its category names
//! catalog-cli --file /srv/catalog/products.json list
//! ```
//!
//! # Commands
//!
//! - `init` - Write an empty catalog document
//! - `seed` - Upsert categories and batch-create products
//! - `check` - Integrity report
//! - `list` - Product listing

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::process::ExitCode;

use catalog_api::config::DEFAULT_DATA_FILE;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "catalog-cli")]
#[command(author, version, about = "Catalog CLI tools")]
struct Cli {
    /// Path of the catalog document
    #[arg(short, long, global = true, env = "CATALOG_DATA_FILE", default_value = DEFAULT_DATA_FILE)]
    file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write an empty catalog document
    Init {
        /// Overwrite an existing document
        #[arg(long)]
        force: bool,
    },
    /// Load categories and products from a YAML or JSON seed file
    Seed {
        /// Seed file path
        path: PathBuf,
    },
    /// Report broken category references and duplicate product ids
    Check,
    /// Print every product with its category names
    List,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present so CATALOG_DATA_FILE can come from it
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("Command failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, commands::CommandError> {
    match cli.command {
        Commands::Init { force } => commands::init::run(&cli.file, force).await?,
        Commands::Seed { path } => {
            commands::seed::run(&cli.file, &path).await?;
        }
        Commands::Check => {
            let report = commands::check::run(&cli.file).await?;
            if report.has_errors() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::List => commands::list::run(&cli.file).await?,
    }
    Ok(ExitCode::SUCCESS)
}
