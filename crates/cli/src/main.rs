//! Ventalink CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! vl-cli migrate
//!
//! # Seed the database with a demo store
//! vl-cli seed
//!
//! # Seed for a specific identity-provider user
//! vl-cli seed --owner 7d9f2c1e-0b7a-4f43-9a38-0f6a9c1d2e3f
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed the database with a demo store and catalog

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use uuid::Uuid;

mod commands;

#[derive(Parser)]
#[command(name = "vl-cli")]
#[command(author, version, about = "Ventalink CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with a demo store and catalog
    Seed {
        /// Identity-provider user id to own the demo store (random if omitted)
        #[arg(short, long)]
        owner: Option<Uuid>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { owner } => commands::seed::run(owner).await?,
    }
    Ok(())
}
