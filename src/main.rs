//! copydesk — brokerage backend with copy trading and a wallet ledger.
//!
//! Accounts hold a wallet balance, a trading balance, and a cumulative
//! profit counter; every movement between them is an atomic ledger
//! operation with exactly one transaction record.

mod api;
mod auth;
mod config;
mod db;
mod error;
mod ledger;
mod models;
mod notify;
mod seed;
mod server;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::config::AppConfig;
use crate::db::Database;

/// Brokerage backend CLI.
#[derive(Parser)]
#[command(name = "copydesk")]
#[command(about = "Brokerage backend with copy trading and a wallet ledger", long_about = None)]
struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "sqlite:./copydesk.db?mode=rwc")]
    database: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Listen address
        #[arg(short, long, default_value = "0.0.0.0:5000")]
        bind: String,
    },

    /// Load the trader catalog and bootstrap the admin account
    Seed {
        /// JSON file with the trader catalog
        #[arg(short, long, default_value = "traders.json")]
        file: PathBuf,

        /// Admin account email to ensure exists
        #[arg(long, env = "ADMIN_EMAIL")]
        admin_email: Option<String>,

        /// Password for a newly created admin account
        #[arg(long, env = "ADMIN_PASSWORD")]
        admin_password: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let level: Level = cli.log_level.parse().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Serve { bind } => {
            let config = AppConfig::from_env(cli.database, bind)?;
            server::run(config).await
        }

        Commands::Seed {
            file,
            admin_email,
            admin_password,
        } => {
            let db = Database::new(&cli.database).await?;

            let count = seed::seed_traders(&db, &file).await?;
            info!(count, file = %file.display(), "catalog loaded");

            if let (Some(email), Some(password)) = (admin_email, admin_password) {
                seed::ensure_admin(&db, &email, &password).await?;
            }

            Ok(())
        }
    }
}
