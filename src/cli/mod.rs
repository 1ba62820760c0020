//! CLI module for RPC key lifecycle
//!
//! One subcommand per key operation, run against the backend selected in
//! configuration. Keys are printed as JSON, tokens one per line.

mod keys;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::AppConfig;
use crate::domain::Network;
use crate::infrastructure::key_service::KeyLifecycleFacade;
use crate::infrastructure::logging;

/// RPC Key Lifecycle - manage project API keys per network
#[derive(Debug, Parser)]
#[command(name = "rpc-key-lifecycle")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Network the project's keys live on (net-a or net-b)
    #[arg(long, short, global = true, default_value = "net-a")]
    pub network: Network,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Register a project and issue its first key
    CreateProject { project_ref: String },

    /// Issue a new key for a project
    Generate { project_ref: String },

    /// Print the project's current valid token
    Fetch { project_ref: String },

    /// Print every token of the project, valid or not
    FetchAll { project_ref: String },

    /// Revoke the project's current key
    Invalidate { project_ref: String },

    /// Revoke the current key and issue a new one
    Rotate { project_ref: String },
}

impl Command {
    pub fn project_ref(&self) -> &str {
        match self {
            Command::CreateProject { project_ref }
            | Command::Generate { project_ref }
            | Command::Fetch { project_ref }
            | Command::FetchAll { project_ref }
            | Command::Invalidate { project_ref }
            | Command::Rotate { project_ref } => project_ref,
        }
    }
}

/// Load configuration, build the facade and run one command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    let facade = KeyLifecycleFacade::from_config(&config.key_service)?;
    info!(
        backend = facade.backend_name(),
        network = %cli.network,
        project_ref = cli.command.project_ref(),
        "Running key command"
    );

    let output = keys::execute(&facade, &cli.command, cli.network).await?;
    if !output.is_empty() {
        println!("{}", output);
    }

    Ok(())
}
