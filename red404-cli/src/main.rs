//! Main entry point for the red404 CLI.

use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use dotenv::dotenv;
use session::SessionService;
use shared::config::Config;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{
    config::ConfigFormat,
    open::OpenArgs,
    register::RegisterArgs,
    session::SessionCommand,
};

/// red404 CLI
#[derive(Parser)]
#[command(name = "red404")]
#[command(about = "Command-line client for the red404 session API", long_about = None)]
struct Cli {
    /// Path to a configuration file (toml, yaml or json)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL; overrides the config file and `VITE_API_URL`
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Subcommands for the red404 CLI
#[derive(Subcommand)]
enum Commands {
    /// Sign in, sign out or inspect the stored session
    #[command(subcommand)]
    Session(SessionCommand),

    /// Create a new account
    Register(RegisterArgs),

    /// Show what the route guard decides for a path
    Open(OpenArgs),

    /// Generate shell completion scripts for the CLI
    Completion {
        /// The shell type for which to generate the completion script
        #[arg(long, short, value_enum)]
        shell: Shell,
    },

    /// Generate a configuration file
    Config {
        /// Format of the configuration file to generate. Defaults to toml.
        #[arg(long, short, value_enum, default_value_t = ConfigFormat::Toml)]
        format: ConfigFormat,
    },
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn load_session(cli: &Cli) -> Result<(Config, SessionService)> {
    let config = Config::load_config(cli.config.as_deref(), cli.api_url.as_deref())
        .context("failed to load configuration")?;
    init_tracing(&config.log_level);
    debug!(storage = %config.resolved_storage_path().display(), "using session storage");
    let session = SessionService::from_config(&config);
    Ok((config, session))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Session(command) => {
            let (config, session) = load_session(&cli)?;
            commands::session::run(&config, &session, command).await?;
        }
        Commands::Register(args) => {
            let (_, session) = load_session(&cli)?;
            commands::register::register(&session, args).await?;
        }
        Commands::Open(args) => {
            let (_, session) = load_session(&cli)?;
            commands::open::open(&session, args);
        }
        Commands::Completion { shell } => {
            commands::completion::generate_completion(*shell);
        }
        Commands::Config { format } => {
            commands::config::generate_config(*format)?;
        }
    }

    Ok(())
}
