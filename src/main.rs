//! Appraise CLI
//!
//! Terminal front end for the employee appraisal service.

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cli::{
    appraisals::AppraisalsAction, config::ConfigAction, helpers::Context,
    projects::ProjectsAction,
};
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(name = "appraise")]
#[command(about = "Terminal client for the employee appraisal service", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Set log level
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// API base URL (overrides config file and APPRAISE_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Config file path (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session
    Login {
        /// Username
        #[arg(short, long)]
        username: String,

        /// Password (prompted when omitted)
        #[arg(short, long, env = "APPRAISE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Sign out and clear the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Profile and quick stats
    Dashboard,

    /// Projects and their members
    Projects {
        #[command(subcommand)]
        action: ProjectsAction,
    },

    /// List appraisal cycles
    Cycles {
        /// Only cycles in this status (draft, active, closed)
        #[arg(long)]
        status: Option<String>,
    },

    /// Appraisals, ratings and signatures
    Appraisals {
        #[command(subcommand)]
        action: AppraisalsAction,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    // Our crates at the requested level, HTTP internals only when they warn
    let filter = EnvFilter::new(format!(
        "appraise={level},appraise_core={level},reqwest=warn,hyper=warn",
        level = level.as_str().to_lowercase()
    ));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr) // Write logs to stderr, not stdout
        .init();

    debug!("Appraise v{} starting...", env!("CARGO_PKG_VERSION"));

    let config_file = cli.config.as_deref();
    let api_url = cli.api_url.as_deref();

    // Config needs no session
    let command = match cli.command {
        Commands::Config { action } => {
            return Ok(cli::config::handle(action, config_file, api_url).await?)
        }
        command => command,
    };

    let ctx = Context::build(config_file, api_url)?;
    match command {
        Commands::Login { username, password } => {
            cli::auth::handle_login(&ctx, &username, password).await?
        }
        Commands::Logout => cli::auth::handle_logout(&ctx).await?,
        Commands::Whoami => cli::auth::handle_whoami(&ctx).await?,
        Commands::Dashboard => cli::dashboard::handle(&ctx).await?,
        Commands::Projects { action } => cli::projects::handle(&ctx, action).await?,
        Commands::Cycles { status } => cli::cycles::handle(&ctx, status).await?,
        Commands::Appraisals { action } => cli::appraisals::handle(&ctx, action).await?,
        Commands::Config { .. } => {}
    }
    Ok(())
}
