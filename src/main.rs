//! Access gatekeeper (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                 GATEKEEPER                   │
//!   Client Request     │  ┌──────┐   ┌──────┐   ┌────────┐   ┌──────┐ │
//!   ───────────────────┼─▶│ req  │──▶│ CORS │──▶│ access │──▶│handler│ │
//!                      │  │  id  │   │      │   │  gate  │   │       │ │
//!                      │  └──────┘   └──┬───┘   └───┬────┘   └──┬───┘ │
//!   Client Response    │                │ preflight  │ 401       │     │
//!   ◀──────────────────┼────────────────┴────────────┴───────────┘     │
//!                      │                                              │
//!                      │  config · observability · lifecycle          │
//!                      └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use gatekeeper::config::{load_config, validate_config, ConfigError, GatekeeperConfig};
use gatekeeper::lifecycle::{self, signals, Shutdown};
use gatekeeper::observability::logging;
use gatekeeper::security::{issue_token, AllowList};

#[derive(Parser)]
#[command(name = "gatekeeper", version)]
#[command(about = "Stateless CORS and access gate in front of the API", long_about = None)]
struct Cli {
    /// TOML configuration file; built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the server (default)
    Serve,
    /// Validate the configuration and print a summary
    CheckConfig,
    /// Report whether a path is exempt from authentication
    CheckPath { path: String },
    /// Mint an HS256 development token with the configured secret
    Token {
        #[arg(long)]
        subject: String,
        /// Token lifetime; the token never expires when omitted.
        #[arg(long)]
        ttl_secs: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => {
            let config = GatekeeperConfig::default();
            validate_config(&config).map_err(ConfigError::Validation)?;
            config
        }
    };

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await?,
        Commands::CheckConfig => {
            println!("configuration OK");
            println!("  bind address : {}", config.listener.bind_address);
            println!("  allow-list   : {}", config.access.allow_list.join(", "));
            println!("  cors origins : {}", config.cors.allowed_origins.join(", "));
            println!(
                "  credentials  : {}",
                if config.auth.jwt.is_some() { "HS256 bearer" } else { "none (deny all)" }
            );
        }
        Commands::CheckPath { path } => {
            let allow_list = AllowList::from_patterns(&config.access.allow_list)?;
            match allow_list.matching_pattern(&path) {
                Some(pattern) => println!("{path}: exempt (matches {pattern})"),
                None => println!("{path}: credentials required"),
            }
        }
        Commands::Token { subject, ttl_secs } => {
            let jwt = config
                .auth
                .jwt
                .as_ref()
                .ok_or("auth.jwt is not configured")?;
            let token = issue_token(jwt, &subject, ttl_secs.map(Duration::from_secs))?;
            println!("{token}");
        }
    }

    Ok(())
}

async fn serve(config: GatekeeperConfig) -> Result<(), Box<dyn std::error::Error>> {
    logging::init(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "gatekeeper starting");

    let shutdown = std::sync::Arc::new(Shutdown::new());
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        trigger.trigger();
    });

    lifecycle::start(config, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
