//! Tutorly CLI — the main entry point.
//!
//! Commands:
//! - `serve`     — Start the web UI and HTTP API
//! - `recommend` — Offline learning-path recommendations
//! - `init`      — Write a default config file
//! - `doctor`    — Diagnose configuration and credentials

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "tutorly",
    about = "Tutorly — AI teaching assistant for Python, Data Science, and AI",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Config file (default: ~/.tutorly/config.toml)
    #[arg(short, long, global = true, env = "TUTORLY_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web UI and HTTP API
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,

        /// Override the bind address
        #[arg(long)]
        host: Option<String>,
    },

    /// Show recommended paths, resources, and projects without calling the model
    Recommend {
        /// Knowledge level: beginner, intermediate, advanced, or expert
        #[arg(short, long, default_value = "beginner")]
        level: tutorly_core::KnowledgeLevel,

        /// Free-text interests, e.g. "python, statistics"
        #[arg(short, long, default_value = "")]
        interests: String,

        /// Print JSON instead of Markdown
        #[arg(long)]
        json: bool,
    },

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Diagnose configuration and credentials
    Doctor {
        /// Also contact the provider
        #[arg(long)]
        ping: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Serve { port, host } => commands::serve::run(config, port, host).await?,
        Commands::Recommend {
            level,
            interests,
            json,
        } => commands::recommend::run(config, level, &interests, json)?,
        Commands::Init { force } => commands::init::run(config, force)?,
        Commands::Doctor { ping } => commands::doctor::run(config, ping).await?,
    }

    Ok(())
}
