//! CLI definitions and entry point

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands;
use civicverify::config::Config;
use civicverify::output::OutputMode;

/// civicverify - Verification decisions for civic issue reports
#[derive(Parser, Debug)]
#[command(
    name = "civicverify",
    version,
    about = "Verification decisions for civic issue reports",
    long_about = "Decide whether a citizen's issue report is genuine, and whether the\n\
                  government's resolution photos show the work was done.\n\n\
                  Requests are JSON files (or '-' for stdin). Every decision is\n\
                  recorded so it can be queried later with 'status' and 'stats'."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output in JSON format (machine-readable)
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file (defaults to $CIVICVERIFY_CONFIG, then the user config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Verify a newly submitted issue
    Verify {
        /// Request JSON file, or '-' for stdin
        file: PathBuf,

        /// Exit non-zero when the issue is rejected
        #[arg(long)]
        strict: bool,
    },

    /// Compare citizen and government images for a resolved issue
    CrossCheck {
        /// Request JSON file, or '-' for stdin
        file: PathBuf,

        /// Exit non-zero when the resolution is rejected
        #[arg(long)]
        strict: bool,
    },

    /// Show the latest recorded verification for an issue
    Status {
        /// Issue ID
        issue_id: u64,
    },

    /// List what has happened to an issue, oldest first
    Timeline {
        /// Issue ID
        issue_id: u64,
    },

    /// Show statistics over recorded verifications
    Stats,

    /// List the categories the relevance check knows
    Categories,

    /// Show the active configuration
    Config,

    /// Serve the HTTP API
    #[cfg(feature = "server")]
    Serve {
        /// Port to listen on (defaults to service.port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
    },
}

/// Run the CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_source = Config::resolve_path(cli.config.as_deref());
    let config = Config::load(cli.config.as_deref())?;

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(config.service.log_level.as_str()),
        )
        .init();
    }

    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    match cli.command {
        Some(Command::Verify { file, strict }) => {
            commands::verify(&file, strict, config, output_mode)
        },
        Some(Command::CrossCheck { file, strict }) => {
            commands::cross_check(&file, strict, config, output_mode)
        },
        Some(Command::Status { issue_id }) => commands::status(issue_id, config, output_mode),
        Some(Command::Timeline { issue_id }) => commands::timeline(issue_id, config, output_mode),
        Some(Command::Stats) => commands::stats(config, output_mode),
        Some(Command::Categories) => commands::categories(output_mode),
        Some(Command::Config) => commands::show_config(config_source, config, output_mode),
        #[cfg(feature = "server")]
        Some(Command::Serve { port, host }) => commands::serve(&host, port, config),
        None => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": env!("CARGO_PKG_VERSION"),
                        "hint": "Use --help for usage"
                    })
                );
            } else {
                println!("civicverify v{}", env!("CARGO_PKG_VERSION"));
                println!("\nRun 'civicverify --help' for usage");
                println!("Run 'civicverify verify <request.json>' to verify an issue");
            }
            Ok(())
        },
    }
}
