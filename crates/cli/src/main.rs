//! docqa CLI
//!
//! Main entry point for the docqa command-line tool. Provides retrieve-
//! then-read question answering over a hosted search index.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, ChatCommand};
use docqa_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// docqa - retrieve-then-read question answering over a search index
#[derive(Parser, Debug)]
#[command(name = "docqa")]
#[command(about = "Retrieve-then-read question answering over a search index", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "DOCQA_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Answer a single question with retrieved sources
    Ask(AskCommand),

    /// Interactive multi-turn chat over the index
    Chat(ChatCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for config and logging)
    let cli = Cli::parse();

    // Load base configuration, then apply CLI overrides
    let config = AppConfig::load_from(cli.config.as_deref())?;
    let config = config.with_overrides(cli.log_level, cli.verbose, cli.no_color);

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("docqa starting");
    tracing::debug!("Search index: {}", config.search.index);
    tracing::debug!("Completion provider: {}", config.completions.provider);

    // Both commands talk to the collaborators, so check the endpoints early
    config.validate()?;

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Chat(_) => "chat",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Chat(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
