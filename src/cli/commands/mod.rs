//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod episodes;
mod scrape;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::load_settings;

#[derive(Parser)]
#[command(name = "podharvest")]
#[command(about = "Incremental podcast episode harvester")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server streaming scrape progress
    Serve {
        /// Address to bind to: PORT, HOST, or HOST:PORT (default: from config, else 127.0.0.1:3030)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Run one scrape session in the foreground
    Scrape,

    /// List episodes from the last snapshot
    Episodes {
        /// Limit number of episodes shown (0 = all)
        #[arg(short, long, default_value = "0")]
        limit: usize,
    },
}

/// Parse arguments and run the selected command.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref()).await?;

    match cli.command {
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| settings.bind.clone());
            serve::cmd_serve(settings, &bind).await
        }
        Commands::Scrape => scrape::cmd_scrape(&settings).await,
        Commands::Episodes { limit } => episodes::cmd_episodes(&settings, limit).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_with_bind() {
        let cli = Cli::try_parse_from(["podharvest", "-v", "serve", "--bind", "0.0.0.0:8080"])
            .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Serve { bind } => assert_eq!(bind.as_deref(), Some("0.0.0.0:8080")),
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_global_config_after_subcommand() {
        let cli =
            Cli::try_parse_from(["podharvest", "episodes", "--limit", "5", "--config", "x.toml"])
                .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
        assert!(matches!(cli.command, Commands::Episodes { limit: 5 }));
    }
}
