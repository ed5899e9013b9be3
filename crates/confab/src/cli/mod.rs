//! confab cli definition and entrypoint.
pub mod chat;
pub mod ux;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use confab_core::config::get_config;
use tracing::{debug, warn};

use crate::log::setup_logging;

/// confab - chat with a hosted large language model.
///
/// Type `help` at the prompt for the chat commands.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Show verbose logs.
    #[arg(short, long)]
    verbose: bool,

    /// Path to the config file.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Runs the main CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        setup_logging().context("Failed to set up logging")?;
    }

    // Load .env before the config so `env:` secrets can see it
    match dotenvy::dotenv() {
        Ok(path) => debug!(path = %path.display(), "Loaded environment file"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!(error = %e, "Failed to read .env file"),
    }

    let config = get_config(cli.config).context("Failed to load configuration")?;
    chat::execute(&config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from(["confab", "-v", "--config", "/tmp/confab.yml"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/confab.yml")));

        let cli = Cli::try_parse_from(["confab"]).unwrap();
        assert!(!cli.verbose);
        assert!(cli.config.is_none());

        // No positional arguments.
        assert!(Cli::try_parse_from(["confab", "hello"]).is_err());
    }
}
