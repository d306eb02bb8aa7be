use anyhow::{Context, Result};
use colored::Colorize;
use std::io::IsTerminal;
use std::sync::Arc;
use tracing::error;

use super::plain::run_plain;
use crate::{
    app::{load_config, Config},
    cli::{handle_command, Cli},
    models::ClientFactory,
    session::{Assistant, Session},
    tui::{run_ui, App},
    utils::log_progress,
};

/// Load configuration and apply command-line overrides
pub fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(model) = &cli.model {
        config.completion.model = model.clone();
    }
    if let Some(max_tokens) = cli.max_tokens {
        config.completion.max_tokens = max_tokens;
    }
    Ok(config)
}

/// Validate configuration and wire up the assistant.
///
/// A configuration failure is fatal: it is logged and the process exits
/// non-zero before any session exists.
pub fn build_assistant(config: &Config) -> Result<Assistant> {
    let credentials = match config.validate() {
        Ok(credentials) => credentials,
        Err(e) => {
            error!("{}", e);
            eprintln!("{} {}", "Error:".red(), e);
            std::process::exit(1);
        }
    };

    let client = ClientFactory::create(config, &credentials)?;
    Ok(Assistant::from_config(client, config))
}

/// Main runtime orchestrator
pub struct Orchestrator {
    cli: Cli,
    config: Config,
}

impl Orchestrator {
    /// Create a new orchestrator from CLI args
    pub fn new(cli: Cli) -> Result<Self> {
        let config = resolve_config(&cli).context("Failed to load configuration")?;
        Ok(Self { cli, config })
    }

    /// Run the orchestrator
    pub async fn run(self) -> Result<()> {
        // Handle subcommands
        if let Some(command) = &self.cli.command {
            if handle_command(command, &self.config).await? {
                return Ok(());
            }
            // Continue to chat for Commands::Chat
        }

        let plain = self.cli.plain || !std::io::stdout().is_terminal();
        let total = 2;

        log_progress(1, total, "Validating configuration");
        let assistant = Arc::new(build_assistant(&self.config)?);

        log_progress(
            2,
            total,
            format!("Starting session with model: {}", assistant.model_name().green()),
        );
        let session = Session::new().shared();

        if plain {
            run_plain(assistant, session).await
        } else {
            let app = App::new(assistant, session, &self.config.ui);
            run_ui(app).await
        }
    }
}
