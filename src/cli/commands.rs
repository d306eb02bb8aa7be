use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::json;
use std::path::Path;

use crate::{
    app::{get_config_dir, init_config, Config},
    constants::{CONFIG_FILE_NAME, LOCAL_CONFIG_DIR},
    dialogue::{SlotName, SlotSet},
    extraction::{EntityExtractor, IntentClassifier},
    models::ClientFactory,
    tutor::{evaluate, format_number, run_repl},
    utils::FoodScoutError,
};

use super::Commands;

/// Handle CLI subcommands. Returns `false` when the caller should go on to
/// start a chat session.
pub async fn handle_command(command: &Commands, config: &Config) -> Result<bool> {
    match command {
        Commands::Init => {
            println!("Initializing Food Scout configuration...");
            init_config()?;
            println!("Configuration initialized successfully!");
            Ok(true)
        }
        Commands::Chat => Ok(false),
        Commands::Tutor => {
            println!("Math tutor ready. Type 'exit' or 'quit' to leave.");
            let stdin = std::io::stdin();
            run_repl(stdin.lock(), std::io::stdout()).context("Tutor session failed")?;
            Ok(true)
        }
        Commands::Calc { expression } => {
            let value = evaluate(expression).map_err(FoodScoutError::from)?;
            println!("{}", format_number(value));
            Ok(true)
        }
        Commands::Extract { text } => {
            show_extraction(text, config)?;
            Ok(true)
        }
        Commands::Models => {
            list_models(config).await?;
            Ok(true)
        }
        Commands::Version => {
            show_version();
            Ok(true)
        }
        Commands::Status => {
            show_status(config).await?;
            Ok(true)
        }
    }
}

/// List models offered by the configured endpoint
pub async fn list_models(config: &Config) -> Result<()> {
    let credentials = config.validate()?;
    println!("Available models at {}:", config.completion.base_url);
    let models = ClientFactory::list_available(config, &credentials).await?;
    for model in models {
        if model == config.completion.model {
            println!("  • {} {}", model.green(), "(configured)".dimmed());
        } else {
            println!("  • {}", model.green());
        }
    }
    Ok(())
}

/// Show version information
pub fn show_version() {
    println!("Food Scout v{}", env!("CARGO_PKG_VERSION"));
    println!("   A conversational restaurant finder for the terminal");
}

/// Run extraction and intent detection on one utterance, no completion
fn show_extraction(text: &str, config: &Config) -> Result<()> {
    let extractor = EntityExtractor::from_config(&config.extraction);
    let candidates = extractor.extract(text);
    let intent = IntentClassifier::new().predict(text);

    let mut slots = SlotSet::new();
    slots.apply(&candidates);
    let missing: Vec<&str> = slots.missing().into_iter().map(SlotName::as_str).collect();

    let report = json!({
        "text": text,
        "intent": intent,
        "candidates": candidates,
        "missing": missing,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Show configuration and endpoint status
async fn show_status(config: &Config) -> Result<()> {
    println!("Food Scout Status:");
    println!();

    // Configuration files
    match get_config_dir() {
        Ok(dir) => report_file("Global config", &dir.join(CONFIG_FILE_NAME)),
        Err(e) => println!("  [WARNING] Global config: {}", e),
    }
    report_file(
        "Local config",
        &Path::new(LOCAL_CONFIG_DIR).join(CONFIG_FILE_NAME),
    );

    println!(
        "  [OK] Model: {} (temperature {}, max tokens {})",
        config.completion.model.green(),
        config.completion.temperature,
        config.completion.max_tokens
    );

    // Credentials and endpoint
    match config.validate() {
        Ok(credentials) => {
            println!("  [OK] {}: Set", config.completion.api_key_env);
            match ClientFactory::validate(config, &credentials).await {
                Ok(true) => println!(
                    "  [OK] Endpoint: Reachable at {}",
                    config.completion.base_url
                ),
                Ok(false) => println!(
                    "  [ERROR] Endpoint: Not reachable at {}",
                    config.completion.base_url
                ),
                Err(e) => println!("  [ERROR] Endpoint: {}", e),
            }
        }
        Err(e) => println!("  [ERROR] {}", e),
    }

    println!();
    Ok(())
}

fn report_file(label: &str, path: &Path) {
    if path.exists() {
        println!("  [OK] {}: {}", label, path.display());
    } else {
        println!("  [WARNING] {}: Not found (using defaults)", label);
    }
}
