use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::constants::{
    APP_NAME, CONFIG_FILE_NAME, DEFAULT_API_KEY_ENV, DEFAULT_COMPLETION_BASE_URL,
    DEFAULT_COMPLETION_MODEL, DEFAULT_EXAMPLE_PROMPT, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE,
    ENV_PREFIX, HTTP_REQUEST_TIMEOUT_SECS, LOCAL_CONFIG_DIR, MAX_TEMPERATURE,
};
use crate::utils::FoodScoutError;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Completion service configuration
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Entity extraction configuration
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// UI configuration
    #[serde(default)]
    pub ui: UIConfig,
}

/// Chat-completion endpoint and sampling settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Model name sent with every request
    pub model: String,
    /// Base URL of an OpenAI-compatible API
    pub base_url: String,
    /// Environment variable containing the API key
    pub api_key_env: String,
    /// Organization ID (optional)
    pub organization: Option<String>,
    /// Temperature for generation
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_tokens: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_COMPLETION_MODEL.to_string(),
            base_url: DEFAULT_COMPLETION_BASE_URL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            organization: None,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_secs: HTTP_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Entity extraction configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Place names added to the built-in gazetteer
    pub extra_locations: Vec<String>,
}

/// UI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UIConfig {
    /// Show the slot sidebar by default
    pub show_slots: bool,
    /// Prompt inserted by the `:examples` command
    pub example_prompt: String,
}

impl Default for UIConfig {
    fn default() -> Self {
        Self {
            show_slots: true,
            example_prompt: DEFAULT_EXAMPLE_PROMPT.to_string(),
        }
    }
}

/// Resolved API credentials. The key is never printed.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub organization: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("organization", &self.organization)
            .finish()
    }
}

impl Config {
    /// Validate settings and resolve credentials from the environment.
    ///
    /// Called once at startup; any failure here is fatal.
    pub fn validate(&self) -> Result<Credentials, FoodScoutError> {
        self.validate_with(|name| std::env::var(name).ok())
    }

    /// Same as [`Config::validate`] with an injectable variable lookup
    pub fn validate_with<F>(&self, lookup: F) -> Result<Credentials, FoodScoutError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let completion = &self.completion;

        if completion.base_url.trim().is_empty() {
            return Err(FoodScoutError::Configuration(
                "completion.base_url must not be empty".to_string(),
            ));
        }
        if completion.model.trim().is_empty() {
            return Err(FoodScoutError::Configuration(
                "completion.model must not be empty".to_string(),
            ));
        }
        if !(0.0..=MAX_TEMPERATURE).contains(&completion.temperature) {
            return Err(FoodScoutError::Configuration(format!(
                "completion.temperature must be between 0 and {}, got {}",
                MAX_TEMPERATURE, completion.temperature
            )));
        }
        if completion.max_tokens == 0 {
            return Err(FoodScoutError::Configuration(
                "completion.max_tokens must be greater than 0".to_string(),
            ));
        }

        let api_key = lookup(&completion.api_key_env)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                FoodScoutError::Configuration(format!(
                    "API key not found. Please set {} in your environment or .env file.",
                    completion.api_key_env
                ))
            })?;

        Ok(Credentials {
            api_key,
            organization: completion.organization.clone(),
        })
    }
}

/// Load configuration from multiple sources
///
/// Layers, lowest first: defaults, global file, local file, `FOOD_SCOUT_*`
/// environment, then `explicit` if one was passed on the command line.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    // A file named on the command line must exist; figment would skip it
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(FoodScoutError::Configuration(format!(
                "Config file not found: {}",
                path.display()
            ))
            .into());
        }
    }

    // .env is optional; keys are then read from the process environment
    let _ = dotenvy::dotenv();

    let global_config = get_config_dir()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .ok();
    let local_config = PathBuf::from(LOCAL_CONFIG_DIR).join(CONFIG_FILE_NAME);

    build_figment(global_config.as_deref(), &local_config, explicit)
        .extract()
        .context("Failed to load configuration")
}

fn build_figment(global: Option<&Path>, local: &Path, explicit: Option<&Path>) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    if let Some(global) = global {
        if global.exists() {
            figment = figment.merge(Toml::file(global));
        }
    }

    if local.exists() {
        figment = figment.merge(Toml::file(local));
    }

    // FOOD_SCOUT_COMPLETION__MODEL -> completion.model
    figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

    if let Some(explicit) = explicit {
        figment = figment.merge(Toml::file(explicit));
    }

    figment
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", APP_NAME) {
        Ok(proj_dirs.config_dir().to_path_buf())
    } else {
        // Fallback to home directory
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Could not determine home directory")?;
        Ok(PathBuf::from(home).join(".config").join(APP_NAME))
    }
}

/// Save configuration to file
pub fn save_config(config: &Config, path: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(p) => p,
        None => get_config_dir()?.join(CONFIG_FILE_NAME),
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let toml_string = toml::to_string_pretty(config)?;
    std::fs::write(&path, toml_string)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}

/// Create a default configuration file if it doesn't exist
pub fn init_config() -> Result<()> {
    let config_file = get_config_dir()?.join(CONFIG_FILE_NAME);

    if !config_file.exists() {
        save_config(&Config::default(), Some(config_file.clone()))?;
        println!("Created default configuration at: {}", config_file.display());
    } else {
        println!("Configuration already exists at: {}", config_file.display());
    }

    let local_example = PathBuf::from(LOCAL_CONFIG_DIR).join("config.toml.example");
    if !local_example.exists() {
        if let Some(parent) = local_example.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let example_config = r#"# Food Scout Project Configuration
# This file overrides global settings for this directory

[completion]
model = "gpt-4"
temperature = 0.7
max_tokens = 1000

[extraction]
extra_locations = ["Williamsburg", "South Congress"]
"#;
        std::fs::write(&local_example, example_config)?;
        println!("Created example configuration at: {}", local_example.display());
    }

    Ok(())
}
