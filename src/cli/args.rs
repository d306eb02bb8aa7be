use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "food-scout")]
#[command(version = "0.1.0")]
#[command(about = "A conversational restaurant finder for the terminal", long_about = None)]
pub struct Cli {
    /// Completion model to use (overrides config, e.g. gpt-4o)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Line-oriented chat instead of the full-screen UI
    #[arg(long)]
    pub plain: bool,

    /// Non-interactive prompt to execute as a single turn
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// Output format for non-interactive mode
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, requires = "prompt")]
    pub output_format: OutputFormat,

    /// Maximum tokens to generate per reply (overrides config)
    #[arg(long)]
    pub max_tokens: Option<usize>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize configuration
    Init,
    /// Start a chat session (default)
    Chat,
    /// Practice arithmetic with the math tutor
    Tutor,
    /// Evaluate one arithmetic expression
    Calc {
        /// Expression such as "(2 + 3) * 4"
        expression: String,
    },
    /// Show what would be extracted from an utterance
    Extract {
        /// Utterance to analyze
        text: String,
    },
    /// List models offered by the completion endpoint
    Models,
    /// Show version information
    Version,
    /// Check configuration and endpoint status
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Text,
    /// JSON structured output
    Json,
    /// Markdown formatted output
    Markdown,
}
