//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Freelance Insight - ask questions about freelancer earnings data
///
/// Classifies a question, computes the matching statistics over the
/// earnings dataset and has an LLM explain the numbers.
///
/// Examples:
///   freelance-insight analyze -q "Какой регион приносит наибольший доход?"
///   freelance-insight analyze -i
///   freelance-insight info
///   freelance-insight validate
///   freelance-insight demo
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file
    ///
    /// If not specified, looks for .freelance-insight.toml in the current directory
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Path to the earnings CSV file
    #[arg(long, global = true, value_name = "FILE", env = "FREELANCE_DATA")]
    pub data: Option<PathBuf>,

    /// Model used for classification and answers
    #[arg(short, long, global = true, env = "OPENAI_MODEL")]
    pub model: Option<String>,

    /// API key for the OpenAI-compatible endpoint
    #[arg(long, global = true, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, global = true, value_name = "URL", env = "OPENAI_BASE_URL")]
    pub api_base: Option<String>,

    /// Temperature for LLM responses (0.0 - 2.0)
    #[arg(long, global = true, env = "OPENAI_TEMPERATURE")]
    pub temperature: Option<f32>,

    /// Maximum tokens per model response
    #[arg(long, global = true, value_name = "TOKENS", env = "OPENAI_MAX_TOKENS")]
    pub max_tokens: Option<u32>,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Answer a single question or start an interactive session
    Analyze {
        /// Question to answer
        #[arg(short, long)]
        question: Option<String>,

        /// Interactive mode (also used when no question is given)
        #[arg(short, long)]
        interactive: bool,
    },
    /// Show the structure of the dataset: records, columns, types, missing values
    Info,
    /// Check the model configuration and that the dataset loads
    Validate,
    /// Run a few typical questions one after another
    Demo {
        /// Do not wait for Enter between questions
        #[arg(long)]
        no_pause: bool,
    },
    /// Generate a default .freelance-insight.toml configuration file
    InitConfig,
}

impl Command {
    /// Whether the command talks to the language model.
    pub fn needs_model(&self) -> bool {
        matches!(
            self,
            Command::Analyze { .. } | Command::Validate | Command::Demo { .. }
        )
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(temperature) = self.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err("Temperature must be between 0.0 and 2.0".to_string());
            }
        }

        if let Some(ref api_base) = self.api_base {
            if !api_base.starts_with("http://") && !api_base.starts_with("https://") {
                return Err("API base URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if self.max_tokens == Some(0) {
            return Err("Max tokens must be at least 1".to_string());
        }

        if self.timeout == Some(0) {
            return Err("Timeout must be at least 1 second".to_string());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Command::Analyze {
            question: Some(ref question),
            ..
        } = self.command
        {
            if question.trim().is_empty() {
                return Err("Question must not be empty".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `config_verbose` is the `general.verbose` setting of the config file;
    /// `--quiet` still wins over it.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
