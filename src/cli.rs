//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// SalesQ - question-driven analytics over sales flow data
///
/// Ask free-text questions about purchases, redemptions, and assets and
/// get back a total, a breakdown, or a monthly trend.
///
/// Examples:
///   salesq "purchases by wholesaler last quarter"
///   salesq "redemptions for rvp alice by fund type" --format json
///   salesq --data exports/sales.csv --summary
///   salesq                      # interactive mode
///   salesq --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Question to answer
    ///
    /// When omitted (and --summary/--init-config are not set), salesq
    /// starts an interactive loop reading questions from stdin.
    #[arg(value_name = "QUESTION")]
    pub question: Option<String>,

    /// Path to the sales snapshot CSV
    ///
    /// Overrides the path from .salesq.toml.
    #[arg(short, long, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Region owner to scope answers to (caller context)
    ///
    /// Applied when the question itself does not mention an RVP.
    #[arg(long, value_name = "NAME", env = "SALESQ_RVP")]
    pub rvp: Option<String>,

    /// Output format (pretty, json)
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .salesq.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Reload the snapshot on every question instead of caching it
    #[arg(long)]
    pub no_cache: bool,

    /// Print a dataset overview instead of answering a question
    #[arg(long)]
    pub summary: bool,

    /// Generate a default .salesq.toml configuration file
    #[arg(long)]
    pub init_config: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,
}

/// Output format for answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable terminal rendering (default)
    #[default]
    Pretty,
    /// The JSON response contract
    Json,
}

impl OutputFormat {
    /// Config-file spelling of this format.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Pretty => "pretty",
            OutputFormat::Json => "json",
        }
    }

    /// Parse a config-file spelling.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pretty" => Some(OutputFormat::Pretty),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.summary && self.question.is_some() {
            return Err("--summary does not take a question".to_string());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        // Validate data path if provided
        if let Some(ref data_path) = self.data {
            if !data_path.exists() {
                return Err(format!("Data file does not exist: {}", data_path.display()));
            }
            if !data_path.is_file() {
                return Err(format!("Data path is not a file: {}", data_path.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
