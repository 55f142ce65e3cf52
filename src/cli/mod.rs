//! CLI Module for the M/M/s queue calculator
//!
//! Provides a command-line interface with subcommands for:
//! - Interactive prompting (the default)
//! - One-shot calculations from flags
//! - Serving the calculator over HTTP
//! - Managing configuration

mod commands;
mod prompt;

pub use commands::*;
pub use prompt::*;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::report::OutputFormat;
use crate::types::ValueKind;
use crate::VERSION;

/// mms-queue: steady-state metrics for M/M/s queues
#[derive(Parser, Debug)]
#[command(name = "mms-queue")]
#[command(author = "Queueing Tools Team")]
#[command(version = VERSION)]
#[command(about = "Closed-form M/M/s queue metrics calculator")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Global configuration file path (YAML, TOML, or JSON)
    #[arg(short, long, global = true, env = "MMS_QUEUE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Global log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "MMS_QUEUE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Enable JSON log output
    #[arg(long, global = true, env = "MMS_QUEUE_JSON_LOGS")]
    pub json_logs: bool,

    /// Quiet mode - suppress banner and non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Prompt for the inputs on the console (default)
    #[command(alias = "i")]
    Interactive(InteractiveCommand),

    /// Compute metrics from command-line flags
    Calc(CalcCommand),

    /// Serve the calculator over HTTP
    #[command(alias = "s")]
    Serve(ServeCommand),

    /// Configuration management
    #[command(alias = "cfg")]
    Config(ConfigCommand),

    /// Show version and build information
    Version,
}

/// Prompt for the inputs on the console
#[derive(Parser, Debug, Default)]
pub struct InteractiveCommand {
    /// Output format (text, json)
    #[arg(short, long)]
    pub format: Option<OutputFormat>,
}

/// Compute metrics from command-line flags
#[derive(Parser, Debug)]
pub struct CalcCommand {
    /// Whether --arrival is a rate or a mean (r, m)
    #[arg(long, default_value = "r")]
    pub arrival_kind: ValueKind,

    /// Arrival rate or mean inter-arrival time
    #[arg(short, long)]
    pub arrival: f64,

    /// Whether --service is a rate or a mean (r, m)
    #[arg(long, default_value = "r")]
    pub service_kind: ValueKind,

    /// Service rate or mean service time
    #[arg(short = 'm', long)]
    pub service: f64,

    /// Time unit of the values (hour, min, sec)
    #[arg(short, long, default_value = "sec")]
    pub unit: String,

    /// Number of parallel servers
    #[arg(short, long, default_value = "1")]
    pub servers: u32,

    /// Output format (text, json)
    #[arg(short, long)]
    pub format: Option<OutputFormat>,
}

/// Serve the calculator over HTTP
#[derive(Parser, Debug)]
pub struct ServeCommand {
    /// Port to listen on
    #[arg(short, long, env = "MMS_QUEUE_PORT")]
    pub port: Option<u16>,

    /// Host to bind to
    #[arg(long, env = "MMS_QUEUE_HOST")]
    pub host: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "MMS_QUEUE_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Disable CORS
    #[arg(long)]
    pub no_cors: bool,
}

/// Configuration management
#[derive(Parser, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output format (yaml, toml, json)
        #[arg(short, long, default_value = "yaml")]
        format: String,
    },

    /// Validate configuration file
    Validate {
        /// Configuration file to validate
        file: PathBuf,
    },

    /// Initialize a new configuration file
    Init {
        /// Output file path
        #[arg(short, long, default_value = "mms-queue.yaml")]
        output: PathBuf,

        /// Force overwrite existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show environment variable mappings
    Env,
}
