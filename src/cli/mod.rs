use clap::{Parser, Subcommand};

pub mod error;
pub mod handler;
pub mod output;
pub mod replay;

/// Download relay - batch dedup, completion correlation and admission filtering
#[derive(Parser, Debug)]
#[command(name = "fanrelay")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Override config directory path
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<std::path::PathBuf>,

    /// Enable verbose logging (TRACE level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check whether a file would pass the filter
    Check {
        /// Post id
        #[arg(long)]
        id: Option<String>,

        /// Post date (RFC 3339 or YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Fee of the post (0 = free)
        #[arg(long, allow_negative_numbers = true)]
        fee: Option<i64>,

        /// File extension without the dot
        #[arg(long)]
        ext: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replay recorded requests and notifications through the relay
    Replay {
        /// JSON lines file, or "-" for stdin
        input: String,

        /// Drop requests whose criteria do not pass the filter
        #[arg(long)]
        filter: bool,
    },

    /// Manage configuration
    Config {
        /// Configuration action
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Get a configuration value (e.g. filter.id_range.threshold)
    Get {
        key: String,
    },

    /// Set a configuration value
    Set {
        key: String,
        value: String,
    },

    /// Show the full configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the settings file path
    Path,

    /// Write the default configuration
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Validate filter thresholds
    Validate,
}
