//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use perspective_client::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS};

/// Manage a cost-allocation perspective declared in a TOML file
#[derive(Parser, Debug)]
#[command(name = "perspective")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Declared perspective
    #[arg(short, long, global = true, default_value = "perspective.toml")]
    pub config: PathBuf,

    /// Previous-state file
    #[arg(long, global = true, default_value = ".perspective/state.toml")]
    pub state: PathBuf,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Remote API connection settings
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ConnectionArgs {
    /// API key
    #[arg(long, global = true, env = "CLOUDHEALTH_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// API base URL
    #[arg(long, global = true, env = "CLOUDHEALTH_API_URL", default_value = DEFAULT_ENDPOINT)]
    pub url: String,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "CLOUDHEALTH_API_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Show the wire schema that apply would send (offline)
    Plan {
        /// Output the wire schema as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create or update the remote perspective and record it in the state
    Apply,

    /// Show the remote perspective recorded in the state
    Show {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Compare the declared perspective with the remote one
    Diff {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Adopt an existing remote perspective into the state
    Import {
        /// Remote perspective id
        id: String,
    },

    /// Delete the remote perspective and clear the state
    Destroy {
        /// Archive instead of deleting permanently
        #[arg(long)]
        archive: bool,
    },

    /// List remote perspectives
    List {
        /// Include archived perspectives
        #[arg(long)]
        all: bool,
    },
}
