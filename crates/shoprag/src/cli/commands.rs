//! CLI argument definitions.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Settings file picked up when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "shoprag.toml";

/// OnlineShopRAG support chat backend.
#[derive(Parser, Debug)]
#[command(name = "shoprag")]
#[command(about = "Retrieval-augmented customer-support chat backend")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the chat API
    Serve {
        /// Settings file (TOML)
        #[arg(short, long, env = "SHOPRAG_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Work with scenario files
    #[command(subcommand)]
    Scenario(ScenarioCommand),
}

#[derive(Subcommand, Debug)]
pub enum ScenarioCommand {
    /// Load a scenario and report problems
    Validate {
        /// Scenario file (JSON)
        file: PathBuf,

        /// Fail when any issue is found
        #[arg(long)]
        strict: bool,
    },

    /// Run a scenario once against the configured model
    Run {
        /// Scenario file (JSON)
        file: PathBuf,

        /// User message the scenario reacts to
        #[arg(short, long)]
        message: String,

        /// Settings file (TOML)
        #[arg(short, long, env = "SHOPRAG_CONFIG")]
        config: Option<PathBuf>,
    },
}

/// The explicit settings file, else `shoprag.toml` if it exists.
pub fn resolve_config_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit.or_else(|| {
        let default = Path::new(DEFAULT_CONFIG_FILE);
        default.exists().then(|| default.to_path_buf())
    })
}
