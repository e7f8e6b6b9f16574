//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// pylayer - Python container images with stable dependency layers
///
/// Builds one install layer per dependency and remembers the install order
/// per Python version, so rebuilds reuse as many cached layers as possible.
#[derive(Parser, Debug)]
#[command(name = "pylayer")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "PYLAYER_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build an image from a requirements file
    Build(BuildArgs),

    /// Show the install order a build would use, without building
    Plan(PlanArgs),

    /// Manage recorded install orders
    Cache(CacheArgs),

    /// Show or edit configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

/// Arguments for the build command
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Requirements file (first line: python_version==<version>)
    pub file: PathBuf,

    /// Image reference to produce (default: <file stem>:py<version>)
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Print the plan and Dockerfile without building or recording
    #[arg(long)]
    pub dry_run: bool,

    /// Record the new order only if the build succeeds
    #[arg(long)]
    pub commit_on_success: bool,

    /// Ignore the recorded order for this Python version
    #[arg(long)]
    pub no_cache_order: bool,

    /// Keep the generated build context directory
    #[arg(long)]
    pub keep_build_dir: bool,
}

/// Arguments for the plan command
#[derive(Parser, Debug)]
pub struct PlanArgs {
    /// Requirements file
    pub file: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write the default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., builder.engine)
        key: String,
        /// Value to set
        value: String,
    },
}

/// Output format for listing commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}

/// Arguments for the cache command
#[derive(Parser, Debug)]
pub struct CacheArgs {
    /// Subcommand for cache
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// List recorded orders
    List {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Print the recorded order for a Python version
    Show {
        /// Python version (e.g., 3.12)
        #[arg(value_name = "VERSION")]
        python: String,
    },

    /// Remove recorded orders
    Clear {
        /// Only this Python version (default: all)
        #[arg(value_name = "VERSION")]
        python: Option<String>,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}
