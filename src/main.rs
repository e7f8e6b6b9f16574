//! pylayer CLI entry point

use clap::Parser;
use console::style;
use pylayer::cli::{Cli, Commands};
use pylayer::config::{Config, ConfigManager};
use pylayer::error::PylayerResult;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> PylayerResult<()> {
    let cli = Cli::parse();

    // Completions must not print anything else to stdout
    if let Commands::Completions { shell } = cli.command {
        return pylayer::cli::commands::completions(shell);
    }

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = config_manager.load().await?;

    init_logging(cli.verbose, &config);
    pylayer::ui::init_theme();
    debug!("Config: {}", config_manager.path().display());

    match cli.command {
        Commands::Completions { .. } => unreachable!("completions handled above"),
        Commands::Build(args) => pylayer::cli::commands::build(args, &config).await,
        Commands::Plan(args) => pylayer::cli::commands::plan(args, &config).await,
        Commands::Cache(args) => pylayer::cli::commands::cache(args, &config).await,
        Commands::Config(args) => {
            pylayer::cli::commands::config(args, &config, &config_manager).await
        }
    }
}

/// 0 = warn, 1 = info, 2+ = debug
fn init_logging(verbose: u8, config: &Config) {
    let filter = match verbose {
        0 => EnvFilter::new("pylayer=warn"),
        1 => EnvFilter::new("pylayer=info"),
        _ => EnvFilter::new("pylayer=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}
