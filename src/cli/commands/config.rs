//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{CommitPolicy, Config, ConfigManager, Engine};
use crate::error::{PylayerError, PylayerResult};
use crate::ui::{self, UiContext};
use std::path::PathBuf;

/// Keys accepted by `config set`
const VALID_KEYS: &[&str] = &[
    "general.log_format",
    "builder.engine",
    "builder.base_image",
    "builder.installer",
    "builder.workdir",
    "cache.dir",
    "cache.commit",
];

/// Execute the config command
pub async fn execute(
    args: ConfigArgs,
    config: &Config,
    manager: &ConfigManager,
) -> PylayerResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => println!("{}", manager.path().display()),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
        Some(ConfigAction::Set { key, value }) => {
            let mut updated = config.clone();
            set_value(&mut updated, &key, &value)?;
            manager.save(&updated).await?;
            ui::step_ok(&UiContext::detect(), &format!("Set {} = {}", key, value));
        }
    }

    Ok(())
}

fn show_config(config: &Config) -> PylayerResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

async fn init_config(manager: &ConfigManager, force: bool) -> PylayerResult<()> {
    let ctx = UiContext::detect();
    let path = manager.path();

    if path.exists() && !force {
        ui::step_warn_hint(
            &ctx,
            &format!("Config already exists at {}", path.display()),
            "Use --force to overwrite",
        );
        return Ok(());
    }

    manager.save(&Config::default()).await?;
    ui::step_ok_detail(&ctx, "Configuration initialized", &path.display().to_string());
    Ok(())
}

/// Apply a dot-separated key to the config
fn set_value(config: &mut Config, key: &str, value: &str) -> PylayerResult<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["general", "log_format"] => {
            if !matches!(value, "text" | "json") {
                return Err(invalid(key, value, "text, json"));
            }
            config.general.log_format = value.to_string();
        }
        ["builder", "engine"] => {
            config.builder.engine = match value {
                "podman" => Engine::Podman,
                "docker" => Engine::Docker,
                _ => return Err(invalid(key, value, "podman, docker")),
            };
        }
        ["builder", "base_image"] => config.builder.base_image = value.to_string(),
        ["builder", "installer"] => config.builder.installer = value.to_string(),
        ["builder", "workdir"] => config.builder.workdir = value.to_string(),
        ["cache", "dir"] => {
            config.cache.dir = if value.is_empty() {
                None
            } else {
                Some(PathBuf::from(value))
            };
        }
        ["cache", "commit"] => {
            config.cache.commit = match value {
                "always" => CommitPolicy::Always,
                "on-success" => CommitPolicy::OnSuccess,
                _ => return Err(invalid(key, value, "always, on-success")),
            };
        }
        _ => {
            return Err(PylayerError::User(format!(
                "Unknown config key: {}. Valid keys: {}",
                key,
                VALID_KEYS.join(", ")
            )))
        }
    }

    Ok(())
}

fn invalid(key: &str, value: &str, expected: &str) -> PylayerError {
    PylayerError::User(format!(
        "Invalid value for {}: {}. Expected one of: {}",
        key, value, expected
    ))
}
