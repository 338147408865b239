use std::path::PathBuf;

use anyhow::{Result, bail};

use crate::cli::ConfigCommands;
use crate::config::CliConfig;
use crate::output::{OutputFormat, json::print_json};

pub fn run(
    config: &CliConfig,
    path: Option<PathBuf>,
    command: ConfigCommands,
    format: OutputFormat,
) -> Result<()> {
    match command {
        ConfigCommands::Show => show(config, format),
        ConfigCommands::Path => show_path(path, format),
        ConfigCommands::Init { force } => init(path, force),
    }
}

fn show(config: &CliConfig, format: OutputFormat) -> Result<()> {
    let mut redacted = config.clone();
    if redacted.backend.token.is_some() {
        redacted.backend.token = Some("********".to_string());
    }
    if redacted.backend.cookie.is_some() {
        redacted.backend.cookie = Some("********".to_string());
    }
    if redacted.dify.api_key.is_some() {
        redacted.dify.api_key = Some("********".to_string());
    }

    if format.is_json() {
        return print_json(&redacted);
    }

    print!("{}", redacted.to_toml()?);
    Ok(())
}

fn show_path(path: Option<PathBuf>, format: OutputFormat) -> Result<()> {
    let Some(path) = path else {
        bail!("Could not determine the config directory");
    };

    if format.is_json() {
        return print_json(&serde_json::json!({
            "path": path,
            "exists": path.exists(),
        }));
    }

    println!("{}", path.display());
    Ok(())
}

fn init(path: Option<PathBuf>, force: bool) -> Result<()> {
    let Some(path) = path else {
        bail!("Could not determine the config directory");
    };
    if path.exists() && !force {
        bail!(
            "Config file already exists at {}; use --force to overwrite",
            path.display()
        );
    }

    CliConfig::default().save(&path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}
