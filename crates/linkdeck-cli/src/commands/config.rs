//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use linkdeck_core::Config;

use crate::output::{Output, OutputFormat};

/// Print the effective configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "fetch_favicons": config.fetch_favicons,
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => println!("{}", config.data_dir.display()),
        OutputFormat::Human => {
            let log_file = match &config.log_file {
                Some(path) => path.display().to_string(),
                None => "(not set)".to_string(),
            };
            println!("Configuration:");
            println!("  data_dir:       {}", config.data_dir.display());
            println!("  fetch_favicons: {}", config.fetch_favicons);
            println!("  log_file:       {}", log_file);
            println!();
            println!(
                "Config file: {}",
                effective_config_path(config_path).display()
            );
        }
    }

    Ok(())
}

/// Change one configuration key and write the file back
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    apply(&mut config, &key, &value)?;

    config
        .save_to_path(&effective_config_path(config_path))
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

/// The CLI-specified config file, or the default location
fn effective_config_path(config_path: Option<&PathBuf>) -> PathBuf {
    config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path)
}

fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "data_dir" => config.data_dir = value.into(),
        "fetch_favicons" => {
            config.fetch_favicons = value
                .parse()
                .context("Invalid value for fetch_favicons. Use 'true' or 'false'.")?;
        }
        // "none" or an empty value clears the key
        "log_file" => {
            config.log_file = match value {
                "" | "none" => None,
                other => Some(other.into()),
            };
        }
        _ => bail!(
            "Unknown configuration key: '{}'\n\
             Valid keys: data_dir, fetch_favicons, log_file",
            key
        ),
    }

    Ok(())
}
