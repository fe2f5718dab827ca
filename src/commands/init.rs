//! Init command implementation.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::config::Config;

/// Run the init command
pub fn run(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "Config file {:?} already exists. Use --force to overwrite it.",
            config_path
        );
    }

    if let Some(parent) = config_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }
    }

    fs::write(config_path, Config::generate_default_yaml())
        .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

    info!("Wrote default configuration to {:?}", config_path);
    Ok(())
}
