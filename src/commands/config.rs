//! Configuration command

use anyhow::{bail, Context, Result};
use std::path::Path;

use crate::core::config::AppConfig;

/// Print where configuration is read from and the effective values
pub fn show_config(config: &AppConfig, explicit_path: Option<&Path>) -> Result<()> {
    let path = match explicit_path {
        Some(p) => p.to_path_buf(),
        None => AppConfig::get_config_path()?,
    };
    let status = if path.exists() { "" } else { " (not present)" };

    println!("Config file: {}{}", path.display(), status);
    println!(
        "Environment overrides: {}_<SECTION>__<KEY>, SPOTIFY_CLIENT_ID, SPOTIFY_CLIENT_SECRET",
        crate::core::config::ENV_PREFIX
    );
    println!(
        "{}",
        serde_json::to_string_pretty(&config.masked()).context("Failed to serialize config")?
    );
    Ok(())
}

/// Create a config file with default values for editing
pub fn init_config(explicit_path: Option<&Path>) -> Result<()> {
    let path = match explicit_path {
        Some(p) => p.to_path_buf(),
        None => AppConfig::get_config_path()?,
    };
    if path.exists() {
        bail!("{} already exists", path.display());
    }
    AppConfig::default().save(&path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}
