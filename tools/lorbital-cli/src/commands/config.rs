//! Print the effective configuration.

use std::path::PathBuf;

use lorbital_common::config::{config_file_path, AppConfig};

pub fn run(app_config: &AppConfig, tuning: Option<PathBuf>) -> anyhow::Result<()> {
    let path = config_file_path();
    let origin = if path.exists() { "" } else { " (not found, using defaults)" };
    println!("Config file: {}{origin}", path.display());
    println!("{}", serde_json::to_string_pretty(app_config)?);
    println!();

    let tuning = super::resolve_tuning(app_config, tuning.as_deref())?;
    println!("Pipeline tuning:");
    println!("{}", serde_json::to_string_pretty(&tuning)?);

    Ok(())
}
