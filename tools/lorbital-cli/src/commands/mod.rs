pub mod config;
pub mod replay;
pub mod synth;

use std::path::Path;

use anyhow::Context;

use lorbital_common::config::AppConfig;
use lorbital_viewer::ViewerTuning;

/// Tuning from `path` if given, otherwise defaults with the user's preferences.
pub fn resolve_tuning(app_config: &AppConfig, path: Option<&Path>) -> anyhow::Result<ViewerTuning> {
    match path {
        Some(path) => ViewerTuning::load(path)
            .with_context(|| format!("Failed to load tuning from {}", path.display())),
        None => Ok(ViewerTuning::from_defaults(&app_config.viewer)),
    }
}
