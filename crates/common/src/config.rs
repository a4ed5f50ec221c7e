//! Application configuration.
//!
//! Only user-facing preferences live here. Tuning constants for the gesture
//! and render pipeline are plain structs owned by the crates that use them
//! and are handed in at construction.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Viewer preferences applied when a session is created.
    #[serde(default)]
    pub viewer: ViewerDefaults,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Viewer preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerDefaults {
    /// Spin the model slowly while nobody is interacting with it.
    pub auto_rotate: bool,

    /// Auto-rotation step in radians per rendered frame.
    pub auto_rotate_speed: f64,

    /// Flip the vertical drag direction for every input modality.
    pub invert_rotation_y: bool,

    /// Whether the camera (and gesture tracking) should run.
    pub camera_enabled: bool,

    /// Canvas width in CSS pixels, used to scale normalized hand motion.
    pub viewport_width: f64,

    /// Canvas height in CSS pixels.
    pub viewport_height: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "lorbital_gesture_engine=trace,info").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Colorize human-readable output.
    pub ansi: bool,
}

impl Default for ViewerDefaults {
    fn default() -> Self {
        Self {
            auto_rotate: true,
            auto_rotate_speed: 0.0105,
            invert_rotation_y: false,
            camera_enabled: true,
            viewport_width: 1280.0,
            viewport_height: 720.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            ansi: true,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(path: &std::path::Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to parse config at {:?}: {}", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        self.save_to(&config_file_path())
    }

    /// Save config to an explicit path, creating parent directories.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("lorbital").join("config.json")
}
