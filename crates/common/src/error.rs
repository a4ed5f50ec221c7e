//! Error types shared across Lorbital crates.
//!
//! The gesture and render control path never fails: numeric anomalies are
//! clamped where they occur. Errors exist for the edges of the system:
//! landmark sources, recordings on disk, and configuration.

use std::path::PathBuf;

/// Top-level error type for Lorbital operations.
#[derive(Debug, thiserror::Error)]
pub enum LorbitalError {
    #[error("Hand tracker initialization failed: {message}")]
    TrackerInit { message: String },

    #[error("Hand tracking error: {message}")]
    Tracker { message: String },

    #[error("Recording error: {message}")]
    Recording { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using LorbitalError.
pub type LorbitalResult<T> = Result<T, LorbitalError>;

impl LorbitalError {
    pub fn tracker_init(msg: impl Into<String>) -> Self {
        Self::TrackerInit {
            message: msg.into(),
        }
    }

    pub fn tracker(msg: impl Into<String>) -> Self {
        Self::Tracker {
            message: msg.into(),
        }
    }

    pub fn recording(msg: impl Into<String>) -> Self {
        Self::Recording {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}
