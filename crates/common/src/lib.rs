//! Lorbital Common Utilities
//!
//! Shared infrastructure for all Lorbital crates:
//! - Error types and result aliases
//! - Monotonic clock, deadlines, and frame pacing
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
