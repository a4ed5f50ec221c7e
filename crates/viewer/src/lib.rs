//! Lorbital Viewer
//!
//! One [`ViewerSession`] per open model. The session wires the hand tracker,
//! the gesture pipeline, pointer input, and the render controller together
//! and enforces the lifecycle rules between them:
//!
//! - the camera runs only while the viewer is visible and the camera is enabled
//! - hiding the viewer or turning the camera off ends any gesture in progress
//! - loading a model resets orientation and scale
//! - after teardown nothing is rendered and input is ignored

pub mod session;
pub mod tuning;

pub use session::{SessionStats, ViewerSession, ViewerStatus};
pub use tuning::ViewerTuning;
