//! Lorbital Gesture Model
//!
//! Defines the data contracts shared by the control pipeline:
//! - **Landmarks:** Per-frame hand landmark positions from an external tracker
//! - **Gestures:** Classified gesture samples (none / one-hand / two-hand pinch)
//! - **Geometry:** Normalized points and the pixel bounds of the interaction surface
//!
//! Landmark coordinates are normalized to `[0.0, 1.0]` relative to the camera
//! image, exactly as the tracker reports them.

pub mod geometry;
pub mod gesture;
pub mod landmark;

pub use geometry::*;
pub use gesture::*;
pub use landmark::*;
