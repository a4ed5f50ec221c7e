//! Points and interaction-surface bounds.
//!
//! Hand positions arrive normalized to the camera image. Rotation is tuned in
//! screen pixels, so every delta is scaled through [`InteractionBounds`]
//! before it reaches the smoother.

use serde::{Deserialize, Serialize};

/// A 2D normalized point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point2D) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Component-wise difference `self - origin`.
    pub fn delta_from(&self, origin: &Point2D) -> (f64, f64) {
        (self.x - origin.x, self.y - origin.y)
    }

    /// Both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Pixel size of the surface the model is drawn on.
///
/// Degenerate sizes (zero, negative, NaN) are replaced by one pixel so
/// conversions never divide by zero or produce NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteractionBounds {
    pub width: f64,
    pub height: f64,
}

impl InteractionBounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: sanitize_extent(width),
            height: sanitize_extent(height),
        }
    }

    /// Convert a normalized delta to pixels.
    pub fn to_pixels(&self, dx: f64, dy: f64) -> (f64, f64) {
        (dx * self.width, dy * self.height)
    }

    /// Dead-zone radius in pixels for a fraction of the shorter side.
    pub fn dead_zone_px(&self, fraction: f64) -> f64 {
        fraction * self.width.min(self.height)
    }
}

impl Default for InteractionBounds {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

fn sanitize_extent(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        1.0
    }
}
