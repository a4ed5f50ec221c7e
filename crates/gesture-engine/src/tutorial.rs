//! Onboarding demo driven by single-hand pinches.
//!
//! The tutorial shows a flat widget the user can tilt before touching a real
//! model. It consumes the same classified samples as the main controller but
//! keeps its own reference palm, applies no smoothing or debounce, and only
//! reacts while its step is active.

use serde::{Deserialize, Serialize};

use lorbital_gesture_model::geometry::Point2D;
use lorbital_gesture_model::gesture::{GestureData, GestureSample};

/// Degrees of widget rotation per normalized unit of hand motion.
pub const TUTORIAL_SENSITIVITY_DEG: f64 = 200.0;

/// Pitch limit in degrees.
pub const TUTORIAL_PITCH_LIMIT_DEG: f64 = 90.0;

/// Rotation of the demo widget in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DemoRotation {
    /// Rotation about the vertical axis. Unbounded.
    pub yaw_deg: f64,
    /// Rotation about the horizontal axis, within the pitch limit.
    pub pitch_deg: f64,
}

#[derive(Debug, Clone, Default)]
pub struct TutorialDemo {
    rotation: DemoRotation,
    last_palm: Option<Point2D>,
    active: bool,
    invert_rotation_y: bool,
}

impl TutorialDemo {
    pub fn new(invert_rotation_y: bool) -> Self {
        Self {
            invert_rotation_y,
            ..Self::default()
        }
    }

    /// Enable or disable reaction to samples. Either way the reference palm
    /// is dropped so the next pinch starts fresh.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        self.last_palm = None;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_invert_rotation_y(&mut self, invert: bool) {
        self.invert_rotation_y = invert;
    }

    pub fn rotation(&self) -> DemoRotation {
        self.rotation
    }

    /// Back to the untilted widget.
    pub fn reset(&mut self) {
        self.rotation = DemoRotation::default();
        self.last_palm = None;
    }

    /// Feed one classified sample. Returns the new rotation if it changed.
    pub fn on_sample(&mut self, sample: &GestureSample) -> Option<DemoRotation> {
        if !self.active {
            return None;
        }

        let Some(GestureData::SingleHand { palm, .. }) = sample.data else {
            self.last_palm = None;
            return None;
        };

        let Some(last) = self.last_palm.replace(palm) else {
            return None;
        };

        let (dx, dy) = palm.delta_from(&last);
        let vertical = if self.invert_rotation_y { dy } else { -dy };
        self.rotation.yaw_deg -= dx * TUTORIAL_SENSITIVITY_DEG;
        self.rotation.pitch_deg = (self.rotation.pitch_deg + vertical * TUTORIAL_SENSITIVITY_DEG)
            .clamp(-TUTORIAL_PITCH_LIMIT_DEG, TUTORIAL_PITCH_LIMIT_DEG);

        tracing::trace!(
            yaw = self.rotation.yaw_deg,
            pitch = self.rotation.pitch_deg,
            "Tutorial widget rotated"
        );
        Some(self.rotation)
    }
}
