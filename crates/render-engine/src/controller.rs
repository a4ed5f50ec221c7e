//! Target/current orientation and scale with per-frame interpolation.

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

use lorbital_gesture_engine::ManipulationTarget;
use lorbital_gesture_model::geometry::InteractionBounds;

/// Render controller tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Fraction of the remaining distance covered each tick.
    pub lerp_factor: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Scale used before any model supplies a recommended one.
    pub initial_scale: f64,
    pub auto_rotate: bool,
    /// Radians about world up per tick while auto-rotating.
    pub auto_rotate_speed: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            lerp_factor: 0.25,
            min_scale: 0.005,
            max_scale: 50.0,
            initial_scale: 1.0,
            auto_rotate: false,
            auto_rotate_speed: 0.0105,
        }
    }
}

impl RenderConfig {
    pub fn clamp_scale(&self, scale: f64) -> f64 {
        scale.clamp(self.min_scale, self.max_scale)
    }
}

/// Who asked for a rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationOrigin {
    /// Mouse, touch, or gesture input. Marks the controller as interacting.
    User,
    /// The idle spin injected by [`RenderController::tick`].
    AutoRotate,
}

/// Orientation and scale, both as targeted by input and as displayed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderState {
    pub target_orientation: DQuat,
    pub current_orientation: DQuat,
    pub target_scale: f64,
    pub current_scale: f64,
    pub interacting: bool,
}

impl RenderState {
    fn at_rest(scale: f64) -> Self {
        Self {
            target_orientation: DQuat::IDENTITY,
            current_orientation: DQuat::IDENTITY,
            target_scale: scale,
            current_scale: scale,
            interacting: false,
        }
    }
}

/// What the scene applies to the model after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameTransform {
    /// Ticks since the controller was created.
    pub frame_index: u64,
    pub orientation: DQuat,
    pub scale: f64,
}

/// Owns [`RenderState`] for one viewer session.
#[derive(Debug, Clone)]
pub struct RenderController {
    config: RenderConfig,
    state: RenderState,
    auto_rotate: bool,
    bounds: InteractionBounds,
    frame_index: u64,
}

impl RenderController {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            state: RenderState::at_rest(config.clamp_scale(config.initial_scale)),
            auto_rotate: config.auto_rotate,
            bounds: InteractionBounds::default(),
            frame_index: 0,
            config,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn is_interacting(&self) -> bool {
        self.state.interacting
    }

    pub fn auto_rotate(&self) -> bool {
        self.auto_rotate
    }

    pub fn set_auto_rotate(&mut self, enabled: bool) {
        self.auto_rotate = enabled;
    }

    pub fn set_auto_rotate_speed(&mut self, radians_per_tick: f64) {
        if radians_per_tick.is_finite() {
            self.config.auto_rotate_speed = radians_per_tick;
        }
    }

    /// Resize the interaction surface (canvas or viewport size in pixels).
    pub fn set_bounds(&mut self, bounds: InteractionBounds) {
        self.bounds = bounds;
    }

    /// Rotate the target by `dx` radians about world up and `dy` radians
    /// about world right.
    ///
    /// The rotations are pre-multiplied, so the axes are the screen's and
    /// not the model's: dragging right always turns the visible front face
    /// right however far the model has already been turned.
    pub fn apply_rotation(&mut self, dx: f64, dy: f64, origin: RotationOrigin) {
        if !dx.is_finite() || !dy.is_finite() {
            tracing::warn!(dx, dy, "Ignoring non-finite rotation delta");
            return;
        }

        let about_up = DQuat::from_axis_angle(DVec3::Y, dx);
        let about_right = DQuat::from_axis_angle(DVec3::X, dy);
        self.state.target_orientation =
            (about_up * about_right * self.state.target_orientation).normalize();

        if origin == RotationOrigin::User {
            self.state.interacting = true;
        }
    }

    /// Set the target scale, clamped to the configured bounds.
    pub fn set_target_scale(&mut self, scale: f64) {
        if !scale.is_finite() {
            tracing::warn!(scale, "Ignoring non-finite target scale");
            return;
        }
        self.state.target_scale = self.config.clamp_scale(scale);
        self.state.interacting = true;
    }

    pub fn set_interacting(&mut self, interacting: bool) {
        self.state.interacting = interacting;
        if !interacting {
            self.renormalize();
        }
    }

    /// Discard any remaining distance: the target becomes what is displayed.
    pub fn lock_to_current(&mut self) {
        self.state.target_orientation = self.state.current_orientation;
        self.state.target_scale = self.state.current_scale;
    }

    /// Put a freshly loaded model at rest: identity orientation and the
    /// model's recommended scale.
    pub fn reset(&mut self, recommended_scale: f64) {
        let scale = if recommended_scale.is_finite() {
            self.config.clamp_scale(recommended_scale)
        } else {
            self.config.clamp_scale(self.config.initial_scale)
        };
        self.state = RenderState::at_rest(scale);
        tracing::debug!(scale, "Render state reset");
    }

    /// Advance one display frame.
    pub fn tick(&mut self) -> FrameTransform {
        self.tick_holding(false)
    }

    /// Advance one display frame while an input device may be held down
    /// without reporting interaction (a pressed but unmoved mouse button).
    /// Auto-rotation pauses while `input_held`.
    pub fn tick_holding(&mut self, input_held: bool) -> FrameTransform {
        if self.auto_rotate && !self.state.interacting && !input_held {
            self.apply_rotation(self.config.auto_rotate_speed, 0.0, RotationOrigin::AutoRotate);
        }

        let t = self.config.lerp_factor;
        let state = &mut self.state;
        state.current_orientation = state
            .current_orientation
            .slerp(state.target_orientation, t)
            .normalize();
        state.current_scale = self
            .config
            .clamp_scale(state.current_scale + (state.target_scale - state.current_scale) * t);

        self.frame_index += 1;
        FrameTransform {
            frame_index: self.frame_index,
            orientation: state.current_orientation,
            scale: state.current_scale,
        }
    }

    /// Angle in radians still to cover between displayed and target orientation.
    pub fn remaining_angle(&self) -> f64 {
        angle_between(self.state.current_orientation, self.state.target_orientation)
    }

    fn renormalize(&mut self) {
        self.state.target_orientation = self.state.target_orientation.normalize();
        self.state.current_orientation = self.state.current_orientation.normalize();
    }
}

/// Rotation angle taking `a` to `b`, in `[0, π]`.
pub fn angle_between(a: DQuat, b: DQuat) -> f64 {
    2.0 * a.dot(b).abs().min(1.0).acos()
}

impl Default for RenderController {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

impl ManipulationTarget for RenderController {
    fn apply_rotation_delta(&mut self, dx: f64, dy: f64) {
        self.apply_rotation(dx, dy, RotationOrigin::User);
    }

    fn target_scale(&self) -> f64 {
        self.state.target_scale
    }

    fn apply_scale_delta(&mut self, new_scale: f64) {
        self.set_target_scale(new_scale);
    }

    fn set_interacting(&mut self, interacting: bool) {
        RenderController::set_interacting(self, interacting);
    }

    fn settle(&mut self) {
        self.lock_to_current();
    }

    fn interaction_bounds(&self) -> InteractionBounds {
        self.bounds
    }
}
