//! Mouse, touch, wheel, and keyboard adapters.
//!
//! Each adapter turns native pointer coordinates (pixels) into calls on the
//! same [`ManipulationTarget`] entry points the gesture path uses. Wheel and
//! key zooms have no natural "up" event, so they arm a release deadline that
//! [`PointerInput::poll`] fires.

use serde::{Deserialize, Serialize};

use lorbital_common::clock::Deadline;
use lorbital_gesture_engine::ManipulationTarget;
use lorbital_gesture_model::geometry::Point2D;
use lorbital_gesture_model::landmark::TimestampNs;

/// Pointer tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerConfig {
    /// Radians per pixel of drag.
    pub rotation_sensitivity: f64,
    /// Exponent scale applied to wheel `delta_y`.
    pub wheel_zoom_sensitivity: f64,
    /// Multiplier applied by the zoom key.
    pub key_zoom_factor: f64,
    /// How long wheel and key zooms count as interaction.
    pub release_delay_ms: f64,
    pub invert_rotation_y: bool,
    pub min_scale: f64,
    pub max_scale: f64,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            rotation_sensitivity: 0.008,
            wheel_zoom_sensitivity: 0.0015,
            key_zoom_factor: 1.5,
            release_delay_ms: 100.0,
            invert_rotation_y: false,
            min_scale: 0.005,
            max_scale: 50.0,
        }
    }
}

/// Base of the wheel zoom curve: each unit of scaled `delta_y` shrinks the
/// model by 0.1%.
const WHEEL_ZOOM_BASE: f64 = 0.999;

#[derive(Debug, Clone, Copy, PartialEq)]
enum TouchPhase {
    Idle,
    Rotating { last: Point2D },
    Pinching { baseline: f64 },
}

/// Pointer state for one viewer session.
#[derive(Debug, Clone)]
pub struct PointerInput {
    config: PointerConfig,
    mouse_last: Option<Point2D>,
    touch: TouchPhase,
    release_deadline: Option<Deadline>,
}

impl PointerInput {
    pub fn new(config: PointerConfig) -> Self {
        Self {
            config,
            mouse_last: None,
            touch: TouchPhase::Idle,
            release_deadline: None,
        }
    }

    pub fn config(&self) -> &PointerConfig {
        &self.config
    }

    pub fn set_invert_rotation_y(&mut self, invert: bool) {
        self.config.invert_rotation_y = invert;
    }

    /// A mouse button or finger is down.
    pub fn is_active(&self) -> bool {
        self.mouse_last.is_some() || self.touch != TouchPhase::Idle
    }

    pub fn mouse_down<T: ManipulationTarget + ?Sized>(&mut self, x: f64, y: f64, target: &mut T) {
        self.mouse_last = Some(Point2D::new(x, y));
        target.set_interacting(true);
    }

    pub fn mouse_move<T: ManipulationTarget + ?Sized>(&mut self, x: f64, y: f64, target: &mut T) {
        let Some(last) = self.mouse_last else {
            return;
        };
        let current = Point2D::new(x, y);
        self.rotate_by_drag(current.delta_from(&last), target);
        self.mouse_last = Some(current);
    }

    pub fn mouse_up<T: ManipulationTarget + ?Sized>(&mut self, target: &mut T) {
        self.mouse_last = None;
        target.set_interacting(false);
    }

    /// Zoom by one wheel event. Positive `delta_y` (scrolling down) zooms out.
    pub fn wheel<T: ManipulationTarget + ?Sized>(
        &mut self,
        delta_y: f64,
        now_ns: TimestampNs,
        target: &mut T,
    ) {
        if !delta_y.is_finite() {
            return;
        }
        let factor = WHEEL_ZOOM_BASE.powf(delta_y * self.config.wheel_zoom_sensitivity);
        self.zoom_briefly(target.target_scale() * factor, now_ns, target);
    }

    /// Handle a key press. Returns `true` if the key was consumed.
    pub fn key_press<T: ManipulationTarget + ?Sized>(
        &mut self,
        key: char,
        now_ns: TimestampNs,
        target: &mut T,
    ) -> bool {
        match key {
            'i' | 'I' => {
                let scale = target.target_scale() * self.config.key_zoom_factor;
                self.zoom_briefly(scale, now_ns, target);
                true
            }
            _ => false,
        }
    }

    /// Fingers touched down; `touches` lists every finger now on the surface.
    pub fn touch_start<T: ManipulationTarget + ?Sized>(
        &mut self,
        touches: &[Point2D],
        target: &mut T,
    ) {
        match touches {
            [only] => self.touch = TouchPhase::Rotating { last: *only },
            [first, second] => {
                self.touch = TouchPhase::Pinching {
                    baseline: first.distance_to(second),
                }
            }
            _ => return,
        }
        target.set_interacting(true);
    }

    pub fn touch_move<T: ManipulationTarget + ?Sized>(
        &mut self,
        touches: &[Point2D],
        target: &mut T,
    ) {
        match (self.touch, touches) {
            (TouchPhase::Rotating { last }, [only]) => {
                self.rotate_by_drag(only.delta_from(&last), target);
                self.touch = TouchPhase::Rotating { last: *only };
            }
            (TouchPhase::Pinching { baseline }, [first, second]) => {
                let distance = first.distance_to(second);
                if baseline > 0.0 {
                    let scale = self.clamp_scale(target.target_scale() * distance / baseline);
                    target.apply_scale_delta(scale);
                }
                self.touch = TouchPhase::Pinching { baseline: distance };
            }
            _ => {}
        }
    }

    /// Fingers lifted; `remaining` lists the fingers still down.
    pub fn touch_end<T: ManipulationTarget + ?Sized>(
        &mut self,
        remaining: &[Point2D],
        target: &mut T,
    ) {
        match remaining {
            [] => self.touch_cancel(target),
            // Two fingers down to one: continue as a rotation from where the
            // remaining finger is.
            [only] => self.touch = TouchPhase::Rotating { last: *only },
            _ => {}
        }
    }

    pub fn touch_cancel<T: ManipulationTarget + ?Sized>(&mut self, target: &mut T) {
        self.touch = TouchPhase::Idle;
        target.set_interacting(false);
    }

    /// Release a wheel or key zoom whose delay has passed.
    ///
    /// `external_hold` is set while another input path (a held pinch) owns
    /// the interaction; the deadline is consumed without releasing it.
    pub fn poll<T: ManipulationTarget + ?Sized>(
        &mut self,
        now_ns: TimestampNs,
        external_hold: bool,
        target: &mut T,
    ) -> bool {
        match self.release_deadline {
            Some(deadline) if deadline.is_due(now_ns) => {
                self.release_deadline = None;
                if !self.is_active() && !external_hold {
                    target.set_interacting(false);
                }
                true
            }
            _ => false,
        }
    }

    fn rotate_by_drag<T: ManipulationTarget + ?Sized>(
        &self,
        (dx, dy): (f64, f64),
        target: &mut T,
    ) {
        let cfg = &self.config;
        let vertical = if cfg.invert_rotation_y { dy } else { -dy };
        target.apply_rotation_delta(
            dx * cfg.rotation_sensitivity,
            vertical * cfg.rotation_sensitivity,
        );
    }

    fn zoom_briefly<T: ManipulationTarget + ?Sized>(
        &mut self,
        scale: f64,
        now_ns: TimestampNs,
        target: &mut T,
    ) {
        let scale = self.clamp_scale(scale);
        target.apply_scale_delta(scale);
        target.set_interacting(true);
        self.release_deadline = Some(Deadline::after(now_ns, self.config.release_delay_ms));
        tracing::trace!(scale, "Pointer zoom");
    }

    fn clamp_scale(&self, scale: f64) -> f64 {
        scale.clamp(self.config.min_scale, self.config.max_scale)
    }
}

impl Default for PointerInput {
    fn default() -> Self {
        Self::new(PointerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::RenderController;

    const MS: u64 = 1_000_000;

    #[test]
    fn test_mouse_drag_rotates_and_releases() {
        let mut input = PointerInput::default();
        let mut ctl = RenderController::default();

        input.mouse_move(10.0, 10.0, &mut ctl);
        assert!(!ctl.is_interacting(), "move without press is ignored");

        input.mouse_down(100.0, 100.0, &mut ctl);
        assert!(ctl.is_interacting());
        input.mouse_move(110.0, 95.0, &mut ctl);
        assert!(ctl.remaining_angle() > 0.0);

        input.mouse_up(&mut ctl);
        assert!(!ctl.is_interacting());
        assert!(!input.is_active());
    }

    #[test]
    fn test_wheel_zoom_is_multiplicative_and_clamped() {
        let mut input = PointerInput::default();
        let mut ctl = RenderController::default();

        input.wheel(-1000.0, 0, &mut ctl);
        let expected = 0.999f64.powf(-1.5);
        assert!((ctl.state().target_scale - expected).abs() < 1e-12);

        input.wheel(1.0e9, 0, &mut ctl);
        assert_eq!(ctl.state().target_scale, 0.005);
    }

    #[test]
    fn test_wheel_releases_after_delay() {
        let mut input = PointerInput::default();
        let mut ctl = RenderController::default();

        input.wheel(100.0, 0, &mut ctl);
        assert!(ctl.is_interacting());
        assert!(!input.poll(99 * MS, false, &mut ctl));
        assert!(ctl.is_interacting());
        assert!(input.poll(100 * MS, false, &mut ctl));
        assert!(!ctl.is_interacting());
    }

    #[test]
    fn test_release_deadline_does_not_end_a_drag() {
        let mut input = PointerInput::default();
        let mut ctl = RenderController::default();

        input.wheel(100.0, 0, &mut ctl);
        input.mouse_down(0.0, 0.0, &mut ctl);
        input.poll(200 * MS, false, &mut ctl);
        assert!(ctl.is_interacting());
    }

    #[test]
    fn test_release_deadline_respects_external_hold() {
        let mut input = PointerInput::default();
        let mut ctl = RenderController::default();

        input.wheel(100.0, 0, &mut ctl);
        assert!(input.poll(150 * MS, true, &mut ctl));
        assert!(ctl.is_interacting());
        // The deadline was consumed; a later poll does not release either.
        assert!(!input.poll(300 * MS, false, &mut ctl));
        assert!(ctl.is_interacting());
    }

    #[test]
    fn test_zoom_key() {
        let mut input = PointerInput::default();
        let mut ctl = RenderController::default();

        assert!(input.key_press('i', 0, &mut ctl));
        assert!((ctl.state().target_scale - 1.5).abs() < 1e-12);
        assert!(input.key_press('I', 0, &mut ctl));
        assert!((ctl.state().target_scale - 2.25).abs() < 1e-12);
        assert!(!input.key_press('x', 0, &mut ctl));
    }

    #[test]
    fn test_touch_pinch_then_rotate() {
        let mut input = PointerInput::default();
        let mut ctl = RenderController::default();

        let a = Point2D::new(100.0, 100.0);
        input.touch_start(&[a, Point2D::new(200.0, 100.0)], &mut ctl);
        input.touch_move(&[a, Point2D::new(300.0, 100.0)], &mut ctl);
        assert!((ctl.state().target_scale - 2.0).abs() < 1e-12);

        // Baseline follows each move.
        input.touch_move(&[a, Point2D::new(200.0, 100.0)], &mut ctl);
        assert!((ctl.state().target_scale - 1.0).abs() < 1e-12);

        // Lift one finger: the other continues as a rotation without a jump.
        input.touch_end(&[a], &mut ctl);
        assert_eq!(ctl.remaining_angle(), 0.0);
        input.touch_move(&[Point2D::new(120.0, 100.0)], &mut ctl);
        assert!(ctl.remaining_angle() > 0.0);

        input.touch_end(&[], &mut ctl);
        assert!(!ctl.is_interacting());
        assert!(!input.is_active());
    }

    #[test]
    fn test_touch_cancel_ends_interaction() {
        let mut input = PointerInput::default();
        let mut ctl = RenderController::default();

        input.touch_start(&[Point2D::new(5.0, 5.0)], &mut ctl);
        assert!(input.is_active());
        input.touch_cancel(&mut ctl);
        assert!(!input.is_active());
        assert!(!ctl.is_interacting());
    }

    #[test]
    fn test_inverted_vertical_drag() {
        let mut normal = RenderController::default();
        let mut inverted = RenderController::default();

        let mut input = PointerInput::default();
        input.mouse_down(0.0, 0.0, &mut normal);
        input.mouse_move(0.0, 10.0, &mut normal);

        let mut input = PointerInput::new(PointerConfig {
            invert_rotation_y: true,
            ..PointerConfig::default()
        });
        input.mouse_down(0.0, 0.0, &mut inverted);
        input.mouse_move(0.0, 10.0, &mut inverted);

        let n = normal.state().target_orientation;
        let i = inverted.state().target_orientation;
        assert!(n.x < 0.0 && i.x > 0.0, "n = {n:?}, i = {i:?}");
    }
}
