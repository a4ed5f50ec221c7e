//! Gesture debouncing and the manipulation state machine.
//!
//! [`GestureController`] consumes one classified [`GestureSample`] per camera
//! frame and drives a [`ManipulationTarget`] (the render controller in the
//! viewer, a recorder in tests):
//!
//! ```text
//!            pinch                     both hands pinch for N frames
//!   Idle ───────────▶ Rotating ◀──────────────────────────▶ Zooming
//!    ▲                   │                                     │
//!    └── release delay / timeout ──────────────────────────────┘
//! ```
//!
//! Timers are [`Deadline`]s checked whenever a sample arrives or the host
//! calls [`GestureController::poll`], so the whole machine runs on injected
//! timestamps.

use serde::{Deserialize, Serialize};

use lorbital_common::clock::{ns_to_ms, Deadline};
use lorbital_gesture_model::geometry::{InteractionBounds, Point2D};
use lorbital_gesture_model::gesture::{GestureData, GestureSample, GestureState};
use lorbital_gesture_model::landmark::TimestampNs;

use crate::smoother::{MotionSmoother, SmootherConfig, SmootherState};

/// What the gesture pipeline manipulates.
///
/// Rotation deltas are radians about the fixed world axes; scales are
/// absolute values the caller has already clamped.
pub trait ManipulationTarget {
    /// Rotate by `dx` about world up and `dy` about world right.
    fn apply_rotation_delta(&mut self, dx: f64, dy: f64);

    /// The scale the target is heading toward.
    fn target_scale(&self) -> f64;

    /// Set a new absolute target scale.
    fn apply_scale_delta(&mut self, new_scale: f64);

    fn set_interacting(&mut self, interacting: bool);

    /// Stop where the displayed state currently is, discarding any
    /// remaining distance to the target.
    fn settle(&mut self);

    /// Pixel size of the surface, used to convert normalized hand motion.
    fn interaction_bounds(&self) -> InteractionBounds;
}

/// Tuning for the gesture state machine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Consecutive two-hand samples required before zooming starts.
    pub two_hand_stable_frames: u32,

    /// Silence after the last active sample that counts as losing the hand.
    pub gesture_timeout_ms: f64,

    /// Delay between a no-pinch sample and the full reset.
    pub release_delay_ms: f64,

    /// Dead zone as a fraction of the shorter interaction-surface side.
    pub rotation_dead_zone: f64,

    /// Radians per smoothed pixel.
    pub rotation_sensitivity: f64,

    /// How strongly the fingertip distance ratio maps to scale.
    pub zoom_sensitivity: f64,

    /// Per-frame bounds on the fingertip distance ratio.
    pub min_zoom_ratio: f64,
    pub max_zoom_ratio: f64,

    /// Baselines shorter than this are re-seeded instead of divided by.
    pub min_two_hand_baseline: f64,

    /// Camera images are mirrored: moving the hand right moves it left in
    /// the image.
    pub mirror_x: bool,

    pub invert_rotation_y: bool,

    pub min_scale: f64,
    pub max_scale: f64,

    pub smoother: SmootherConfig,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            two_hand_stable_frames: 3,
            gesture_timeout_ms: 500.0,
            release_delay_ms: 200.0,
            rotation_dead_zone: 0.003,
            rotation_sensitivity: 0.008,
            zoom_sensitivity: 2.0,
            min_zoom_ratio: 0.5,
            max_zoom_ratio: 2.0,
            min_two_hand_baseline: 0.001,
            mirror_x: true,
            invert_rotation_y: false,
            min_scale: 0.005,
            max_scale: 50.0,
            smoother: SmootherConfig::default(),
        }
    }
}

/// Reference point of an in-progress single-hand drag.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DragAnchor {
    palm: Point2D,
    /// Time of the previous drag frame; `None` right after the drag began.
    last_frame_ns: Option<TimestampNs>,
}

/// Committed gesture state with the data that only exists in that state.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    /// Single-hand pinch. `drag` is `None` once the hand released but the
    /// delayed reset has not fired yet.
    Rotating { drag: Option<DragAnchor> },
    /// Two-hand pinch. `baseline` is the previous fingertip distance.
    Zooming { baseline: Option<f64> },
}

impl Phase {
    fn state(&self) -> GestureState {
        match self {
            Phase::Idle => GestureState::None,
            Phase::Rotating { .. } => GestureState::SingleHandPinch,
            Phase::Zooming { .. } => GestureState::TwoHandPinch,
        }
    }

    fn entered(state: GestureState) -> Self {
        match state {
            GestureState::None => Phase::Idle,
            GestureState::SingleHandPinch => Phase::Rotating { drag: None },
            GestureState::TwoHandPinch => Phase::Zooming { baseline: None },
        }
    }

    fn drag_palm(&self) -> Option<Point2D> {
        match self {
            Phase::Rotating {
                drag: Some(anchor),
            } => Some(anchor.palm),
            _ => None,
        }
    }
}

/// Read-only view of the controller, for diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControllerSnapshot {
    pub state: GestureState,
    pub dragging: bool,
    pub last_hand_pos: Option<Point2D>,
    /// Zero when no two-hand baseline is recorded.
    pub last_two_hand_dist: f64,
    pub two_hand_stable_count: u32,
    pub last_active_ns: Option<TimestampNs>,
    pub reset_due_ns: Option<TimestampNs>,
    pub smoother: SmootherState,
}

/// Debounced gesture state machine. One instance per input session.
#[derive(Debug, Clone)]
pub struct GestureController {
    config: GestureConfig,
    smoother: MotionSmoother,
    phase: Phase,
    two_hand_stable_count: u32,
    last_active_ns: Option<TimestampNs>,
    reset_deadline: Option<Deadline>,
    /// The latest sample carried a pinch.
    pinch_held: bool,
}

impl GestureController {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            smoother: MotionSmoother::new(config.smoother),
            config,
            phase: Phase::Idle,
            two_hand_stable_count: 0,
            last_active_ns: None,
            reset_deadline: None,
            pinch_held: false,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn set_invert_rotation_y(&mut self, invert: bool) {
        self.config.invert_rotation_y = invert;
    }

    /// Committed gesture state.
    pub fn state(&self) -> GestureState {
        self.phase.state()
    }

    /// A hand is pinching right now: a rotation or zoom is in progress, not
    /// merely awaiting its delayed reset.
    pub fn is_manipulating(&self) -> bool {
        self.pinch_held && self.phase != Phase::Idle
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            state: self.phase.state(),
            dragging: self.phase.drag_palm().is_some(),
            last_hand_pos: self.phase.drag_palm(),
            last_two_hand_dist: match self.phase {
                Phase::Zooming {
                    baseline: Some(distance),
                } => distance,
                _ => 0.0,
            },
            two_hand_stable_count: self.two_hand_stable_count,
            last_active_ns: self.last_active_ns,
            reset_due_ns: self.reset_deadline.map(|d| d.due_ns()),
            smoother: self.smoother.state(),
        }
    }

    /// Feed one classified sample observed at `now_ns`.
    pub fn on_sample<T: ManipulationTarget + ?Sized>(
        &mut self,
        sample: &GestureSample,
        now_ns: TimestampNs,
        target: &mut T,
    ) {
        self.poll(now_ns, target);

        match sample.data {
            None => self.on_release(now_ns, target),
            Some(data) => self.on_active(data, now_ns, target),
        }
    }

    /// Fire an expired reset deadline. Returns `true` if the controller reset.
    ///
    /// Hosts call this every render frame so a hand leaving the camera view
    /// (no samples at all) still ends the gesture.
    pub fn poll<T: ManipulationTarget + ?Sized>(
        &mut self,
        now_ns: TimestampNs,
        target: &mut T,
    ) -> bool {
        match self.reset_deadline {
            Some(deadline) if deadline.is_due(now_ns) => {
                tracing::debug!(
                    state = ?self.phase.state(),
                    due_ns = deadline.due_ns(),
                    now_ns,
                    "Gesture reset deadline expired"
                );
                self.reset(target);
                true
            }
            _ => false,
        }
    }

    /// Return to `Idle`, dropping every reference point and accumulator.
    pub fn reset<T: ManipulationTarget + ?Sized>(&mut self, target: &mut T) {
        self.phase = Phase::Idle;
        self.two_hand_stable_count = 0;
        self.last_active_ns = None;
        self.reset_deadline = None;
        self.pinch_held = false;
        self.smoother.reset();
        target.set_interacting(false);
    }

    /// No pinch this frame: behave like a mouse-up.
    fn on_release<T: ManipulationTarget + ?Sized>(&mut self, now_ns: TimestampNs, target: &mut T) {
        self.two_hand_stable_count = 0;
        self.pinch_held = false;

        if let Phase::Rotating { drag } = &mut self.phase {
            if drag.take().is_some() {
                tracing::debug!("Single-hand drag released");
                target.settle();
                target.set_interacting(false);
            }
        }

        if self.phase != Phase::Idle {
            // Absorb single dropped frames: a pinch within the delay resumes
            // without a reset. An earlier pending deadline is kept.
            let candidate = Deadline::after(now_ns, self.config.release_delay_ms);
            self.reset_deadline = Some(Deadline::earliest(self.reset_deadline, candidate));
        }
    }

    fn on_active<T: ManipulationTarget + ?Sized>(
        &mut self,
        data: GestureData,
        now_ns: TimestampNs,
        target: &mut T,
    ) {
        self.last_active_ns = Some(now_ns);
        self.pinch_held = true;
        self.reset_deadline = Some(Deadline::after(now_ns, self.config.gesture_timeout_ms));

        let effective = self.debounce(data);
        let next = effective.state();
        if next != self.phase.state() {
            self.transition(next);
        }

        match effective {
            GestureData::SingleHand { palm, .. } => self.drive_rotation(palm, now_ns, target),
            GestureData::TwoHand { distance, .. } => self.drive_zoom(distance, target),
        }
    }

    /// Hold back two-hand samples until they have been stable long enough,
    /// treating them as a single-hand pinch meanwhile.
    fn debounce(&mut self, data: GestureData) -> GestureData {
        let GestureData::TwoHand {
            hand1_palm,
            hand2_palm,
            pinch1,
            pinch2,
            ..
        } = data
        else {
            self.two_hand_stable_count = 0;
            return data;
        };

        self.two_hand_stable_count = self.two_hand_stable_count.saturating_add(1);
        if self.two_hand_stable_count >= self.config.two_hand_stable_frames {
            return data;
        }

        let palm = match self.phase.drag_palm() {
            Some(last) if hand2_palm.distance_to(&last) < hand1_palm.distance_to(&last) => {
                hand2_palm
            }
            _ => hand1_palm,
        };
        tracing::trace!(
            stable = self.two_hand_stable_count,
            required = self.config.two_hand_stable_frames,
            "Two-hand pinch not yet stable"
        );
        GestureData::SingleHand {
            palm,
            pinch_dist: pinch1.min(pinch2),
        }
    }

    /// Single place where a change of committed state clears per-gesture data.
    fn transition(&mut self, next: GestureState) {
        tracing::debug!(from = ?self.phase.state(), to = ?next, "Gesture state change");
        self.phase = Phase::entered(next);
        self.smoother.reset();
    }

    fn drive_rotation<T: ManipulationTarget + ?Sized>(
        &mut self,
        palm: Point2D,
        now_ns: TimestampNs,
        target: &mut T,
    ) {
        let Phase::Rotating { drag } = &mut self.phase else {
            return;
        };

        let Some(anchor) = drag else {
            *drag = Some(DragAnchor {
                palm,
                last_frame_ns: None,
            });
            self.smoother.reset();
            target.set_interacting(true);
            tracing::debug!(x = palm.x, y = palm.y, "Single-hand drag started");
            return;
        };

        let dt_ms = anchor
            .last_frame_ns
            .map(|last| ns_to_ms(now_ns.saturating_sub(last)))
            .unwrap_or(0.0);
        anchor.last_frame_ns = Some(now_ns);

        let (dx, dy) = palm.delta_from(&anchor.palm);
        anchor.palm = palm;

        let bounds = target.interaction_bounds();
        let (dx_px, dy_px) = bounds.to_pixels(dx, dy);
        let dead_zone_px = bounds.dead_zone_px(self.config.rotation_dead_zone);
        if dx_px.abs() < dead_zone_px && dy_px.abs() < dead_zone_px {
            tracing::trace!(dx_px, dy_px, dead_zone_px, "Drag delta inside dead zone");
            return;
        }

        let (sx, sy) = self.smoother.smooth(dx_px, dy_px, dt_ms);
        let cfg = &self.config;
        let horizontal = if cfg.mirror_x { -sx } else { sx };
        let vertical = if cfg.invert_rotation_y { sy } else { -sy };
        target.apply_rotation_delta(
            horizontal * cfg.rotation_sensitivity,
            vertical * cfg.rotation_sensitivity,
        );
    }

    fn drive_zoom<T: ManipulationTarget + ?Sized>(&mut self, distance: f64, target: &mut T) {
        let Phase::Zooming { baseline } = &mut self.phase else {
            return;
        };
        let cfg = &self.config;

        match *baseline {
            Some(previous) if previous >= cfg.min_two_hand_baseline => {
                let ratio = (distance / previous).clamp(cfg.min_zoom_ratio, cfg.max_zoom_ratio);
                let factor = 1.0 + (ratio - 1.0) * cfg.zoom_sensitivity;
                let scale = (target.target_scale() * factor).clamp(cfg.min_scale, cfg.max_scale);
                tracing::trace!(distance, previous, ratio, factor, scale, "Two-hand zoom");
                target.apply_scale_delta(scale);
            }
            _ => {
                tracing::debug!(distance, "Two-hand zoom baseline recorded");
            }
        }
        *baseline = Some(distance);
    }
}

impl Default for GestureController {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every call the controller makes.
    #[derive(Debug)]
    struct RecordingTarget {
        pub rotations: Vec<(f64, f64)>,
        pub scale: f64,
        pub scale_updates: usize,
        pub interacting: bool,
        pub settles: usize,
        pub bounds: InteractionBounds,
    }

    impl RecordingTarget {
        pub fn new() -> Self {
            Self {
                rotations: Vec::new(),
                scale: 1.0,
                scale_updates: 0,
                interacting: false,
                settles: 0,
                bounds: InteractionBounds::new(1000.0, 1000.0),
            }
        }
    }

    impl ManipulationTarget for RecordingTarget {
        fn apply_rotation_delta(&mut self, dx: f64, dy: f64) {
            self.rotations.push((dx, dy));
            self.interacting = true;
        }

        fn target_scale(&self) -> f64 {
            self.scale
        }

        fn apply_scale_delta(&mut self, new_scale: f64) {
            self.scale = new_scale;
            self.scale_updates += 1;
            self.interacting = true;
        }

        fn set_interacting(&mut self, interacting: bool) {
            self.interacting = interacting;
        }

        fn settle(&mut self) {
            self.settles += 1;
        }

        fn interaction_bounds(&self) -> InteractionBounds {
            self.bounds
        }
    }

    const MS: u64 = 1_000_000;

    fn single(x: f64, y: f64) -> GestureSample {
        GestureSample::single(1, Point2D::new(x, y), 0.02)
    }

    fn two(x1: f64, x2: f64) -> GestureSample {
        GestureSample::two_hand(Point2D::new(x1, 0.5), Point2D::new(x2, 0.5), 0.02, 0.02)
    }

    #[test]
    fn test_first_pinch_frame_starts_drag_without_rotation() {
        let mut controller = GestureController::default();
        let mut target = RecordingTarget::new();

        controller.on_sample(&single(0.5, 0.5), 0, &mut target);

        let snap = controller.snapshot();
        assert_eq!(snap.state, GestureState::SingleHandPinch);
        assert!(snap.dragging);
        assert_eq!(snap.last_hand_pos, Some(Point2D::new(0.5, 0.5)));
        assert!(target.interacting);
        assert!(target.rotations.is_empty());
    }

    #[test]
    fn test_drag_rotates_with_mirrored_horizontal() {
        let mut controller = GestureController::default();
        let mut target = RecordingTarget::new();

        controller.on_sample(&single(0.5, 0.5), 0, &mut target);
        // Hand moves right and up in the image.
        controller.on_sample(&single(0.52, 0.48), 33 * MS, &mut target);

        assert_eq!(target.rotations.len(), 1);
        let (dx, dy) = target.rotations[0];
        assert!(dx < 0.0, "mirrored horizontal should be negative, got {dx}");
        assert!(dy > 0.0, "upward motion should tilt forward, got {dy}");
        assert_eq!(
            controller.snapshot().last_hand_pos,
            Some(Point2D::new(0.52, 0.48))
        );
    }

    #[test]
    fn test_invert_rotation_y_flips_vertical() {
        let mut controller = GestureController::new(GestureConfig {
            invert_rotation_y: true,
            mirror_x: false,
            ..GestureConfig::default()
        });
        let mut target = RecordingTarget::new();

        controller.on_sample(&single(0.5, 0.5), 0, &mut target);
        controller.on_sample(&single(0.52, 0.48), 33 * MS, &mut target);

        let (dx, dy) = target.rotations[0];
        assert!(dx > 0.0);
        assert!(dy < 0.0);
    }

    #[test]
    fn test_dead_zone_swallows_small_moves_but_moves_anchor() {
        let mut controller = GestureController::default();
        let mut target = RecordingTarget::new();

        // 1000px square: dead zone is 3px, i.e. 0.003 normalized.
        controller.on_sample(&single(0.5, 0.5), 0, &mut target);
        controller.on_sample(&single(0.502, 0.501), 16 * MS, &mut target);

        assert!(target.rotations.is_empty());
        assert_eq!(
            controller.snapshot().last_hand_pos,
            Some(Point2D::new(0.502, 0.501))
        );

        // A second tiny move measured from the updated anchor is swallowed too,
        // even though the total displacement now exceeds the dead zone.
        controller.on_sample(&single(0.504, 0.502), 32 * MS, &mut target);
        assert!(target.rotations.is_empty());
    }

    #[test]
    fn test_two_hand_commits_on_third_stable_frame() {
        let mut controller = GestureController::default();
        let mut target = RecordingTarget::new();

        controller.on_sample(&two(0.3, 0.7), 0, &mut target);
        assert_eq!(controller.state(), GestureState::SingleHandPinch);
        assert_eq!(controller.snapshot().two_hand_stable_count, 1);

        controller.on_sample(&two(0.3, 0.7), 33 * MS, &mut target);
        assert_eq!(controller.state(), GestureState::SingleHandPinch);

        controller.on_sample(&two(0.3, 0.7), 66 * MS, &mut target);
        assert_eq!(controller.state(), GestureState::TwoHandPinch);
        assert!(!controller.snapshot().dragging);
    }

    #[test]
    fn test_interrupted_two_hand_resets_stable_count() {
        let mut controller = GestureController::default();
        let mut target = RecordingTarget::new();

        controller.on_sample(&two(0.3, 0.7), 0, &mut target);
        controller.on_sample(&two(0.3, 0.7), 33 * MS, &mut target);
        controller.on_sample(&single(0.3, 0.5), 66 * MS, &mut target);
        assert_eq!(controller.snapshot().two_hand_stable_count, 0);

        controller.on_sample(&two(0.3, 0.7), 99 * MS, &mut target);
        controller.on_sample(&two(0.3, 0.7), 132 * MS, &mut target);
        assert_eq!(controller.state(), GestureState::SingleHandPinch);
        controller.on_sample(&two(0.3, 0.7), 165 * MS, &mut target);
        assert_eq!(controller.state(), GestureState::TwoHandPinch);

        controller.on_sample(&GestureSample::none(0), 198 * MS, &mut target);
        assert_eq!(controller.snapshot().two_hand_stable_count, 0);
    }

    #[test]
    fn test_debounce_fallback_prefers_hand_nearest_drag() {
        let mut controller = GestureController::default();
        let mut target = RecordingTarget::new();

        controller.on_sample(&single(0.8, 0.5), 0, &mut target);
        controller.on_sample(&two(0.2, 0.79), 33 * MS, &mut target);

        // Still rotating, and anchored on the right-hand fingertip.
        assert_eq!(controller.state(), GestureState::SingleHandPinch);
        assert_eq!(
            controller.snapshot().last_hand_pos,
            Some(Point2D::new(0.79, 0.5))
        );
    }

    #[test]
    fn test_zoom_seeds_baseline_then_scales() {
        let config = GestureConfig {
            two_hand_stable_frames: 1,
            ..GestureConfig::default()
        };
        let mut controller = GestureController::new(config);
        let mut target = RecordingTarget::new();

        controller.on_sample(&two(0.45, 0.55), 0, &mut target);
        assert_eq!(target.scale_updates, 0);
        assert!((controller.snapshot().last_two_hand_dist - 0.1).abs() < 1e-9);

        // Spread to 0.3: ratio 3.0 clamps to 2.0, multiplier 1 + 1.0 * 2.0 = 3.0.
        controller.on_sample(&two(0.35, 0.65), 33 * MS, &mut target);
        assert_eq!(target.scale_updates, 1);
        assert!((target.scale - 3.0).abs() < 1e-9);
        assert!((controller.snapshot().last_two_hand_dist - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_clamps_to_max_scale() {
        let config = GestureConfig {
            two_hand_stable_frames: 1,
            ..GestureConfig::default()
        };
        let mut controller = GestureController::new(config);
        let mut target = RecordingTarget::new();
        target.scale = 20.0;

        controller.on_sample(&two(0.45, 0.55), 0, &mut target);
        controller.on_sample(&two(0.35, 0.65), 33 * MS, &mut target);
        assert_eq!(target.scale, 50.0);
    }

    #[test]
    fn test_zoom_collapse_clamps_to_min_scale() {
        let config = GestureConfig {
            two_hand_stable_frames: 1,
            ..GestureConfig::default()
        };
        let mut controller = GestureController::new(config);
        let mut target = RecordingTarget::new();

        controller.on_sample(&two(0.3, 0.7), 0, &mut target);
        controller.on_sample(&two(0.5, 0.5), 33 * MS, &mut target);
        assert_eq!(target.scale, 0.005);

        // A zero-length baseline is re-seeded rather than divided by.
        controller.on_sample(&two(0.4, 0.6), 66 * MS, &mut target);
        assert_eq!(target.scale_updates, 1);
    }

    #[test]
    fn test_release_settles_and_schedules_delayed_reset() {
        let mut controller = GestureController::default();
        let mut target = RecordingTarget::new();

        controller.on_sample(&single(0.5, 0.5), 0, &mut target);
        controller.on_sample(&GestureSample::none(1), 33 * MS, &mut target);

        assert_eq!(target.settles, 1);
        assert!(!target.interacting);
        let snap = controller.snapshot();
        assert!(!snap.dragging);
        assert_eq!(snap.last_hand_pos, None);
        assert_eq!(snap.state, GestureState::SingleHandPinch);
        assert_eq!(snap.reset_due_ns, Some(233 * MS));

        assert!(!controller.poll(200 * MS, &mut target));
        assert!(controller.poll(233 * MS, &mut target));
        assert_eq!(controller.state(), GestureState::None);
    }

    #[test]
    fn test_flicker_within_delay_resumes_without_reset() {
        let mut controller = GestureController::default();
        let mut target = RecordingTarget::new();

        controller.on_sample(&single(0.5, 0.5), 0, &mut target);
        controller.on_sample(&GestureSample::none(1), 33 * MS, &mut target);
        controller.on_sample(&single(0.6, 0.5), 66 * MS, &mut target);

        // The pinch returned before the reset fired: a new drag starts at the
        // new position instead of jumping from the old one.
        assert_eq!(controller.state(), GestureState::SingleHandPinch);
        assert!(target.rotations.is_empty());
        assert_eq!(
            controller.snapshot().reset_due_ns,
            Some(566 * MS),
            "timeout re-armed from the active sample"
        );
    }

    #[test]
    fn test_repeated_release_keeps_earliest_deadline() {
        let mut controller = GestureController::default();
        let mut target = RecordingTarget::new();

        controller.on_sample(&single(0.5, 0.5), 0, &mut target);
        controller.on_sample(&GestureSample::none(1), 33 * MS, &mut target);
        controller.on_sample(&GestureSample::none(1), 66 * MS, &mut target);
        controller.on_sample(&GestureSample::none(1), 99 * MS, &mut target);
        assert_eq!(controller.snapshot().reset_due_ns, Some(233 * MS));
    }

    #[test]
    fn test_silence_times_out() {
        let mut controller = GestureController::default();
        let mut target = RecordingTarget::new();

        controller.on_sample(&single(0.5, 0.5), 0, &mut target);
        assert!(!controller.poll(499 * MS, &mut target));
        assert!(target.interacting);

        assert!(controller.poll(500 * MS, &mut target));
        assert_eq!(controller.state(), GestureState::None);
        assert!(!target.interacting);
        assert_eq!(controller.snapshot().last_hand_pos, None);
    }

    #[test]
    fn test_late_sample_resets_before_processing() {
        let mut controller = GestureController::default();
        let mut target = RecordingTarget::new();

        controller.on_sample(&single(0.5, 0.5), 0, &mut target);
        // 800ms later the hand is back somewhere else: no jump from the old anchor.
        controller.on_sample(&single(0.9, 0.1), 800 * MS, &mut target);
        assert!(target.rotations.is_empty());
        assert_eq!(
            controller.snapshot().last_hand_pos,
            Some(Point2D::new(0.9, 0.1))
        );
    }

    #[test]
    fn test_repeated_none_is_idempotent() {
        let mut controller = GestureController::default();
        let mut target = RecordingTarget::new();

        controller.on_sample(&single(0.5, 0.5), 0, &mut target);
        controller.on_sample(&single(0.6, 0.5), 33 * MS, &mut target);
        controller.on_sample(&GestureSample::none(0), 66 * MS, &mut target);
        controller.poll(300 * MS, &mut target);

        let settled = controller.snapshot();
        assert_eq!(settled.state, GestureState::None);
        let settles = target.settles;
        let rotations = target.rotations.len();

        for i in 1..=5u64 {
            controller.on_sample(&GestureSample::none(0), (300 + 33 * i) * MS, &mut target);
            assert_eq!(controller.snapshot(), settled);
        }
        assert_eq!(target.settles, settles);
        assert_eq!(target.rotations.len(), rotations);
        assert!(!target.interacting);
    }

    #[test]
    fn test_state_change_clears_smoother() {
        let mut controller = GestureController::default();
        let mut target = RecordingTarget::new();

        controller.on_sample(&single(0.5, 0.5), 0, &mut target);
        controller.on_sample(&single(0.6, 0.5), 33 * MS, &mut target);
        assert_ne!(controller.snapshot().smoother.last_delta_x, 0.0);

        for i in 0..3u64 {
            controller.on_sample(&two(0.3, 0.7), (66 + 33 * i) * MS, &mut target);
        }
        let snap = controller.snapshot();
        assert_eq!(snap.state, GestureState::TwoHandPinch);
        assert_eq!(snap.smoother.last_delta_x, 0.0);
        assert_eq!(snap.smoother.smoothed_speed, 0.0);
        assert_eq!(snap.smoother.blend, 0.6);
    }

    #[test]
    fn test_new_drag_does_not_inherit_momentum() {
        let mut controller = GestureController::default();
        let mut target = RecordingTarget::new();

        controller.on_sample(&single(0.2, 0.5), 0, &mut target);
        controller.on_sample(&single(0.4, 0.5), 33 * MS, &mut target);
        controller.on_sample(&GestureSample::none(1), 66 * MS, &mut target);

        // Pinch again before the reset fires: the drag restarts from neutral.
        controller.on_sample(&single(0.4, 0.5), 99 * MS, &mut target);
        let snap = controller.snapshot();
        assert!(snap.dragging);
        assert_eq!(snap.smoother.last_delta_x, 0.0);
        assert_eq!(snap.smoother.smoothed_speed, 0.0);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: GestureConfig = serde_json::from_str(
            r#"{"release_delay_ms":150.0,"smoother":{"min_blend":0.3}}"#,
        )
        .unwrap();
        assert_eq!(config.release_delay_ms, 150.0);
        assert_eq!(config.gesture_timeout_ms, 500.0);
        assert_eq!(config.smoother.min_blend, 0.3);
        assert_eq!(config.smoother.max_blend, SmootherConfig::default().max_blend);
    }

    #[test]
    fn test_is_manipulating_tracks_held_pinch() {
        let mut controller = GestureController::default();
        let mut target = RecordingTarget::new();
        assert!(!controller.is_manipulating());

        controller.on_sample(&single(0.5, 0.5), 0, &mut target);
        assert!(controller.is_manipulating());
        controller.on_sample(&two(0.3, 0.7), 33 * MS, &mut target);
        assert!(controller.is_manipulating());

        // Released but still awaiting the delayed reset.
        controller.on_sample(&GestureSample::none(0), 66 * MS, &mut target);
        assert_ne!(controller.state(), GestureState::None);
        assert!(!controller.is_manipulating());

        controller.on_sample(&single(0.5, 0.5), 99 * MS, &mut target);
        assert!(controller.is_manipulating());
        controller.reset(&mut target);
        assert!(!controller.is_manipulating());
    }
}
