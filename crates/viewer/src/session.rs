//! Viewer session: the application state of one open model.
//!
//! The session owns every stateful part of the pipeline and is the only
//! place they meet. Hosts forward their events (landmark frames, pointer
//! input, visibility changes, display refresh) to it and read back a
//! [`FrameTransform`] per rendered frame.

use serde::Serialize;

use lorbital_common::config::ViewerDefaults;
use lorbital_common::error::LorbitalResult;
use lorbital_gesture_engine::{
    ControllerSnapshot, GestureClassifier, GestureController, TutorialDemo,
};
use lorbital_gesture_model::geometry::{InteractionBounds, Point2D};
use lorbital_gesture_model::gesture::GestureSample;
use lorbital_gesture_model::landmark::{LandmarkFrame, TimestampNs};
use lorbital_hand_tracker::HandTracker;
use lorbital_render_engine::{FrameTransform, PointerInput, RenderController, RenderState};

use crate::tuning::ViewerTuning;

/// Counters for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub frames_rendered: u64,
    pub samples_processed: u64,
    pub tracker_errors: u64,
}

/// Everything a host might want to display or log about the session.
#[derive(Debug, Clone, Serialize)]
pub struct ViewerStatus {
    pub visible: bool,
    pub camera_enabled: bool,
    pub camera_running: bool,
    pub torn_down: bool,
    pub gesture: ControllerSnapshot,
    pub render: RenderState,
    pub stats: SessionStats,
}

pub struct ViewerSession {
    tuning: ViewerTuning,
    classifier: GestureClassifier,
    gestures: GestureController,
    render: RenderController,
    pointer: PointerInput,
    tutorial: TutorialDemo,
    tracker: Option<HandTracker>,
    visible: bool,
    camera_enabled: bool,
    torn_down: bool,
    stats: SessionStats,
}

impl ViewerSession {
    pub fn new(tuning: ViewerTuning) -> Self {
        let mut render = RenderController::new(tuning.render);
        render.set_bounds(tuning.viewport);

        Self {
            classifier: GestureClassifier::new(tuning.classifier),
            gestures: GestureController::new(tuning.gesture),
            render,
            pointer: PointerInput::new(tuning.pointer),
            tutorial: TutorialDemo::new(tuning.gesture.invert_rotation_y),
            tracker: None,
            visible: true,
            camera_enabled: true,
            torn_down: false,
            stats: SessionStats::default(),
            tuning,
        }
    }

    /// A session configured from the user's saved preferences.
    pub fn from_preferences(prefs: &ViewerDefaults) -> Self {
        let mut session = Self::new(ViewerTuning::from_defaults(prefs));
        session.camera_enabled = prefs.camera_enabled;
        session
    }

    pub fn tuning(&self) -> &ViewerTuning {
        &self.tuning
    }

    pub fn render(&self) -> &RenderController {
        &self.render
    }

    pub fn gestures(&self) -> &GestureController {
        &self.gestures
    }

    pub fn tutorial(&self) -> &TutorialDemo {
        &self.tutorial
    }

    pub fn tracker(&self) -> Option<&HandTracker> {
        self.tracker.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn status(&self) -> ViewerStatus {
        ViewerStatus {
            visible: self.visible,
            camera_enabled: self.camera_enabled,
            camera_running: self.tracker.as_ref().is_some_and(HandTracker::is_running),
            torn_down: self.torn_down,
            gesture: self.gestures.snapshot(),
            render: *self.render.state(),
            stats: self.stats,
        }
    }

    /// Attach a hand tracker and initialize it. Initialization failure is
    /// returned unchanged and leaves the session without a tracker.
    ///
    /// The camera starts right away if the session is visible and the camera
    /// is enabled.
    pub fn attach_tracker(&mut self, mut tracker: HandTracker) -> LorbitalResult<()> {
        tracker.init()?;
        if let Some(mut previous) = self.tracker.take() {
            previous.stop();
        }
        self.tracker = Some(tracker);
        self.sync_camera()
    }

    /// Reset orientation and scale for a freshly loaded model.
    pub fn load_model(&mut self, recommended_scale: f64) {
        self.render.reset(recommended_scale);
        self.gestures.reset(&mut self.render);
        tracing::info!(
            scale = self.render.state().target_scale,
            "Model loaded"
        );
    }

    /// Run one tracker frame through classifier, debouncer, and tutorial.
    pub fn process_landmarks(&mut self, frame: &LandmarkFrame) -> GestureSample {
        let sample = self.classifier.classify_frame(frame);
        self.process_sample(&sample, frame.timestamp_ns);
        sample
    }

    /// Feed an already classified sample.
    pub fn process_sample(&mut self, sample: &GestureSample, now_ns: TimestampNs) {
        if self.torn_down {
            return;
        }
        self.gestures.on_sample(sample, now_ns, &mut self.render);
        self.tutorial.on_sample(sample);
        self.stats.samples_processed += 1;
    }

    /// Produce the transform for one display frame, or `None` while hidden.
    ///
    /// Pulls due tracker frames, fires expired gesture and pointer deadlines,
    /// then advances interpolation (and auto-rotation).
    pub fn frame(&mut self, now_ns: TimestampNs) -> Option<FrameTransform> {
        if !self.visible || self.torn_down {
            return None;
        }

        self.pump_tracker(now_ns);
        self.gestures.poll(now_ns, &mut self.render);
        let gesture_held = self.gestures.is_manipulating();
        self.pointer.poll(now_ns, gesture_held, &mut self.render);

        let held = self.pointer.is_active() || gesture_held;
        let transform = self.render.tick_holding(held);
        self.stats.frames_rendered += 1;
        Some(transform)
    }

    /// Suspend or resume rendering and the camera.
    pub fn set_visible(&mut self, visible: bool) -> LorbitalResult<()> {
        if self.visible == visible {
            return Ok(());
        }
        self.visible = visible;
        tracing::info!(visible, "Viewer visibility changed");
        if !visible {
            self.gestures.reset(&mut self.render);
        }
        self.sync_camera()
    }

    /// Turn the camera (and with it gesture tracking) on or off.
    pub fn set_camera_enabled(&mut self, enabled: bool) -> LorbitalResult<()> {
        if self.camera_enabled == enabled {
            return Ok(());
        }
        self.camera_enabled = enabled;
        tracing::info!(enabled, "Camera toggled");
        if !enabled {
            self.gestures.reset(&mut self.render);
        }
        self.sync_camera()
    }

    pub fn set_auto_rotate(&mut self, enabled: bool) {
        self.render.set_auto_rotate(enabled);
    }

    pub fn set_invert_rotation_y(&mut self, invert: bool) {
        self.tuning.gesture.invert_rotation_y = invert;
        self.tuning.pointer.invert_rotation_y = invert;
        self.gestures.set_invert_rotation_y(invert);
        self.pointer.set_invert_rotation_y(invert);
        self.tutorial.set_invert_rotation_y(invert);
    }

    /// The drawing surface was resized.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.tuning.viewport = InteractionBounds::new(width, height);
        self.render.set_bounds(self.tuning.viewport);
    }

    pub fn set_tutorial_active(&mut self, active: bool) {
        self.tutorial.set_active(active);
        if active {
            self.tutorial.reset();
        }
    }

    pub fn mouse_down(&mut self, x: f64, y: f64) {
        self.pointer.mouse_down(x, y, &mut self.render);
    }

    pub fn mouse_move(&mut self, x: f64, y: f64) {
        self.pointer.mouse_move(x, y, &mut self.render);
    }

    pub fn mouse_up(&mut self) {
        self.pointer.mouse_up(&mut self.render);
    }

    pub fn wheel(&mut self, delta_y: f64, now_ns: TimestampNs) {
        self.pointer.wheel(delta_y, now_ns, &mut self.render);
    }

    pub fn key_press(&mut self, key: char, now_ns: TimestampNs) -> bool {
        self.pointer.key_press(key, now_ns, &mut self.render)
    }

    pub fn touch_start(&mut self, touches: &[Point2D]) {
        self.pointer.touch_start(touches, &mut self.render);
    }

    pub fn touch_move(&mut self, touches: &[Point2D]) {
        self.pointer.touch_move(touches, &mut self.render);
    }

    pub fn touch_end(&mut self, remaining: &[Point2D]) {
        self.pointer.touch_end(remaining, &mut self.render);
    }

    pub fn touch_cancel(&mut self) {
        self.pointer.touch_cancel(&mut self.render);
    }

    /// Stop the camera and drop the tracker. The session ignores further
    /// input and renders nothing.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        if let Some(mut tracker) = self.tracker.take() {
            tracker.stop();
        }
        self.gestures.reset(&mut self.render);
        self.tutorial.set_active(false);
        self.torn_down = true;
        tracing::info!(
            frames = self.stats.frames_rendered,
            samples = self.stats.samples_processed,
            "Viewer session torn down"
        );
    }

    fn pump_tracker(&mut self, now_ns: TimestampNs) {
        let Some(tracker) = self.tracker.as_mut() else {
            return;
        };
        match tracker.drain(now_ns) {
            Ok(frames) => {
                for frame in &frames {
                    self.process_landmarks(frame);
                }
            }
            Err(e) => {
                self.stats.tracker_errors += 1;
                tracing::warn!(error = %e, "Hand tracker poll failed");
            }
        }
    }

    /// Run the camera exactly when visible, enabled, and not torn down.
    fn sync_camera(&mut self) -> LorbitalResult<()> {
        let wanted = self.visible && self.camera_enabled && !self.torn_down;
        let Some(tracker) = self.tracker.as_mut() else {
            return Ok(());
        };
        if wanted {
            tracker.start()
        } else {
            tracker.stop();
            Ok(())
        }
    }
}

impl Default for ViewerSession {
    fn default() -> Self {
        Self::new(ViewerTuning::default())
    }
}

impl Drop for ViewerSession {
    fn drop(&mut self) {
        self.teardown();
    }
}
