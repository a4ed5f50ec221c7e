//! End-to-end viewer flows: scripted landmark frames in, frame transforms out.

use lorbital_gesture_model::geometry::Point2D;
use lorbital_gesture_model::gesture::GestureState;
use lorbital_gesture_model::landmark::{HandLandmarks, LandmarkFrame};
use lorbital_hand_tracker::{HandTracker, ScriptedSource};
use lorbital_viewer::{ViewerSession, ViewerTuning};

const MS: u64 = 1_000_000;
const CAMERA_MS: u64 = 33;
const DISPLAY_MS: u64 = 16;

fn pinching(x: f64, y: f64) -> HandLandmarks {
    HandLandmarks::pinching_at(Point2D::new(x, y), 0.02)
}

fn open(x: f64, y: f64) -> HandLandmarks {
    HandLandmarks::pinching_at(Point2D::new(x, y), 0.2)
}

/// Camera frames every 33 ms, one per entry.
fn script(hands_per_frame: Vec<Vec<HandLandmarks>>) -> Vec<LandmarkFrame> {
    hands_per_frame
        .into_iter()
        .enumerate()
        .map(|(i, hands)| LandmarkFrame::new(i as u64 * CAMERA_MS * MS, hands))
        .collect()
}

fn session_with(frames: Vec<LandmarkFrame>) -> ViewerSession {
    lorbital_common::logging::init_test_logging();
    let mut session = ViewerSession::new(ViewerTuning::default());
    session
        .attach_tracker(HandTracker::new(Box::new(ScriptedSource::new(frames))))
        .unwrap();
    session
}

/// Drive the display loop until `until_ms`.
fn run_until(session: &mut ViewerSession, from_ms: u64, until_ms: u64) {
    let mut t = from_ms;
    while t <= until_ms {
        session.frame(t * MS);
        t += DISPLAY_MS;
    }
}

#[test]
fn test_pinch_drag_spins_model_then_releases() {
    let mut hands: Vec<Vec<HandLandmarks>> = (0..15)
        .map(|i| vec![pinching(0.6 - 0.02 * i as f64, 0.5)])
        .collect();
    hands.extend((0..10).map(|_| vec![open(0.3, 0.5)]));
    let mut session = session_with(script(hands));

    run_until(&mut session, 0, 14 * CAMERA_MS);
    assert_eq!(session.gestures().state(), GestureState::SingleHandPinch);
    assert!(session.render().is_interacting());
    assert!(
        session.render().state().target_orientation.y > 0.0,
        "dragging left under a mirrored camera spins toward +yaw"
    );

    run_until(&mut session, 15 * CAMERA_MS, 25 * CAMERA_MS);
    assert_eq!(session.gestures().state(), GestureState::None);
    assert!(!session.render().is_interacting());

    let status = session.status();
    assert_eq!(status.stats.samples_processed, 25);
    assert_eq!(status.stats.tracker_errors, 0);
}

#[test]
fn test_spreading_hands_zoom_in() {
    let hands: Vec<Vec<HandLandmarks>> = (0..12)
        .map(|i| {
            let spread = 0.1 + 0.02 * i as f64;
            vec![pinching(0.5 - spread, 0.5), pinching(0.5 + spread, 0.5)]
        })
        .collect();
    let mut session = session_with(script(hands));

    run_until(&mut session, 0, 11 * CAMERA_MS);
    assert_eq!(session.gestures().state(), GestureState::TwoHandPinch);
    let state = session.render().state();
    assert!(state.target_scale > 1.0);
    assert!(state.current_scale > 1.0);
    assert!(state.current_scale <= state.target_scale);
}

#[test]
fn test_hidden_viewer_pauses_tracking() {
    let hands: Vec<Vec<HandLandmarks>> = (0..10).map(|_| vec![pinching(0.5, 0.5)]).collect();
    let mut session = session_with(script(hands));

    run_until(&mut session, 0, 2 * CAMERA_MS);
    let seen = session.stats().samples_processed;
    assert!(seen > 0);

    session.set_visible(false).unwrap();
    assert!(session.frame(5 * CAMERA_MS * MS).is_none());
    assert_eq!(session.stats().samples_processed, seen);
    assert!(!session.status().camera_running);

    session.set_visible(true).unwrap();
    session.frame(10 * CAMERA_MS * MS);
    assert!(session.stats().samples_processed > seen);
}

#[test]
fn test_mouse_and_wheel_share_the_render_targets() {
    let mut session = ViewerSession::default();
    session.load_model(1.0);

    session.mouse_down(100.0, 100.0);
    session.mouse_move(150.0, 100.0);
    assert!(session.render().is_interacting());
    session.mouse_up();

    session.wheel(-500.0, 0);
    assert!(session.render().state().target_scale > 1.0);

    assert!(session.key_press('i', 10 * MS));
    run_until(&mut session, 16, 400);
    assert!(!session.render().is_interacting());
}

#[test]
fn test_wheel_release_does_not_end_a_held_pinch() {
    use lorbital_gesture_model::gesture::GestureSample;

    let mut tuning = ViewerTuning::default();
    tuning.render.auto_rotate = true;
    let mut session = ViewerSession::new(tuning);
    session.load_model(1.0);
    let held = GestureSample::single(1, Point2D::new(0.5, 0.5), 0.02);

    session.process_sample(&held, 0);
    session.wheel(-100.0, 0);
    let before = session.render().state().target_orientation;

    let mut t = 0;
    while t <= 300 {
        session.process_sample(&held, t * MS);
        session.frame(t * MS);
        t += DISPLAY_MS;
    }

    assert_eq!(session.gestures().state(), GestureState::SingleHandPinch);
    assert!(session.render().is_interacting());
    assert_eq!(
        session.render().state().target_orientation,
        before,
        "auto-rotation must stay paused while the pinch is held"
    );
    assert!(session.render().state().target_scale > 1.0);
}

#[test]
fn test_status_serializes() {
    let session = ViewerSession::default();
    let json = serde_json::to_value(session.status()).unwrap();
    assert_eq!(json["visible"], true);
    assert_eq!(json["gesture"]["state"], "none");
}

mod mixed_input {
    use super::*;
    use lorbital_gesture_model::gesture::GestureSample;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Event {
        Pinch(f64, f64),
        TwoHand(f64),
        Release,
        Wheel(f64),
        Drag(f64, f64),
    }

    fn event() -> impl Strategy<Value = Event> {
        prop_oneof![
            (0.0..1.0f64, 0.0..1.0f64).prop_map(|(x, y)| Event::Pinch(x, y)),
            (0.0..0.5f64).prop_map(Event::TwoHand),
            Just(Event::Release),
            (-2000.0..2000.0f64).prop_map(Event::Wheel),
            (-300.0..300.0f64, -300.0..300.0f64).prop_map(|(x, y)| Event::Drag(x, y)),
        ]
    }

    proptest! {
        #[test]
        fn prop_every_frame_is_well_formed(events in prop::collection::vec(event(), 1..120)) {
            let mut session = ViewerSession::default();
            let min = session.tuning().render.min_scale;
            let max = session.tuning().render.max_scale;

            for (i, event) in events.into_iter().enumerate() {
                let now = i as u64 * CAMERA_MS * MS;
                match event {
                    Event::Pinch(x, y) => {
                        let sample = GestureSample::single(1, Point2D::new(x, y), 0.02);
                        session.process_sample(&sample, now)
                    }
                    Event::TwoHand(half) => session.process_sample(
                        &GestureSample::two_hand(
                            Point2D::new(0.5 - half, 0.5),
                            Point2D::new(0.5 + half, 0.5),
                            0.02,
                            0.02,
                        ),
                        now,
                    ),
                    Event::Release => session.process_sample(&GestureSample::none(0), now),
                    Event::Wheel(delta) => session.wheel(delta, now),
                    Event::Drag(dx, dy) => {
                        session.mouse_down(0.0, 0.0);
                        session.mouse_move(dx, dy);
                        session.mouse_up();
                    }
                }

                let frame = session.frame(now).unwrap();
                prop_assert!((frame.orientation.length() - 1.0).abs() < 1e-9);
                prop_assert!(frame.scale >= min && frame.scale <= max);
                let state = session.render().state();
                prop_assert!(state.target_scale >= min && state.target_scale <= max);
            }
        }
    }
}
