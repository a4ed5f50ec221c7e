//! Replay a landmark recording through a viewer session.
//!
//! Time is simulated: the render loop ticks at a fixed rate of recording
//! time, so a replay is deterministic. With `--realtime` the loop follows
//! the monotonic clock instead.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use glam::EulerRot;
use serde::Serialize;

use lorbital_common::clock::{ms_to_ns, ns_to_ms, FramePacer, MonotonicClock};
use lorbital_common::config::AppConfig;
use lorbital_gesture_model::gesture::GestureState;
use lorbital_hand_tracker::{HandTracker, ReplaySource};
use lorbital_viewer::{ViewerSession, ViewerStatus};

pub struct ReplayOptions {
    pub tuning: Option<PathBuf>,
    pub fps: u32,
    pub settle_ms: u64,
    pub realtime: bool,
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct Transition {
    at_ms: f64,
    state: GestureState,
}

#[derive(Debug, Serialize)]
struct ReplayReport {
    recording: PathBuf,
    duration_ms: f64,
    yaw_deg: f64,
    pitch_deg: f64,
    roll_deg: f64,
    scale: f64,
    transitions: Vec<Transition>,
    status: ViewerStatus,
}

pub async fn run(
    recording: PathBuf,
    app_config: &AppConfig,
    options: ReplayOptions,
) -> anyhow::Result<()> {
    let tuning = super::resolve_tuning(app_config, options.tuning.as_deref())?;

    let mut session = ViewerSession::new(tuning);
    session
        .attach_tracker(HandTracker::new(Box::new(ReplaySource::new(&recording))))
        .with_context(|| format!("Failed to open recording {}", recording.display()))?;
    session.load_model(tuning.render.initial_scale);

    let mut pacer = FramePacer::new(options.fps);
    let interval_ns = pacer.interval_ns();
    let settle_ns = ms_to_ns(options.settle_ms as f64);
    let mut ticker = tokio::time::interval(Duration::from_nanos(interval_ns));
    let clock = MonotonicClock::start();
    if options.realtime {
        tracing::info!(
            started_at = clock.epoch_wall(),
            fps = options.fps,
            "Replaying in real time"
        );
    }

    let mut now_ns = 0u64;
    let mut drained_at: Option<u64> = None;
    let mut last_state = session.gestures().state();
    let mut transitions = Vec::new();
    let mut last_frame = None;

    loop {
        if options.realtime {
            ticker.tick().await;
            now_ns = clock.now_ns();
        }

        for due in pacer.due_frames(now_ns) {
            if let Some(frame) = session.frame(due) {
                last_frame = Some(frame);
            }
            let state = session.gestures().state();
            if state != last_state {
                tracing::debug!(at_ms = ns_to_ms(due), ?state, "Gesture transition");
                transitions.push(Transition {
                    at_ms: ns_to_ms(due),
                    state,
                });
                last_state = state;
            }
        }

        let exhausted = session.tracker().map_or(true, HandTracker::is_exhausted);
        if exhausted {
            let since = *drained_at.get_or_insert(now_ns);
            if now_ns - since >= settle_ns {
                break;
            }
        }
        if !options.realtime {
            now_ns += interval_ns;
        }
    }

    let status = session.status();
    let (orientation, scale) = match last_frame {
        Some(frame) => (frame.orientation, frame.scale),
        None => (status.render.current_orientation, status.render.current_scale),
    };
    let (yaw, pitch, roll) = orientation.to_euler(EulerRot::YXZ);

    let report = ReplayReport {
        recording,
        duration_ms: ns_to_ms(now_ns),
        yaw_deg: yaw.to_degrees(),
        pitch_deg: pitch.to_degrees(),
        roll_deg: roll.to_degrees(),
        scale,
        transitions,
        status,
    };
    session.teardown();

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Replayed {}", report.recording.display());
    println!("  Simulated time: {:.0} ms", report.duration_ms);
    println!("  Frames rendered: {}", report.status.stats.frames_rendered);
    println!("  Samples processed: {}", report.status.stats.samples_processed);
    if report.status.stats.tracker_errors > 0 {
        println!("  Tracker errors: {}", report.status.stats.tracker_errors);
    }
    println!();

    println!("Gesture transitions:");
    if report.transitions.is_empty() {
        println!("  (none)");
    }
    for t in &report.transitions {
        println!("  {:>8.1} ms  {:?}", t.at_ms, t.state);
    }
    println!();

    println!("Final transform:");
    println!(
        "  Yaw {:.1}°  Pitch {:.1}°  Roll {:.1}°",
        report.yaw_deg, report.pitch_deg, report.roll_deg
    );
    println!("  Scale: {:.4}", report.scale);

    Ok(())
}
