//! Write synthetic landmark recordings.

use std::path::PathBuf;

use anyhow::Context;
use clap::ValueEnum;

use lorbital_gesture_model::geometry::Point2D;
use lorbital_gesture_model::landmark::{HandLandmarks, LandmarkFrame, LandmarkStreamHeader};
use lorbital_hand_tracker::LandmarkWriter;

const PINCHED: f64 = 0.02;
const OPEN: f64 = 0.15;
const RELEASE_FRAMES: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Pattern {
    /// One hand pinches and sweeps right to left
    Drag,
    /// Two pinching hands move apart
    Zoom,
    /// A drag with periodic tracking dropouts
    Flicker,
}

impl Pattern {
    fn label(self) -> &'static str {
        match self {
            Pattern::Drag => "drag",
            Pattern::Zoom => "zoom",
            Pattern::Flicker => "flicker",
        }
    }

    /// Hands for pinching frame `i` of `n`.
    fn hands(self, i: u32, n: u32) -> Vec<HandLandmarks> {
        let progress = f64::from(i) / f64::from(n.max(2) - 1);
        match self {
            Pattern::Drag => vec![sweep(progress, PINCHED)],
            Pattern::Flicker if i % 5 == 4 => Vec::new(),
            Pattern::Flicker => vec![sweep(progress, PINCHED)],
            Pattern::Zoom => spread(progress, PINCHED),
        }
    }

    /// Hands once the pinch has been let go.
    fn released(self) -> Vec<HandLandmarks> {
        match self {
            Pattern::Drag | Pattern::Flicker => vec![sweep(1.0, OPEN)],
            Pattern::Zoom => spread(1.0, OPEN),
        }
    }
}

fn sweep(progress: f64, pinch: f64) -> HandLandmarks {
    let x = 0.65 - 0.3 * progress;
    let y = 0.5 + 0.05 * (progress * std::f64::consts::PI).sin();
    HandLandmarks::pinching_at(Point2D::new(x, y), pinch)
}

fn spread(progress: f64, pinch: f64) -> Vec<HandLandmarks> {
    let half = 0.1 + 0.2 * progress;
    vec![
        HandLandmarks::pinching_at(Point2D::new(0.5 - half, 0.5), pinch),
        HandLandmarks::pinching_at(Point2D::new(0.5 + half, 0.5), pinch),
    ]
}

pub fn run(out: PathBuf, pattern: Pattern, fps: u32, frames: u32) -> anyhow::Result<()> {
    let interval_ns = 1_000_000_000 / u64::from(fps.max(1));
    let mut header = LandmarkStreamHeader::new(format!("synth-{}", pattern.label()), 1280, 720);
    header.nominal_fps = fps;
    let mut writer = LandmarkWriter::create(&out, &header)
        .with_context(|| format!("Failed to create {}", out.display()))?;

    let pinching = (0..frames).map(|i| pattern.hands(i, frames));
    let released = (0..RELEASE_FRAMES).map(|_| pattern.released());
    for (i, hands) in pinching.chain(released).enumerate() {
        writer.write_frame(&LandmarkFrame::new(i as u64 * interval_ns, hands))?;
    }
    writer.flush()?;

    println!(
        "Wrote {} frames ({} pattern, {fps} fps) to {}",
        writer.frames_written(),
        pattern.label(),
        writer.path().display()
    );
    Ok(())
}
