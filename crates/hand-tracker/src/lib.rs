//! Lorbital Hand Tracker
//!
//! Owns the camera-side end of the pipeline: a pluggable [`LandmarkSource`]
//! behind a [`HandTracker`] session that can be started and stopped any
//! number of times (camera toggle, page visibility) without side effects
//! when it is already in the requested state.
//!
//! Sources shipped here:
//!
//! - **Replay:** a JSONL landmark recording played back in recording time
//! - **Scripted:** in-memory frames for tests and demos
//!
//! The landmark-detection model itself is an external capability; a live
//! camera source implements the same trait.

pub mod sources;
pub mod writer;

use lorbital_common::error::{LorbitalError, LorbitalResult};
use lorbital_gesture_model::landmark::{LandmarkFrame, TimestampNs};

pub use sources::{ReplaySource, ScriptedSource};
pub use writer::LandmarkWriter;

/// A producer of hand landmark frames.
pub trait LandmarkSource: Send {
    /// Load models, open devices. Failure here is the one hard error the
    /// tracking pipeline reports.
    fn init(&mut self) -> LorbitalResult<()>;

    /// Begin producing frames.
    fn start(&mut self) -> LorbitalResult<()>;

    /// Stop producing frames and release the device.
    fn stop(&mut self);

    /// Next frame available at `now_ns`, if any.
    fn poll(&mut self, now_ns: TimestampNs) -> LorbitalResult<Option<LandmarkFrame>>;

    /// Source name for logging.
    fn name(&self) -> &str;

    /// Whether the source has no frames left to deliver. Live sources never
    /// run dry.
    fn is_exhausted(&self) -> bool {
        false
    }
}

/// Lifecycle of a [`HandTracker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    /// Source not initialized yet.
    Uninitialized,
    /// Initialized, camera off.
    Stopped,
    /// Delivering frames.
    Running,
}

/// A tracking session around one landmark source.
pub struct HandTracker {
    source: Box<dyn LandmarkSource>,
    state: TrackerState,
    frames_delivered: u64,
}

impl HandTracker {
    pub fn new(source: Box<dyn LandmarkSource>) -> Self {
        Self {
            source,
            state: TrackerState::Uninitialized,
            frames_delivered: 0,
        }
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TrackerState::Running
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub fn frames_delivered(&self) -> u64 {
        self.frames_delivered
    }

    pub fn is_exhausted(&self) -> bool {
        self.source.is_exhausted()
    }

    /// Initialize the source. Calling it again after success is a no-op.
    pub fn init(&mut self) -> LorbitalResult<()> {
        if self.state != TrackerState::Uninitialized {
            return Ok(());
        }

        self.source.init().map_err(|e| {
            tracing::error!(source = self.source.name(), error = %e, "Hand tracker init failed");
            e
        })?;
        self.state = TrackerState::Stopped;
        tracing::info!(source = self.source.name(), "Hand tracker initialized");
        Ok(())
    }

    /// Start delivering frames. A no-op if already running.
    pub fn start(&mut self) -> LorbitalResult<()> {
        match self.state {
            TrackerState::Running => Ok(()),
            TrackerState::Uninitialized => Err(LorbitalError::tracker(format!(
                "cannot start {} before init",
                self.source.name()
            ))),
            TrackerState::Stopped => {
                self.source.start()?;
                self.state = TrackerState::Running;
                tracing::info!(source = self.source.name(), "Hand tracker started");
                Ok(())
            }
        }
    }

    /// Stop delivering frames. A no-op unless running.
    pub fn stop(&mut self) {
        if self.state != TrackerState::Running {
            return;
        }
        self.source.stop();
        self.state = TrackerState::Stopped;
        tracing::info!(
            source = self.source.name(),
            frames = self.frames_delivered,
            "Hand tracker stopped"
        );
    }

    /// Next frame due at `now_ns`. Always `None` while not running.
    pub fn poll(&mut self, now_ns: TimestampNs) -> LorbitalResult<Option<LandmarkFrame>> {
        if self.state != TrackerState::Running {
            return Ok(None);
        }
        let frame = self.source.poll(now_ns)?;
        if frame.is_some() {
            self.frames_delivered += 1;
        }
        Ok(frame)
    }

    /// Every frame due at `now_ns`, oldest first.
    pub fn drain(&mut self, now_ns: TimestampNs) -> LorbitalResult<Vec<LandmarkFrame>> {
        let mut frames = Vec::new();
        while let Some(frame) = self.poll(now_ns)? {
            frames.push(frame);
        }
        Ok(frames)
    }
}

impl std::fmt::Debug for HandTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandTracker")
            .field("source", &self.source.name())
            .field("state", &self.state)
            .field("frames_delivered", &self.frames_delivered)
            .finish()
    }
}
