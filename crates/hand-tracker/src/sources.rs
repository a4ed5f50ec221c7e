//! Landmark source implementations.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use lorbital_common::error::{LorbitalError, LorbitalResult};
use lorbital_gesture_model::landmark::{
    parse_frames, parse_header, LandmarkFrame, LandmarkStreamHeader, TimestampNs,
};

use crate::LandmarkSource;

/// Plays back a JSONL landmark recording in recording time.
///
/// The first poll after each `start` anchors the recording to the caller's
/// clock; frames are then released when as much time has passed as separates
/// them in the recording, and are re-stamped onto the caller's clock. A
/// stop/start pause therefore resumes where playback left off.
#[derive(Debug)]
pub struct ReplaySource {
    path: PathBuf,
    header: Option<LandmarkStreamHeader>,
    frames: VecDeque<LandmarkFrame>,
    /// (caller time, recording time) pair playback is measured from.
    anchor: Option<(TimestampNs, TimestampNs)>,
}

impl ReplaySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            header: None,
            frames: VecDeque::new(),
            anchor: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Header of the loaded recording, if it had one.
    pub fn header(&self) -> Option<&LandmarkStreamHeader> {
        self.header.as_ref()
    }

    /// Frames not yet delivered.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl LandmarkSource for ReplaySource {
    fn init(&mut self) -> LorbitalResult<()> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            LorbitalError::tracker_init(format!("cannot read {}: {e}", self.path.display()))
        })?;

        self.header = match parse_header(&content) {
            Some(Ok(header)) => Some(header),
            Some(Err(e)) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Ignoring unreadable recording header"
                );
                None
            }
            None => None,
        };

        let frames = parse_frames(&content).map_err(|e| {
            LorbitalError::tracker_init(format!("invalid recording {}: {e}", self.path.display()))
        })?;

        let unusable = frames
            .iter()
            .flat_map(|frame| &frame.hands)
            .filter(|hand| !hand.is_usable())
            .count();
        if unusable > 0 {
            tracing::warn!(
                path = %self.path.display(),
                hands = unusable,
                "Recording contains hands without usable fingertips; they will be ignored"
            );
        }

        tracing::info!(
            path = %self.path.display(),
            frames = frames.len(),
            source = self.header.as_ref().map(|h| h.source.as_str()).unwrap_or("unknown"),
            "Loaded landmark recording"
        );
        self.frames = frames.into();
        Ok(())
    }

    fn start(&mut self) -> LorbitalResult<()> {
        self.anchor = None;
        Ok(())
    }

    fn stop(&mut self) {
        self.anchor = None;
    }

    fn poll(&mut self, now_ns: TimestampNs) -> LorbitalResult<Option<LandmarkFrame>> {
        let Some(next) = self.frames.front() else {
            return Ok(None);
        };

        let (anchor_now, anchor_rec) = *self.anchor.get_or_insert((now_ns, next.timestamp_ns));
        let offset = next.timestamp_ns.saturating_sub(anchor_rec);
        if now_ns.saturating_sub(anchor_now) < offset {
            return Ok(None);
        }

        Ok(self.frames.pop_front().map(|mut frame| {
            frame.timestamp_ns = anchor_now + offset;
            frame
        }))
    }

    fn name(&self) -> &str {
        "replay"
    }

    fn is_exhausted(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Serves in-memory frames once the caller's clock reaches their timestamps.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    frames: VecDeque<LandmarkFrame>,
    init_error: Option<String>,
}

impl ScriptedSource {
    pub fn new(frames: Vec<LandmarkFrame>) -> Self {
        Self {
            frames: frames.into(),
            init_error: None,
        }
    }

    /// A source whose `init` fails, as a camera without a landmark model would.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            frames: VecDeque::new(),
            init_error: Some(message.into()),
        }
    }

    /// Queue another frame.
    pub fn push(&mut self, frame: LandmarkFrame) {
        self.frames.push_back(frame);
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl LandmarkSource for ScriptedSource {
    fn init(&mut self) -> LorbitalResult<()> {
        match &self.init_error {
            Some(message) => Err(LorbitalError::tracker_init(message.clone())),
            None => Ok(()),
        }
    }

    fn start(&mut self) -> LorbitalResult<()> {
        Ok(())
    }

    fn stop(&mut self) {}

    fn poll(&mut self, now_ns: TimestampNs) -> LorbitalResult<Option<LandmarkFrame>> {
        match self.frames.front() {
            Some(frame) if frame.timestamp_ns <= now_ns => Ok(self.frames.pop_front()),
            _ => Ok(None),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn is_exhausted(&self) -> bool {
        self.frames.is_empty()
    }
}
