//! Hand landmark frames as delivered by the tracker.
//!
//! Recordings are stored as JSONL: an optional `# {header}` comment line
//! followed by one [`LandmarkFrame`] per line, so a crashed recording is still
//! readable up to its last complete line.

use serde::{Deserialize, Serialize};

use crate::geometry::Point2D;

/// Monotonic timestamp in nanoseconds since the session started.
pub type TimestampNs = u64;

/// Landmark index of the thumb tip.
pub const THUMB_TIP: usize = 4;

/// Landmark index of the index fingertip. Used as the "palm" reference point.
pub const INDEX_TIP: usize = 8;

/// Number of landmarks the tracker reports per hand.
pub const LANDMARKS_PER_HAND: usize = 21;

/// One landmark, normalized to the camera image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    /// Relative depth. Not used for classification.
    #[serde(default)]
    pub z: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub fn point(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }
}

/// All landmarks of one detected hand, indexed by the tracker's fixed layout.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandLandmarks {
    pub points: Vec<Landmark>,
}

impl HandLandmarks {
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    /// A synthetic hand whose index tip sits at `index_tip` with the thumb tip
    /// `pinch_distance` to its right. The remaining joints are laid out below
    /// the fingertips so the hand looks plausible when drawn.
    pub fn pinching_at(index_tip: Point2D, pinch_distance: f64) -> Self {
        let mut points: Vec<Landmark> = (0..LANDMARKS_PER_HAND)
            .map(|i| {
                let drop = 0.01 * (LANDMARKS_PER_HAND - i) as f64;
                Landmark::new(index_tip.x, index_tip.y + drop)
            })
            .collect();
        points[INDEX_TIP] = Landmark::new(index_tip.x, index_tip.y);
        points[THUMB_TIP] = Landmark::new(index_tip.x + pinch_distance, index_tip.y);
        Self { points }
    }

    /// Landmark at `index`, or `None` if it is missing or not finite.
    pub fn point(&self, index: usize) -> Option<Point2D> {
        self.points
            .get(index)
            .map(Landmark::point)
            .filter(Point2D::is_finite)
    }

    pub fn thumb_tip(&self) -> Option<Point2D> {
        self.point(THUMB_TIP)
    }

    pub fn index_tip(&self) -> Option<Point2D> {
        self.point(INDEX_TIP)
    }

    /// Thumb-tip to index-tip distance, if both landmarks are usable.
    pub fn pinch_distance(&self) -> Option<f64> {
        Some(self.thumb_tip()?.distance_to(&self.index_tip()?))
    }

    /// Whether this hand carries the landmarks needed for classification.
    pub fn is_usable(&self) -> bool {
        self.pinch_distance().is_some()
    }
}

/// Everything the tracker reported for one camera frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    /// Monotonic nanoseconds since session start.
    #[serde(rename = "t")]
    pub timestamp_ns: TimestampNs,

    /// Zero or more hands. The tracker is configured for at most two.
    #[serde(default)]
    pub hands: Vec<HandLandmarks>,
}

impl LandmarkFrame {
    pub fn new(timestamp_ns: TimestampNs, hands: Vec<HandLandmarks>) -> Self {
        Self {
            timestamp_ns,
            hands,
        }
    }

    /// A frame in which no hand was detected.
    pub fn empty(timestamp_ns: TimestampNs) -> Self {
        Self::new(timestamp_ns, Vec::new())
    }

    /// Timestamp as fractional milliseconds.
    pub fn timestamp_ms(&self) -> f64 {
        self.timestamp_ns as f64 / 1_000_000.0
    }
}

/// Metadata written as the first (comment) line of a recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkStreamHeader {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// Name of the landmark source that produced the stream.
    pub source: String,

    /// Wall-clock time at recording start (RFC 3339).
    pub recorded_at: String,

    /// Camera image size in pixels.
    pub image_width: u32,
    pub image_height: u32,

    /// Nominal camera frame rate. The real callback rate varies.
    pub nominal_fps: u32,
}

impl LandmarkStreamHeader {
    pub fn new(source: impl Into<String>, image_width: u32, image_height: u32) -> Self {
        Self {
            schema_version: "1.0".to_string(),
            source: source.into(),
            recorded_at: chrono::Utc::now().to_rfc3339(),
            image_width,
            image_height,
            nominal_fps: 30,
        }
    }
}

/// Parse frames from JSONL content (one JSON object per line).
pub fn parse_frames(jsonl: &str) -> Result<Vec<LandmarkFrame>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Parse the header comment line, if the content starts with one.
pub fn parse_header(jsonl: &str) -> Option<Result<LandmarkStreamHeader, serde_json::Error>> {
    let first = jsonl.lines().map(str::trim).find(|line| !line.is_empty())?;
    let body = first.strip_prefix('#')?;
    Some(serde_json::from_str(body.trim()))
}

/// Serialize frames to JSONL format.
pub fn serialize_frames(frames: &[LandmarkFrame]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for frame in frames {
        output.push_str(&serde_json::to_string(frame)?);
        output.push('\n');
    }
    Ok(output)
}
