//! Landmark-to-gesture classification.
//!
//! A hand "pinches" when its thumb tip and index tip are closer than a
//! threshold. Two pinching hands are checked before falling back to a single
//! pinching hand, so a two-hand zoom is never read as a one-hand rotation
//! just because the richer gesture also contains a single pinch.

use serde::{Deserialize, Serialize};

use lorbital_gesture_model::geometry::Point2D;
use lorbital_gesture_model::gesture::GestureSample;
use lorbital_gesture_model::landmark::{HandLandmarks, LandmarkFrame};

/// Pinch thresholds, in normalized image units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// A lone hand pinches below this distance.
    pub pinch_threshold: f64,

    /// Both hands must be below this distance for a two-hand pinch.
    pub two_hand_pinch_threshold: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            pinch_threshold: 0.06,
            two_hand_pinch_threshold: 0.06,
        }
    }
}

/// A usable hand reduced to what classification needs.
#[derive(Debug, Clone, Copy)]
struct PinchReading {
    tip: Point2D,
    pinch: f64,
}

impl PinchReading {
    fn from_hand(hand: &HandLandmarks) -> Option<Self> {
        Some(Self {
            tip: hand.index_tip()?,
            pinch: hand.pinch_distance()?,
        })
    }
}

/// Stateless gesture classifier.
#[derive(Debug, Clone, Default)]
pub struct GestureClassifier {
    config: ClassifierConfig,
}

impl GestureClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify a tracker frame.
    pub fn classify_frame(&self, frame: &LandmarkFrame) -> GestureSample {
        self.classify(&frame.hands)
    }

    /// Classify the hands of one frame.
    ///
    /// Hands missing the thumb or index tip (or carrying non-finite values)
    /// are ignored. Only the first two usable hands count.
    pub fn classify(&self, hands: &[HandLandmarks]) -> GestureSample {
        let readings: Vec<PinchReading> = hands
            .iter()
            .filter_map(PinchReading::from_hand)
            .take(2)
            .collect();

        match readings.as_slice() {
            [] => GestureSample::none(0),
            [only] => {
                if only.pinch < self.config.pinch_threshold {
                    GestureSample::single(1, only.tip, only.pinch)
                } else {
                    GestureSample::none(1)
                }
            }
            [first, second, ..] => self.classify_pair(first, second),
        }
    }

    fn classify_pair(&self, first: &PinchReading, second: &PinchReading) -> GestureSample {
        let two_hand = self.config.two_hand_pinch_threshold;
        if first.pinch < two_hand && second.pinch < two_hand {
            return GestureSample::two_hand(first.tip, second.tip, first.pinch, second.pinch);
        }

        let single = self.config.pinch_threshold;
        match (first.pinch < single, second.pinch < single) {
            (true, false) => GestureSample::single(2, first.tip, first.pinch),
            (false, true) => GestureSample::single(2, second.tip, second.pinch),
            // Both below the single-hand threshold but not the two-hand one:
            // neither reading wins, so report nothing rather than guess.
            _ => GestureSample::none(2),
        }
    }
}
