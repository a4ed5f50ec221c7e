//! Classified gesture samples.

use serde::{Deserialize, Serialize};

use crate::geometry::Point2D;

/// Discrete gesture recognized in one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureState {
    /// No pinching hand.
    #[default]
    None,
    /// Exactly one hand pinching: rotates the model.
    SingleHandPinch,
    /// Both hands pinching: zooms the model.
    TwoHandPinch,
}

/// Geometry attached to a pinch gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GestureData {
    SingleHand {
        /// Index fingertip of the pinching hand.
        palm: Point2D,
        /// Thumb-to-index distance of the pinching hand.
        pinch_dist: f64,
    },
    TwoHand {
        hand1_palm: Point2D,
        hand2_palm: Point2D,
        /// Distance between the two index fingertips (zoom reference).
        distance: f64,
        pinch1: f64,
        pinch2: f64,
    },
}

impl GestureData {
    pub fn state(&self) -> GestureState {
        match self {
            GestureData::SingleHand { .. } => GestureState::SingleHandPinch,
            GestureData::TwoHand { .. } => GestureState::TwoHandPinch,
        }
    }
}

/// Output of the classifier for one frame.
///
/// The state is derived from `data`, so "no data" and `GestureState::None`
/// cannot disagree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureSample {
    /// Number of usable hands seen in the frame.
    pub hand_count: usize,
    pub data: Option<GestureData>,
}

impl GestureSample {
    pub fn none(hand_count: usize) -> Self {
        Self {
            hand_count,
            data: None,
        }
    }

    pub fn single(hand_count: usize, palm: Point2D, pinch_dist: f64) -> Self {
        Self {
            hand_count,
            data: Some(GestureData::SingleHand { palm, pinch_dist }),
        }
    }

    pub fn two_hand(hand1_palm: Point2D, hand2_palm: Point2D, pinch1: f64, pinch2: f64) -> Self {
        Self {
            hand_count: 2,
            data: Some(GestureData::TwoHand {
                hand1_palm,
                hand2_palm,
                distance: hand1_palm.distance_to(&hand2_palm),
                pinch1,
                pinch2,
            }),
        }
    }

    pub fn state(&self) -> GestureState {
        self.data
            .as_ref()
            .map(GestureData::state)
            .unwrap_or(GestureState::None)
    }

    /// Palm of a single-hand sample.
    pub fn palm(&self) -> Option<Point2D> {
        match self.data {
            Some(GestureData::SingleHand { palm, .. }) => Some(palm),
            _ => None,
        }
    }

    /// Fingertip distance of a two-hand sample.
    pub fn two_hand_distance(&self) -> Option<f64> {
        match self.data {
            Some(GestureData::TwoHand { distance, .. }) => Some(distance),
            _ => None,
        }
    }
}
