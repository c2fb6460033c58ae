//! Thumb/index touch detection.

use crate::landmark::{HandLandmark, ScreenPoint, joint};

/// Per-frame pinch predicate. No hysteresis: every frame is judged on its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchDetector {
    pub touch_threshold: f64,
}

impl PinchDetector {
    pub fn new(touch_threshold: f64) -> Self {
        Self { touch_threshold }
    }

    /// `true` iff thumb tip and index tip are strictly closer than the threshold.
    /// Incomplete skeletons never pinch.
    pub fn is_pinching(&self, points: &[ScreenPoint]) -> bool {
        let (Some(thumb), Some(index)) = (
            joint(points, HandLandmark::ThumbTip),
            joint(points, HandLandmark::IndexTip),
        ) else {
            return false;
        };
        thumb.distance_to(&index) < self.touch_threshold
    }
}
