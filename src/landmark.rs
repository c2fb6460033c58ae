//! Hand skeleton data model shared by the mapper, detectors and engine.

use serde::Deserialize;
use strum::{Display, EnumCount, IntoStaticStr};

/// Skeleton joints in the detector's fixed index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumCount, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[repr(usize)]
pub enum HandLandmark {
    Wrist = 0,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

impl HandLandmark {
    /// Position of this joint inside a [`LandmarkFrame`].
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Number of points in a complete hand skeleton.
pub const LANDMARK_COUNT: usize = HandLandmark::COUNT;

/// Fingertips whose x positions drive swipe classification.
pub const SWIPE_FINGERTIPS: [HandLandmark; 3] = [
    HandLandmark::IndexTip,
    HandLandmark::MiddleTip,
    HandLandmark::RingTip,
];

/// One normalized detector keypoint. Extra fields such as `z` are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
}

impl Landmark {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A complete 21-point hand skeleton.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkFrame {
    points: [Landmark; LANDMARK_COUNT],
}

impl LandmarkFrame {
    /// Build a frame from raw detector output.
    ///
    /// Returns `None` when fewer than [`LANDMARK_COUNT`] points are present.
    /// Points beyond the first skeleton are dropped.
    pub fn from_points(points: &[Landmark]) -> Option<Self> {
        let points: [Landmark; LANDMARK_COUNT] =
            points.get(..LANDMARK_COUNT)?.try_into().ok()?;
        Some(Self { points })
    }

    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    pub fn get(&self, landmark: HandLandmark) -> Landmark {
        self.points[landmark.index()]
    }
}

/// A point in target viewport units.
///
/// Only [`crate::mapper::CoordinateMapper`] creates these.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    x: f64,
    y: f64,
}

impl ScreenPoint {
    pub(crate) const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub const fn x(&self) -> f64 {
        self.x
    }

    pub const fn y(&self) -> f64 {
        self.y
    }

    pub fn distance_to(&self, other: &ScreenPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Look up a joint in a mapped skeleton; `None` if the slice is too short.
pub(crate) fn joint(points: &[ScreenPoint], landmark: HandLandmark) -> Option<ScreenPoint> {
    if points.len() < LANDMARK_COUNT {
        return None;
    }
    points.get(landmark.index()).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingertip_indices_match_detector_layout() {
        assert_eq!(HandLandmark::ThumbTip.index(), 4);
        assert_eq!(HandLandmark::IndexTip.index(), 8);
        assert_eq!(HandLandmark::MiddleTip.index(), 12);
        assert_eq!(HandLandmark::RingTip.index(), 16);
        assert_eq!(HandLandmark::PinkyTip.index(), 20);
        assert_eq!(LANDMARK_COUNT, 21);
    }

    #[test]
    fn short_frame_is_rejected() {
        let points = vec![Landmark::new(0.5, 0.5); 20];
        assert!(LandmarkFrame::from_points(&points).is_none());
    }

    #[test]
    fn long_frame_keeps_first_skeleton() {
        let mut points = vec![Landmark::new(0.1, 0.1); 21];
        points.extend(vec![Landmark::new(0.9, 0.9); 21]);
        let frame = LandmarkFrame::from_points(&points).unwrap();
        assert_eq!(frame.points().len(), 21);
        assert_eq!(frame.get(HandLandmark::PinkyTip), Landmark::new(0.1, 0.1));
    }

    #[test]
    fn joint_lookup_requires_full_skeleton() {
        let points = vec![ScreenPoint::new(1.0, 2.0); 10];
        assert!(joint(&points, HandLandmark::ThumbTip).is_none());
    }

    #[test]
    fn landmark_names() {
        let name: &str = HandLandmark::IndexTip.into();
        assert_eq!(name, "index_tip");
        assert_eq!(HandLandmark::ThumbCmc.to_string(), "thumb_cmc");
    }
}
