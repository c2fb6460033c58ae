//! Per-frame orchestration of mapping, pinch, swipe and cursor logic.
//!
//! The engine is single-writer: callers feed frames one at a time and read
//! the published [`GestureState`] between frames.

use std::time::Instant;

use log::trace;

use crate::config::{MappingConfig, Thresholds};
use crate::cursor::{CursorController, CursorDelta};
use crate::landmark::{Landmark, LandmarkFrame, ScreenPoint};
use crate::mapper::CoordinateMapper;
use crate::pinch::PinchDetector;
use crate::swipe::{SwipeDetector, SwipeDirection, SwipeState};

/// State published for renderers and indicators.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GestureState {
    /// Mapped points of the latest accepted frame, for overlay drawing.
    pub points: Vec<ScreenPoint>,
    pub pinching: bool,
    /// Sticky until taken or overwritten by the next swipe.
    pub direction: Option<SwipeDirection>,
    /// Delta produced by the latest accepted frame only.
    pub cursor_delta: Option<CursorDelta>,
}

/// What a single accepted frame produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutcome {
    pub pinching: bool,
    pub swipe: Option<SwipeDirection>,
    pub cursor_delta: Option<CursorDelta>,
}

pub struct GestureEngine {
    mapper: CoordinateMapper,
    pinch: PinchDetector,
    swipe: SwipeDetector,
    cursor: CursorController,
    state: GestureState,
}

impl GestureEngine {
    pub fn new(mapping: &MappingConfig, thresholds: &Thresholds) -> Self {
        Self {
            mapper: CoordinateMapper::from_config(mapping),
            pinch: PinchDetector::new(thresholds.touch_threshold),
            swipe: SwipeDetector::from_thresholds(thresholds),
            cursor: CursorController::from_thresholds(thresholds),
            state: GestureState::default(),
        }
    }

    /// Process a frame stamped with the current instant.
    pub fn process_frame(&mut self, landmarks: &[Landmark]) -> Option<FrameOutcome> {
        self.process_frame_at(landmarks, Instant::now())
    }

    /// Process a frame stamped with `now`.
    ///
    /// Returns `None` and leaves every bit of state untouched when the frame
    /// does not hold a complete skeleton.
    pub fn process_frame_at(&mut self, landmarks: &[Landmark], now: Instant) -> Option<FrameOutcome> {
        let Some(frame) = LandmarkFrame::from_points(landmarks) else {
            trace!("Discarding frame with {} points", landmarks.len());
            return None;
        };

        let points = self.mapper.map_frame(&frame);
        let pinching = self.pinch.is_pinching(&points);
        let swipe = self.swipe.update(pinching, &points, now);
        let cursor_delta = self.cursor.update(pinching, &points);

        if swipe.is_some() {
            self.state.direction = swipe;
        }
        self.state.points = points;
        self.state.pinching = pinching;
        self.state.cursor_delta = cursor_delta;

        Some(FrameOutcome {
            pinching,
            swipe,
            cursor_delta,
        })
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    /// Consume the sticky swipe direction.
    pub fn take_direction(&mut self) -> Option<SwipeDirection> {
        self.state.direction.take()
    }

    pub fn swipe_state(&self) -> &SwipeState {
        self.swipe.state()
    }

    pub fn cursor_active(&self) -> bool {
        self.cursor.is_active()
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    /// Return to the freshly constructed state.
    pub fn reset(&mut self) {
        self.swipe.reset();
        self.cursor.reset();
        self.state = GestureState::default();
    }
}
