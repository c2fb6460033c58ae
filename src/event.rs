//! Engine output handling - no I/O, fully testable.
//!
//! Bridges [`FrameOutcome`]s to the side effects the manager performs:
//! which swipe action to run and which cursor delta to actuate.

use std::collections::HashMap;

use crate::config::GestureConfig;
use crate::cursor::CursorDelta;
use crate::engine::{FrameOutcome, GestureEngine};
use crate::landmark::Landmark;
use crate::swipe::SwipeDirection;

/// A side effect requested by one processed frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Reaction {
    Swipe(SwipeDirection),
    MoveCursor(CursorDelta),
}

/// Turn a frame outcome into the reactions it calls for, swipe first.
pub fn reactions(outcome: &FrameOutcome) -> Vec<Reaction> {
    outcome
        .swipe
        .map(Reaction::Swipe)
        .into_iter()
        .chain(outcome.cursor_delta.map(Reaction::MoveCursor))
        .collect()
}

/// Feed a sequence of raw frames into an engine and collect the reactions.
/// Incomplete frames contribute nothing.
pub fn process_frames(engine: &mut GestureEngine, frames: &[Vec<Landmark>]) -> Vec<Reaction> {
    frames
        .iter()
        .filter_map(|frame| engine.process_frame(frame))
        .flat_map(|outcome| reactions(&outcome))
        .collect()
}

/// Look up the action string for a swipe in the gesture config.
///
/// Returns `Some(action)` if the gesture is configured, enabled, and has an action.
pub fn resolve_action(
    direction: SwipeDirection,
    gestures: &HashMap<String, GestureConfig>,
) -> Option<&str> {
    let gesture_name: &str = direction.into();
    gestures
        .get(gesture_name)
        .filter(|gc| gc.enabled)
        .and_then(|gc| gc.action.as_deref())
}
