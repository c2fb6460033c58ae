//! Pinch-held relative cursor teleoperation.

use log::debug;

use crate::config::Thresholds;
use crate::landmark::{HandLandmark, ScreenPoint, joint};

/// Relative pointer motion in scaled viewport units.
///
/// `dy` follows viewport orientation (down is positive); the actuator
/// inverts it before committing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CursorDelta {
    pub dx: f64,
    pub dy: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct CursorSession {
    last_fingertip: ScreenPoint,
    smoothed: Option<CursorDelta>,
}

/// Converts index-fingertip travel into cursor deltas while a pinch is held.
#[derive(Debug, Clone)]
pub struct CursorController {
    pub scale_factor: f64,
    /// EMA weight of the newest delta; `1.0` disables smoothing.
    pub smooth_factor: f64,
    session: Option<CursorSession>,
}

impl CursorController {
    pub fn new(scale_factor: f64, smooth_factor: f64) -> Self {
        Self {
            scale_factor,
            smooth_factor,
            session: None,
        }
    }

    pub fn from_thresholds(th: &Thresholds) -> Self {
        Self::new(th.cursor_scale, th.smooth_factor)
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn last_fingertip(&self) -> Option<ScreenPoint> {
        self.session.map(|s| s.last_fingertip)
    }

    pub fn reset(&mut self) {
        self.session = None;
    }

    /// Advance by one frame. Pinch start and pinch end produce no delta.
    pub fn update(&mut self, pinching: bool, points: &[ScreenPoint]) -> Option<CursorDelta> {
        let tip = joint(points, HandLandmark::IndexTip)?;

        if !pinching {
            if self.session.take().is_some() {
                debug!("Cursor session ended");
            }
            return None;
        }

        let Some(session) = self.session.as_mut() else {
            debug!("Cursor session started at ({:.1}, {:.1})", tip.x(), tip.y());
            self.session = Some(CursorSession {
                last_fingertip: tip,
                smoothed: None,
            });
            return None;
        };

        let raw = CursorDelta {
            dx: (tip.x() - session.last_fingertip.x()) * self.scale_factor,
            dy: (tip.y() - session.last_fingertip.y()) * self.scale_factor,
        };
        session.last_fingertip = tip;

        let delta = match session.smoothed {
            Some(prev) if self.smooth_factor < 1.0 => CursorDelta {
                dx: self.smooth_factor * raw.dx + (1.0 - self.smooth_factor) * prev.dx,
                dy: self.smooth_factor * raw.dy + (1.0 - self.smooth_factor) * prev.dy,
            },
            _ => raw,
        };
        session.smoothed = Some(delta);
        Some(delta)
    }
}
