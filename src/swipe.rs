//! Pinch-armed horizontal swipe recognition.
//!
//! A pinch arms the detector and snapshots the x positions of the index,
//! middle and ring fingertips. Every following frame compares the mean of
//! the current x positions against the mean of that snapshot. The snapshot
//! is never refreshed, so the hand has to travel `swipe_threshold` units
//! from where it was at arming time before the window elapses.

use std::time::{Duration, Instant};

use log::debug;
use strum::{Display, EnumString, IntoStaticStr};

use crate::config::Thresholds;
use crate::landmark::{SWIPE_FINGERTIPS, ScreenPoint, joint};

/// Recognized swipe direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
pub enum SwipeDirection {
    #[strum(serialize = "swipe_left")]
    Left,
    #[strum(serialize = "swipe_right")]
    Right,
}

/// Session state of the swipe detector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SwipeState {
    #[default]
    Idle,
    Armed {
        armed_at: Instant,
        baseline_xs: [f64; 3],
    },
}

/// Swipe state machine. Driven once per frame by [`SwipeDetector::update`].
#[derive(Debug, Clone)]
pub struct SwipeDetector {
    pub swipe_threshold: f64,
    pub window: Duration,
    pub cooldown: Duration,
    state: SwipeState,
    last_emission: Option<Instant>,
}

impl SwipeDetector {
    pub fn new(swipe_threshold: f64, window: Duration, cooldown: Duration) -> Self {
        Self {
            swipe_threshold,
            window,
            cooldown,
            state: SwipeState::Idle,
            last_emission: None,
        }
    }

    pub fn from_thresholds(th: &Thresholds) -> Self {
        Self::new(
            th.swipe_threshold,
            saturating_secs(th.swipe_window),
            saturating_secs(th.swipe_cooldown),
        )
    }

    pub fn state(&self) -> &SwipeState {
        &self.state
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, SwipeState::Armed { .. })
    }

    /// Drop any session and cooldown bookkeeping.
    pub fn reset(&mut self) {
        self.state = SwipeState::Idle;
        self.last_emission = None;
    }

    /// Advance the machine by one frame.
    ///
    /// The arming frame never classifies, and the frame that emits or times
    /// out never re-arms.
    pub fn update(
        &mut self,
        pinching: bool,
        points: &[ScreenPoint],
        now: Instant,
    ) -> Option<SwipeDirection> {
        let current_xs = fingertip_xs(points)?;

        match self.state {
            SwipeState::Idle => {
                if pinching && !self.cooling_down(now) {
                    debug!("Swipe armed at x={:.1}", mean(&current_xs));
                    self.state = SwipeState::Armed {
                        armed_at: now,
                        baseline_xs: current_xs,
                    };
                }
                None
            }
            SwipeState::Armed {
                armed_at,
                baseline_xs,
            } => {
                if now.saturating_duration_since(armed_at) >= self.window {
                    debug!("Swipe window elapsed without movement");
                    self.state = SwipeState::Idle;
                    return None;
                }

                let direction = self.classify(mean(&baseline_xs), mean(&current_xs))?;
                debug!("Swipe {direction} detected");
                self.state = SwipeState::Idle;
                if !self.cooldown.is_zero() {
                    self.last_emission = Some(now);
                }
                Some(direction)
            }
        }
    }

    fn classify(&self, avg_baseline: f64, avg_current: f64) -> Option<SwipeDirection> {
        let moved_left = avg_current < avg_baseline - self.swipe_threshold;
        let moved_right = avg_current > avg_baseline + self.swipe_threshold;

        match (moved_left, moved_right) {
            (true, false) => Some(SwipeDirection::Left),
            (false, true) => Some(SwipeDirection::Right),
            _ => None,
        }
    }

    fn cooling_down(&mut self, now: Instant) -> bool {
        let Some(last) = self.last_emission else {
            return false;
        };
        if now.saturating_duration_since(last) < self.cooldown {
            return true;
        }
        self.last_emission = None;
        false
    }
}

/// Out-of-range seconds saturate instead of panicking; NaN and negatives become zero.
fn saturating_secs(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or(if secs > 0.0 {
        Duration::MAX
    } else {
        Duration::ZERO
    })
}

fn fingertip_xs(points: &[ScreenPoint]) -> Option<[f64; 3]> {
    let [a, b, c] = SWIPE_FINGERTIPS;
    Some([
        joint(points, a)?.x(),
        joint(points, b)?.x(),
        joint(points, c)?.x(),
    ])
}

fn mean(xs: &[f64; 3]) -> f64 {
    xs.iter().sum::<f64>() / xs.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::{HandLandmark, LANDMARK_COUNT};

    fn hand_at(x: f64) -> Vec<ScreenPoint> {
        let mut points = vec![ScreenPoint::new(x, 200.0); LANDMARK_COUNT];
        points[HandLandmark::MiddleTip.index()] = ScreenPoint::new(x - 4.0, 180.0);
        points[HandLandmark::RingTip.index()] = ScreenPoint::new(x + 4.0, 190.0);
        points
    }

    fn detector() -> SwipeDetector {
        SwipeDetector::new(10.0, Duration::from_secs(2), Duration::ZERO)
    }

    #[test]
    fn baseline_keeps_raw_fingertip_xs() {
        let mut det = detector();
        let t0 = Instant::now();
        det.update(true, &hand_at(300.0), t0);
        assert_eq!(
            det.state(),
            &SwipeState::Armed {
                armed_at: t0,
                baseline_xs: [300.0, 296.0, 304.0],
            }
        );
    }

    #[test]
    fn arming_frame_does_not_classify() {
        let mut det = detector();
        assert_eq!(det.update(true, &hand_at(300.0), Instant::now()), None);
        assert!(det.is_armed());
    }

    #[test]
    fn armed_session_ignores_pinch_release() {
        let mut det = detector();
        let t0 = Instant::now();
        det.update(true, &hand_at(300.0), t0);
        let fired = det.update(false, &hand_at(280.0), t0 + Duration::from_millis(100));
        assert_eq!(fired, Some(SwipeDirection::Left));
    }

    #[test]
    fn incomplete_skeleton_leaves_state_alone() {
        let mut det = detector();
        let t0 = Instant::now();
        det.update(true, &hand_at(300.0), t0);
        let before = *det.state();
        let mut short = hand_at(100.0);
        short.truncate(12);
        assert_eq!(det.update(true, &short, t0 + Duration::from_millis(50)), None);
        assert_eq!(det.state(), &before);
    }

    #[test]
    fn oversized_window_saturates() {
        let th = Thresholds {
            swipe_window: 1e20,
            swipe_cooldown: f64::NAN,
            ..Thresholds::default()
        };
        let det = SwipeDetector::from_thresholds(&th);
        assert_eq!(det.window, Duration::MAX);
        assert_eq!(det.cooldown, Duration::ZERO);
    }

    #[test]
    fn direction_names() {
        assert_eq!(SwipeDirection::Left.to_string(), "swipe_left");
        assert_eq!("swipe_right".parse::<SwipeDirection>().unwrap(), SwipeDirection::Right);
    }
}
