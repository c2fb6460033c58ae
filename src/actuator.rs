//! OS pointer actuation for cursor deltas.
//!
//! The engine only produces relative motion. This layer keeps an absolute
//! pointer estimate in y-up display coordinates, adds the delta with the
//! vertical axis inverted, clamps to the display and emits the resulting
//! integer step on a `uinput` relative pointer (whose REL_Y grows downwards).

use evdev::uinput::{VirtualDevice, VirtualDeviceBuilder};
use evdev::{AttributeSet, EventType, InputEvent, Key, RelativeAxisType};
use log::{debug, info};

use crate::config::{HandmarkerError, PointerConfig};
use crate::cursor::CursorDelta;

/// Receives per-frame cursor deltas.
pub trait CursorActuator {
    fn move_by(&mut self, delta: CursorDelta) -> Result<(), HandmarkerError>;
}

/// Add a delta to `current` (Y inverted) and clamp to `[0, w-1] × [0, h-1]`.
pub fn clamp_to_display(current: (f64, f64), delta: CursorDelta, bounds: (u32, u32)) -> (f64, f64) {
    let max_x = f64::from(bounds.0.saturating_sub(1));
    let max_y = f64::from(bounds.1.saturating_sub(1));
    (
        (current.0 + delta.dx).clamp(0.0, max_x),
        (current.1 - delta.dy).clamp(0.0, max_y),
    )
}

/// Tracks the absolute pointer position and converts deltas to whole-pixel steps.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerTracker {
    bounds: (u32, u32),
    position: (f64, f64),
    emitted: (i32, i32),
}

impl PointerTracker {
    /// Start at the centre of the display.
    pub fn new(bounds: (u32, u32)) -> Self {
        let centre = (f64::from(bounds.0 / 2), f64::from(bounds.1 / 2));
        Self {
            bounds,
            position: centre,
            emitted: (bounds.0 as i32 / 2, bounds.1 as i32 / 2),
        }
    }

    pub fn position(&self) -> (f64, f64) {
        self.position
    }

    /// Apply a delta and return the whole-pixel step in y-up coordinates.
    /// Fractional motion accumulates until it crosses a pixel.
    pub fn step(&mut self, delta: CursorDelta) -> (i32, i32) {
        self.position = clamp_to_display(self.position, delta, self.bounds);
        let target = (
            self.position.0.round() as i32,
            self.position.1.round() as i32,
        );
        let step = (target.0 - self.emitted.0, target.1 - self.emitted.1);
        self.emitted = target;
        step
    }
}

/// Relative pointer backed by a `uinput` virtual device.
pub struct VirtualPointer {
    device: VirtualDevice,
    tracker: PointerTracker,
}

impl VirtualPointer {
    pub fn new(config: &PointerConfig) -> Result<Self, HandmarkerError> {
        let mut keys = AttributeSet::<Key>::new();
        keys.insert(Key::BTN_LEFT);
        let mut axes = AttributeSet::<RelativeAxisType>::new();
        axes.insert(RelativeAxisType::REL_X);
        axes.insert(RelativeAxisType::REL_Y);

        let device = VirtualDeviceBuilder::new()?
            .name("handmarker virtual pointer")
            .with_keys(&keys)?
            .with_relative_axes(&axes)?
            .build()?;

        info!(
            "Created virtual pointer for a {}x{} display",
            config.display_width, config.display_height
        );

        Ok(Self {
            device,
            tracker: PointerTracker::new((config.display_width, config.display_height)),
        })
    }
}

impl CursorActuator for VirtualPointer {
    fn move_by(&mut self, delta: CursorDelta) -> Result<(), HandmarkerError> {
        let (dx, dy) = self.tracker.step(delta);
        if dx == 0 && dy == 0 {
            return Ok(());
        }
        self.device.emit(&[
            InputEvent::new(EventType::RELATIVE, RelativeAxisType::REL_X.0, dx),
            InputEvent::new(EventType::RELATIVE, RelativeAxisType::REL_Y.0, -dy),
        ])?;
        Ok(())
    }
}

/// Logs deltas instead of moving anything. Used for `--dry-run` and when
/// the pointer is disabled in the config.
#[derive(Debug, Default)]
pub struct LogActuator;

impl CursorActuator for LogActuator {
    fn move_by(&mut self, delta: CursorDelta) -> Result<(), HandmarkerError> {
        debug!("Cursor delta ({:.1}, {:.1})", delta.dx, -delta.dy);
        Ok(())
    }
}
