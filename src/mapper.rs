//! Normalized detector coordinates to viewport coordinates.

use crate::config::MappingConfig;
use crate::landmark::{LandmarkFrame, ScreenPoint};

/// Rescales detector output into the target viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateMapper {
    source: (f64, f64),
    target: (f64, f64),
    mirror_x: bool,
}

impl Default for CoordinateMapper {
    fn default() -> Self {
        Self::from_config(&MappingConfig::default())
    }
}

impl CoordinateMapper {
    pub fn new(source: (f64, f64), target: (f64, f64), mirror_x: bool) -> Self {
        Self {
            source,
            target,
            mirror_x,
        }
    }

    pub fn from_config(config: &MappingConfig) -> Self {
        Self::new(
            (config.source_width, config.source_height),
            (config.target_width, config.target_height),
            config.mirror_x,
        )
    }

    /// Map one normalized point. Out-of-range input is passed through unclamped.
    pub fn map(&self, x: f64, y: f64, mirror_x: bool) -> ScreenPoint {
        let (source_w, source_h) = self.source;
        let (target_w, target_h) = self.target;

        let x = if mirror_x { 1.0 - x } else { x };
        let real_x = x * source_w;
        let real_y = y * source_h;

        ScreenPoint::new(real_x / source_w * target_w, real_y / source_h * target_h)
    }

    /// Map every point of a frame using the configured mirror flag.
    pub fn map_frame(&self, frame: &LandmarkFrame) -> Vec<ScreenPoint> {
        frame
            .points()
            .iter()
            .map(|lm| self.map(lm.x, lm.y, self.mirror_x))
            .collect()
    }

    pub fn mirror_x(&self) -> bool {
        self.mirror_x
    }

    pub fn target(&self) -> (f64, f64) {
        self.target
    }
}
