//! Configuration data structures and TOML parsing.
//!
//! The config file uses TOML format. Every key is optional. Example:
//!
//! ```toml
//! [global]
//! log_level = "info"
//!
//! [source]
//! endpoint = "http://127.0.0.1:1999/hand_landmarks"
//! poll_interval_ms = 100
//! timeout_ms = 500
//!
//! [mapping]
//! source_width = 1920.0
//! source_height = 1080.0
//! target_width = 600.0
//! target_height = 400.0
//! mirror_x = false
//!
//! [thresholds]
//! touch_threshold = 20.0
//! swipe_threshold = 10.0
//! swipe_window = 2.0
//! swipe_cooldown = 0.0
//! cursor_scale = 2.0
//! smooth_factor = 1.0
//!
//! [pointer]
//! enabled = true
//! display_width = 1920
//! display_height = 1080
//!
//! [gestures.swipe_left]
//! action = "xdotool key Left"
//! enabled = true
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::warn;
use serde::Deserialize;
use thiserror::Error;

use crate::swipe::SwipeDirection;

/// Top-level error type used throughout the crate.
#[derive(Debug, Error)]
pub enum HandmarkerError {
    #[error("Failed to read config file {path}: {source}")]
    ConfigReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    #[error("Config validation error in [{section}]: invalid value(s): {invalid}")]
    InvalidSettings {
        section: &'static str,
        invalid: String,
    },

    #[error("Landmark request to {endpoint} failed: {message}")]
    Http { endpoint: String, message: String },

    #[error("Malformed landmark payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Virtual pointer error: {0}")]
    Pointer(#[from] std::io::Error),

    #[error("Failed to install logger: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error("Failed to install signal handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

/// Root of the TOML config file.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RawConfig {
    global: RawGlobal,
    source: RawSource,
    mapping: RawMapping,
    thresholds: RawThresholds,
    pointer: RawPointer,
    gestures: HashMap<String, RawGestureConfig>,
}

/// The `[global]` section.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RawGlobal {
    log_level: Option<String>,
    log_file: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
struct RawSource {
    endpoint: Option<String>,
    poll_interval_ms: Option<u64>,
    timeout_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
struct RawMapping {
    source_width: Option<f64>,
    source_height: Option<f64>,
    target_width: Option<f64>,
    target_height: Option<f64>,
    mirror_x: Option<bool>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
struct RawThresholds {
    touch_threshold: Option<f64>,
    swipe_threshold: Option<f64>,
    swipe_window: Option<f64>,
    swipe_cooldown: Option<f64>,
    cursor_scale: Option<f64>,
    smooth_factor: Option<f64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
struct RawPointer {
    enabled: Option<bool>,
    display_width: Option<u32>,
    display_height: Option<u32>,
}

/// A gesture entry (action + enabled).
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
struct RawGestureConfig {
    action: Option<String>,
    enabled: Option<bool>,
}

/// Landmark service polling settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceConfig {
    pub endpoint: String,
    pub poll_interval_ms: u64,
    pub timeout_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:1999/hand_landmarks".to_string(),
            poll_interval_ms: 100,
            timeout_ms: 500,
        }
    }
}

/// Detector frame size, viewport size and mirroring.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingConfig {
    pub source_width: f64,
    pub source_height: f64,
    pub target_width: f64,
    pub target_height: f64,
    pub mirror_x: bool,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            source_width: 1920.0,
            source_height: 1080.0,
            target_width: 600.0,
            target_height: 400.0,
            mirror_x: false,
        }
    }
}

/// Gesture tunables. Distances are viewport units, times are seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct Thresholds {
    pub touch_threshold: f64,
    pub swipe_threshold: f64,
    pub swipe_window: f64,
    pub swipe_cooldown: f64,
    pub cursor_scale: f64,
    pub smooth_factor: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            touch_threshold: 20.0,
            swipe_threshold: 10.0,
            swipe_window: 2.0,
            swipe_cooldown: 0.0,
            cursor_scale: 2.0,
            smooth_factor: 1.0,
        }
    }
}

/// Virtual pointer settings.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerConfig {
    pub enabled: bool,
    pub display_width: u32,
    pub display_height: u32,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            display_width: 1920,
            display_height: 1080,
        }
    }
}

/// Gesture configuration (action + enabled).
#[derive(Debug, Clone)]
pub struct GestureConfig {
    pub action: Option<String>,
    pub enabled: bool,
}

/// Top-level parsed configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_file: Option<String>,
    pub source: SourceConfig,
    pub mapping: MappingConfig,
    pub thresholds: Thresholds,
    pub pointer: PointerConfig,
    pub gestures: HashMap<String, GestureConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_file: None,
            source: SourceConfig::default(),
            mapping: MappingConfig::default(),
            thresholds: Thresholds::default(),
            pointer: PointerConfig::default(),
            gestures: HashMap::new(),
        }
    }
}

fn positive(v: &f64) -> bool {
    v.is_finite() && *v > 0.0
}

fn non_negative(v: &f64) -> bool {
    v.is_finite() && *v >= 0.0
}

/// Seconds that convert to a `Duration` without overflow.
fn window_secs(v: &f64) -> bool {
    positive(v) && Duration::try_from_secs_f64(*v).is_ok()
}

fn cooldown_secs(v: &f64) -> bool {
    non_negative(v) && Duration::try_from_secs_f64(*v).is_ok()
}

fn unit_weight(v: &f64) -> bool {
    *v > 0.0 && *v <= 1.0
}

fn nonzero_ms(v: &u64) -> bool {
    *v > 0
}

fn nonzero_px(v: &u32) -> bool {
    *v > 0
}

fn not_blank(v: &String) -> bool {
    !v.trim().is_empty()
}

fn any<T>(_: &T) -> bool {
    true
}

/// Generate fallback merging and validation between a raw section and its
/// validated counterpart.
macro_rules! settings_fields {
    ($raw:ident => $validated:ident { $($field:ident: $check:expr),+ $(,)? }) => {
        impl $raw {
            fn from_validated(v: &$validated) -> $raw {
                $raw {
                    $($field: Some(v.$field.clone()),)+
                }
            }

            fn merge_with_fallback(&self, fallback: &$raw) -> $raw {
                $raw {
                    $($field: self.$field.clone().or_else(|| fallback.$field.clone()),)+
                }
            }

            fn into_validated(self) -> Result<$validated, Vec<&'static str>> {
                let invalid: Vec<&str> = [$(
                    match &self.$field {
                        Some(v) if $check(v) => None,
                        _ => Some(stringify!($field)),
                    },
                )+].into_iter().flatten().collect();

                if !invalid.is_empty() {
                    return Err(invalid);
                }

                Ok($validated {
                    $($field: self.$field.unwrap_or_default(),)+
                })
            }

            fn resolve(&self, section: &'static str) -> Result<$validated, HandmarkerError> {
                self.merge_with_fallback(&$raw::from_validated(&$validated::default()))
                    .into_validated()
                    .map_err(|invalid| HandmarkerError::InvalidSettings {
                        section,
                        invalid: invalid.join(", "),
                    })
            }
        }
    };
}

settings_fields!(RawSource => SourceConfig {
    endpoint: not_blank,
    poll_interval_ms: nonzero_ms,
    timeout_ms: nonzero_ms,
});

settings_fields!(RawMapping => MappingConfig {
    source_width: positive,
    source_height: positive,
    target_width: positive,
    target_height: positive,
    mirror_x: any,
});

settings_fields!(RawThresholds => Thresholds {
    touch_threshold: positive,
    swipe_threshold: non_negative,
    swipe_window: window_secs,
    swipe_cooldown: cooldown_secs,
    cursor_scale: positive,
    smooth_factor: unit_weight,
});

settings_fields!(RawPointer => PointerConfig {
    enabled: any,
    display_width: nonzero_px,
    display_height: nonzero_px,
});

/// Convert raw gesture entries; entries without `enabled` are disabled.
fn resolve_gestures(raw: &HashMap<String, RawGestureConfig>) -> HashMap<String, GestureConfig> {
    raw.iter()
        .map(|(name, gc)| {
            if name.parse::<SwipeDirection>().is_err() {
                warn!("Unknown gesture '{name}' in config – it will never fire.");
            }
            (
                name.clone(),
                GestureConfig {
                    action: gc.action.clone(),
                    enabled: gc.enabled.unwrap_or(false),
                },
            )
        })
        .collect()
}

fn resolve(raw: RawConfig) -> Result<AppConfig, HandmarkerError> {
    Ok(AppConfig {
        source: raw.source.resolve("source")?,
        mapping: raw.mapping.resolve("mapping")?,
        thresholds: raw.thresholds.resolve("thresholds")?,
        pointer: raw.pointer.resolve("pointer")?,
        gestures: resolve_gestures(&raw.gestures),
        log_level: raw.global.log_level.unwrap_or_else(|| "info".to_string()),
        log_file: raw.global.log_file,
    })
}

/// Parse a TOML config file and return the fully resolved `AppConfig`.
pub fn parse_config_file(path: &Path) -> Result<AppConfig, HandmarkerError> {
    let raw: RawConfig =
        toml::from_str(
            &fs::read_to_string(path).map_err(|e| HandmarkerError::ConfigReadError {
                path: path.to_path_buf(),
                source: e,
            })?,
        )
        .map_err(|e| HandmarkerError::ConfigParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    resolve(raw)
}
