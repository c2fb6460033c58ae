//! Tests for `handmarker::config` - TOML parsing, defaults, validation,
//! gesture entries, and error handling.

use std::io::Write;
use tempfile::NamedTempFile;

use handmarker::config::{AppConfig, MappingConfig, Thresholds, parse_config_file};

// ── Helpers ──────────────────────────────────────────────────

/// Write TOML to a temp file and parse it.
fn load(toml_content: &str) -> AppConfig {
    let mut f = NamedTempFile::new().unwrap();
    f.write_all(toml_content.as_bytes()).unwrap();
    f.flush().unwrap();
    parse_config_file(f.path()).unwrap()
}

/// Parse raw TOML that is expected to fail.
fn load_err(toml_content: &str) -> String {
    let mut f = NamedTempFile::new().unwrap();
    f.write_all(toml_content.as_bytes()).unwrap();
    f.flush().unwrap();
    parse_config_file(f.path()).unwrap_err().to_string()
}

// ── Error handling ───────────────────────────────────────────

#[test]
fn test_file_not_found() {
    let msg = parse_config_file(std::path::Path::new("/no/such/file.toml"))
        .unwrap_err()
        .to_string();
    assert!(msg.contains("Failed to read config file"));
    assert!(msg.contains("/no/such/file.toml"));
}

#[test]
fn test_invalid_toml() {
    let msg = load_err("this is not valid toml [[[");
    assert!(msg.contains("Failed to parse config file"));
}

#[test]
fn test_wrong_value_type() {
    let msg = load_err(
        r#"
[thresholds]
touch_threshold = "twenty"
"#,
    );
    assert!(msg.contains("Failed to parse config file"));
}

#[test]
fn test_invalid_thresholds_list_field_names() {
    let msg = load_err(
        r#"
[thresholds]
touch_threshold = -1.0
swipe_window = 0.0
swipe_threshold = 5.0
"#,
    );
    assert!(msg.contains("[thresholds]"));
    assert!(msg.contains("touch_threshold"));
    assert!(msg.contains("swipe_window"));
    assert!(!msg.contains("swipe_threshold"));
}

#[test]
fn test_swipe_window_beyond_duration_range_rejected() {
    let msg = load_err(
        r#"
[thresholds]
swipe_window = 1e20
"#,
    );
    assert!(msg.contains("[thresholds]"));
    assert!(msg.contains("swipe_window"));
}

#[test]
fn test_swipe_cooldown_beyond_duration_range_rejected() {
    let msg = load_err(
        r#"
[thresholds]
swipe_cooldown = 1e300
"#,
    );
    assert!(msg.contains("swipe_cooldown"));
}

#[test]
fn test_smooth_factor_must_be_unit_weight() {
    let msg = load_err(
        r#"
[thresholds]
smooth_factor = 1.5
"#,
    );
    assert!(msg.contains("smooth_factor"));

    let msg = load_err(
        r#"
[thresholds]
smooth_factor = 0.0
"#,
    );
    assert!(msg.contains("smooth_factor"));
}

#[test]
fn test_zero_mapping_dimension_rejected() {
    let msg = load_err(
        r#"
[mapping]
source_width = 0.0
"#,
    );
    assert!(msg.contains("[mapping]"));
    assert!(msg.contains("source_width"));
}

#[test]
fn test_zero_poll_interval_rejected() {
    let msg = load_err(
        r#"
[source]
poll_interval_ms = 0
"#,
    );
    assert!(msg.contains("poll_interval_ms"));
}

#[test]
fn test_blank_endpoint_rejected() {
    let msg = load_err(
        r#"
[source]
endpoint = "  "
"#,
    );
    assert!(msg.contains("endpoint"));
}

#[test]
fn test_zero_display_rejected() {
    let msg = load_err(
        r#"
[pointer]
display_height = 0
"#,
    );
    assert!(msg.contains("[pointer]"));
    assert!(msg.contains("display_height"));
}

// ── Empty / minimal configs ──────────────────────────────────

#[test]
fn test_empty_config_uses_defaults() {
    let config = load("");
    assert_eq!(config.log_level, "info");
    assert!(config.log_file.is_none());
    assert_eq!(config.thresholds, Thresholds::default());
    assert_eq!(config.mapping, MappingConfig::default());
    assert_eq!(
        config.source.endpoint,
        "http://127.0.0.1:1999/hand_landmarks"
    );
    assert_eq!(config.source.poll_interval_ms, 100);
    assert!(config.pointer.enabled);
    assert!(config.gestures.is_empty());
}

#[test]
fn test_reference_threshold_defaults() {
    let th = Thresholds::default();
    assert_eq!(th.touch_threshold, 20.0);
    assert_eq!(th.swipe_threshold, 10.0);
    assert_eq!(th.swipe_window, 2.0);
    assert_eq!(th.swipe_cooldown, 0.0);
    assert_eq!(th.cursor_scale, 2.0);
    assert_eq!(th.smooth_factor, 1.0);

    let mapping = MappingConfig::default();
    assert_eq!((mapping.source_width, mapping.source_height), (1920.0, 1080.0));
    assert_eq!((mapping.target_width, mapping.target_height), (600.0, 400.0));
    assert!(!mapping.mirror_x);
}

#[test]
fn test_global_log_settings() {
    let config = load(
        r#"
[global]
log_level = "debug"
log_file = "/tmp/handmarker.log"
"#,
    );
    assert_eq!(config.log_level, "debug");
    assert_eq!(config.log_file.as_deref(), Some("/tmp/handmarker.log"));
}

#[test]
fn test_unknown_keys_ignored() {
    let config = load(
        r#"
[foobar]
setting = "value"

[thresholds]
touch_threshold = 25.0
"#,
    );
    assert_eq!(config.thresholds.touch_threshold, 25.0);
}

// ── Partial overrides ────────────────────────────────────────

#[test]
fn test_partial_thresholds_fall_back_to_defaults() {
    let config = load(
        r#"
[thresholds]
swipe_window = 1.5
cursor_scale = 3.0
"#,
    );
    let th = &config.thresholds;
    assert_eq!(th.swipe_window, 1.5);
    assert_eq!(th.cursor_scale, 3.0);
    assert_eq!(th.touch_threshold, 20.0); // default
    assert_eq!(th.swipe_threshold, 10.0); // default
}

#[test]
fn test_mapping_override() {
    let config = load(
        r#"
[mapping]
target_width = 800.0
mirror_x = true
"#,
    );
    assert_eq!(config.mapping.target_width, 800.0);
    assert_eq!(config.mapping.target_height, 400.0);
    assert!(config.mapping.mirror_x);
}

#[test]
fn test_source_override() {
    let config = load(
        r#"
[source]
endpoint = "http://10.0.0.5:1999/hand_landmarks"
timeout_ms = 250
"#,
    );
    assert_eq!(config.source.endpoint, "http://10.0.0.5:1999/hand_landmarks");
    assert_eq!(config.source.timeout_ms, 250);
    assert_eq!(config.source.poll_interval_ms, 100);
}

#[test]
fn test_pointer_disabled() {
    let config = load(
        r#"
[pointer]
enabled = false
display_width = 2560
"#,
    );
    assert!(!config.pointer.enabled);
    assert_eq!(config.pointer.display_width, 2560);
    assert_eq!(config.pointer.display_height, 1080);
}

#[test]
fn test_cooldown_zero_allowed() {
    let config = load(
        r#"
[thresholds]
swipe_cooldown = 0.0
swipe_threshold = 0.0
"#,
    );
    assert_eq!(config.thresholds.swipe_cooldown, 0.0);
    assert_eq!(config.thresholds.swipe_threshold, 0.0);
}

// ── Gestures ─────────────────────────────────────────────────

#[test]
fn test_gesture_entries() {
    let config = load(
        r#"
[gestures.swipe_left]
action = "xdotool key Left"
enabled = true

[gestures.swipe_right]
action = "xdotool key Right"
"#,
    );
    let left = &config.gestures["swipe_left"];
    assert!(left.enabled);
    assert_eq!(left.action.as_deref(), Some("xdotool key Left"));

    let right = &config.gestures["swipe_right"];
    assert!(!right.enabled); // disabled unless enabled = true
    assert_eq!(right.action.as_deref(), Some("xdotool key Right"));
}

#[test]
fn test_gesture_without_action() {
    let config = load(
        r#"
[gestures.swipe_left]
enabled = true
"#,
    );
    assert!(config.gestures["swipe_left"].action.is_none());
}

#[test]
fn test_unknown_gesture_kept() {
    let config = load(
        r#"
[gestures.swipe_up]
action = "echo up"
enabled = true
"#,
    );
    assert!(config.gestures.contains_key("swipe_up"));
}

#[test]
fn test_app_config_default_matches_empty_file() {
    let parsed = load("");
    let default = AppConfig::default();
    assert_eq!(parsed.thresholds, default.thresholds);
    assert_eq!(parsed.mapping, default.mapping);
    assert_eq!(parsed.source, default.source);
    assert_eq!(parsed.pointer, default.pointer);
    assert_eq!(parsed.log_level, default.log_level);
}
